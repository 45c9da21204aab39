//! Color representations and conversions
//!
//! A [`Color`] stores sRGB bytes and derives every other representation on
//! demand: hex, HSL, CMYK and CIE LAB (D65). Conversions are pure and
//! deterministic; LAB is the numerical basis for Delta-E.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{check_range, ColorError};

/// sRGB D65 reference white (XYZ scaled to 0-100)
const REF_X: f64 = 95.047;
const REF_Y: f64 = 100.000;
const REF_Z: f64 = 108.883;

/// CIE LAB cube-root threshold
const LAB_EPSILON: f64 = 0.008856;

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from wider integers, rejecting anything outside 0..=255
    pub fn checked(r: i32, g: i32, b: i32) -> Result<Self, ColorError> {
        let channel = |component: &'static str, value: i32| {
            u8::try_from(value)
                .map_err(|_| ColorError::out_of_range(component, value as f64, 0.0, 255.0))
        };

        Ok(Self::new(
            channel("red", r)?,
            channel("green", g)?,
            channel("blue", b)?,
        ))
    }

    /// Channels as floats in [0, 1]
    #[inline]
    pub fn normalized(&self) -> [f64; 3] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        ]
    }
}

/// HSL representation: h in [0, 360), s and l in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Whole-number view, as shown to users
    pub fn rounded(&self) -> Hsl {
        Hsl {
            h: self.h.round().rem_euclid(360.0),
            s: self.s.round(),
            l: self.l.round(),
        }
    }
}

/// CMYK representation, every component in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cmyk {
    pub c: f64,
    pub m: f64,
    pub y: f64,
    pub k: f64,
}

/// CIE LAB representation (D65)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Parse a 6-digit hex string with optional leading `#`.
///
/// Case-insensitive. Returns `None` for anything malformed; callers that want
/// an error should go through [`Color::from_hex`].
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if digits.len() != 6 || !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Canonical lowercase `#rrggbb`
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let [r, g, b] = rgb.normalized();
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    // Achromatic
    if max == min {
        return Hsl::new(0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl::new((h * 60.0).rem_euclid(360.0), s * 100.0, l * 100.0)
}

/// HSL to RGB. Hue wraps; saturation and lightness must lie in [0, 100].
pub fn hsl_to_rgb(hsl: Hsl) -> Result<Rgb, ColorError> {
    if !hsl.h.is_finite() {
        return Err(ColorError::out_of_range("hue", hsl.h, 0.0, 360.0));
    }
    let s = check_range("saturation", hsl.s, 0.0, 100.0)? / 100.0;
    let l = check_range("lightness", hsl.l, 0.0, 100.0)? / 100.0;
    let h = hsl.h.rem_euclid(360.0) / 360.0;

    if s == 0.0 {
        let v = unit_to_byte(l);
        return Ok(Rgb::new(v, v, v));
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Ok(Rgb::new(
        unit_to_byte(hue_to_channel(p, q, h + 1.0 / 3.0)),
        unit_to_byte(hue_to_channel(p, q, h)),
        unit_to_byte(hue_to_channel(p, q, h - 1.0 / 3.0)),
    ))
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

pub fn hsl_to_hex(hsl: Hsl) -> Result<String, ColorError> {
    hsl_to_rgb(hsl).map(rgb_to_hex)
}

pub fn rgb_to_cmyk(rgb: Rgb) -> Cmyk {
    let [r, g, b] = rgb.normalized();
    let k = 1.0 - r.max(g).max(b);

    // Pure black: c, m, y are undefined, report them as zero
    if k >= 1.0 {
        return Cmyk {
            c: 0.0,
            m: 0.0,
            y: 0.0,
            k: 100.0,
        };
    }

    Cmyk {
        c: (1.0 - r - k) / (1.0 - k) * 100.0,
        m: (1.0 - g - k) / (1.0 - k) * 100.0,
        y: (1.0 - b - k) / (1.0 - k) * 100.0,
        k: k * 100.0,
    }
}

pub fn cmyk_to_rgb(cmyk: Cmyk) -> Result<Rgb, ColorError> {
    let c = check_range("cyan", cmyk.c, 0.0, 100.0)? / 100.0;
    let m = check_range("magenta", cmyk.m, 0.0, 100.0)? / 100.0;
    let y = check_range("yellow", cmyk.y, 0.0, 100.0)? / 100.0;
    let k = check_range("key", cmyk.k, 0.0, 100.0)? / 100.0;

    Ok(Rgb::new(
        unit_to_byte((1.0 - c) * (1.0 - k)),
        unit_to_byte((1.0 - m) * (1.0 - k)),
        unit_to_byte((1.0 - y) * (1.0 - k)),
    ))
}

/// Convert sRGB byte to linear
#[inline]
pub fn srgb_to_linear(c: u8) -> f64 {
    let c = c as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert linear to sRGB byte
#[inline]
pub fn linear_to_srgb(c: f64) -> u8 {
    let c = if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    unit_to_byte(c)
}

/// sRGB -> linear RGB -> XYZ (D65) -> LAB
pub fn rgb_to_lab(rgb: Rgb) -> Lab {
    let r = srgb_to_linear(rgb.r) * 100.0;
    let g = srgb_to_linear(rgb.g) * 100.0;
    let b = srgb_to_linear(rgb.b) * 100.0;

    let x = r * 0.4124564 + g * 0.3575761 + b * 0.1804375;
    let y = r * 0.2126729 + g * 0.7151522 + b * 0.0721750;
    let z = r * 0.0193339 + g * 0.1191920 + b * 0.9503041;

    let f = |t: f64| {
        if t > LAB_EPSILON {
            t.cbrt()
        } else {
            7.787 * t + 16.0 / 116.0
        }
    };

    let fx = f(x / REF_X);
    let fy = f(y / REF_Y);
    let fz = f(z / REF_Z);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

#[inline]
fn unit_to_byte(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Immutable color value.
///
/// Every representation is derived from the stored sRGB bytes, so they always
/// describe the same color. Serializes as its canonical hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    rgb: Rgb,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            rgb: Rgb::new(r, g, b),
        }
    }

    pub const fn from_rgb(rgb: Rgb) -> Self {
        Self { rgb }
    }

    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        hex_to_rgb(hex)
            .map(Self::from_rgb)
            .ok_or_else(|| ColorError::MalformedColor(hex.to_string()))
    }

    /// Build from integer components supplied directly (not via hex)
    pub fn from_components(r: i32, g: i32, b: i32) -> Result<Self, ColorError> {
        Rgb::checked(r, g, b).map(Self::from_rgb)
    }

    pub fn from_hsl(h: f64, s: f64, l: f64) -> Result<Self, ColorError> {
        hsl_to_rgb(Hsl::new(h, s, l)).map(Self::from_rgb)
    }

    pub fn from_cmyk(c: f64, m: f64, y: f64, k: f64) -> Result<Self, ColorError> {
        cmyk_to_rgb(Cmyk { c, m, y, k }).map(Self::from_rgb)
    }

    #[inline]
    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub fn hex(&self) -> String {
        rgb_to_hex(self.rgb)
    }

    pub fn hsl(&self) -> Hsl {
        rgb_to_hsl(self.rgb)
    }

    pub fn cmyk(&self) -> Cmyk {
        rgb_to_cmyk(self.rgb)
    }

    pub fn lab(&self) -> Lab {
        rgb_to_lab(self.rgb)
    }

    /// WCAG relative luminance in [0, 1]
    pub fn relative_luminance(&self) -> f64 {
        0.2126 * srgb_to_linear(self.rgb.r)
            + 0.7152 * srgb_to_linear(self.rgb.g)
            + 0.0722 * srgb_to_linear(self.rgb.b)
    }

    /// Warm/cool indicator `(r - b) / 255`, positive is warm
    pub fn warmth(&self) -> f64 {
        (self.rgb.r as f64 - self.rgb.b as f64) / 255.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.hex()
    }
}

/// Every representation of one color, computed together
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorConversions {
    pub color: Color,
    pub hex: String,
    pub rgb: Rgb,
    pub hsl: Hsl,
    pub cmyk: Cmyk,
    pub lab: Lab,
}

impl ColorConversions {
    pub fn of(color: &Color) -> Self {
        Self {
            color: *color,
            hex: color.hex(),
            rgb: color.rgb(),
            hsl: color.hsl(),
            cmyk: color.cmyk(),
            lab: color.lab(),
        }
    }
}

/// Parse a user-supplied hex string into a [`Color`]
pub fn convert(hex: &str) -> Result<Color, ColorError> {
    Color::from_hex(hex)
}
