//! Palette generation by HSL hue rotation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{hsl_to_rgb, Color, Hsl};
use crate::error::ColorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonyKind {
    Complementary,
    Analogous,
    Triadic,
    SplitComplementary,
    Tetradic,
    Monochromatic,
}

impl HarmonyKind {
    pub const ALL: [Self; 6] = [
        Self::Complementary,
        Self::Analogous,
        Self::Triadic,
        Self::SplitComplementary,
        Self::Tetradic,
        Self::Monochromatic,
    ];

    /// Hue offsets applied to the base, in degrees
    fn hue_offsets(self) -> &'static [f64] {
        match self {
            Self::Complementary => &[180.0],
            Self::Analogous => &[-30.0, 30.0],
            Self::Triadic => &[120.0, 240.0],
            Self::SplitComplementary => &[150.0, 210.0],
            Self::Tetradic => &[90.0, 180.0, 270.0],
            Self::Monochromatic => &[],
        }
    }

    /// Stable name used in cache keys
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complementary => "complementary",
            Self::Analogous => "analogous",
            Self::Triadic => "triadic",
            Self::SplitComplementary => "split_complementary",
            Self::Tetradic => "tetradic",
            Self::Monochromatic => "monochromatic",
        }
    }
}

impl fmt::Display for HarmonyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lightness steps for monochromatic palettes
const MONO_STEPS: [f64; 4] = [-30.0, -15.0, 15.0, 30.0];
const MONO_MIN_LIGHTNESS: f64 = 5.0;
const MONO_MAX_LIGHTNESS: f64 = 95.0;

/// Generate a palette around `base`. The base color is always first.
pub fn generate_palette(base: &Color, kind: HarmonyKind) -> Result<Vec<Color>, ColorError> {
    let hsl = base.hsl();
    let mut palette = vec![*base];

    if kind == HarmonyKind::Monochromatic {
        for step in MONO_STEPS {
            let l = (hsl.l + step).clamp(MONO_MIN_LIGHTNESS, MONO_MAX_LIGHTNESS);
            palette.push(Color::from_rgb(hsl_to_rgb(Hsl::new(hsl.h, hsl.s, l))?));
        }
    } else {
        for offset in kind.hue_offsets() {
            let h = (hsl.h + offset).rem_euclid(360.0);
            palette.push(Color::from_rgb(hsl_to_rgb(Hsl::new(h, hsl.s, hsl.l))?));
        }
    }

    Ok(palette)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complementary_of_red_is_cyan() {
        let palette = generate_palette(&Color::new(255, 0, 0), HarmonyKind::Complementary).unwrap();
        assert_eq!(palette, vec![Color::new(255, 0, 0), Color::new(0, 255, 255)]);
    }

    #[test]
    fn test_triadic_of_red() {
        let palette = generate_palette(&Color::new(255, 0, 0), HarmonyKind::Triadic).unwrap();
        assert_eq!(
            palette,
            vec![
                Color::new(255, 0, 0),
                Color::new(0, 255, 0),
                Color::new(0, 0, 255)
            ]
        );
    }

    #[test]
    fn test_palette_sizes() {
        let base = Color::from_hex("#3498db").unwrap();
        let sizes: Vec<usize> = HarmonyKind::ALL
            .iter()
            .map(|&kind| generate_palette(&base, kind).unwrap().len())
            .collect();
        assert_eq!(sizes, vec![2, 3, 3, 3, 4, 5]);
    }

    #[test]
    fn test_monochromatic_keeps_hue() {
        let base = Color::from_hex("#3498db").unwrap();
        let palette = generate_palette(&base, HarmonyKind::Monochromatic).unwrap();
        for color in &palette[1..] {
            let hsl = color.hsl();
            assert!((hsl.h - base.hsl().h).abs() < 2.0, "{:?}", hsl);
        }
        // Darker steps first
        assert!(palette[1].hsl().l < palette[2].hsl().l);
        assert!(palette[3].hsl().l > base.hsl().l);
    }

    #[test]
    fn test_achromatic_base() {
        let palette = generate_palette(&Color::new(128, 128, 128), HarmonyKind::Tetradic).unwrap();
        assert!(palette.iter().all(|c| *c == Color::new(128, 128, 128)));
    }
}
