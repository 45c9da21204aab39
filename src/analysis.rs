//! Full analysis of a single color

use serde::Serialize;

use crate::accessibility::contrast_ratio;
use crate::color::{Cmyk, Color, Hsl, Lab, Rgb};

/// Relative luminance where black and white text contrast equally
const LIGHT_THRESHOLD: f64 = 0.179;

/// Warmth band treated as neutral
const NEUTRAL_BAND: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Warm,
    Cool,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorAnalysis {
    pub color: Color,
    pub hex: String,
    pub rgb: [u8; 3],
    pub hsl: Hsl,
    pub cmyk: Cmyk,
    pub lab: Lab,
    pub relative_luminance: f64,
    pub is_light: bool,
    pub temperature: Temperature,
    pub contrast_on_white: f64,
    pub contrast_on_black: f64,
    /// Black or white, whichever reads better on this color
    pub preferred_text: Color,
}

pub fn analyze_color(color: &Color) -> ColorAnalysis {
    let Rgb { r, g, b } = color.rgb();
    let luminance = color.relative_luminance();

    let warmth = color.warmth();
    let temperature = if warmth > NEUTRAL_BAND {
        Temperature::Warm
    } else if warmth < -NEUTRAL_BAND {
        Temperature::Cool
    } else {
        Temperature::Neutral
    };

    let contrast_on_white = contrast_ratio(color, &Color::WHITE);
    let contrast_on_black = contrast_ratio(color, &Color::BLACK);
    let preferred_text = if contrast_on_black >= contrast_on_white {
        Color::BLACK
    } else {
        Color::WHITE
    };

    ColorAnalysis {
        color: *color,
        hex: color.hex(),
        rgb: [r, g, b],
        hsl: color.hsl(),
        cmyk: color.cmyk(),
        lab: color.lab(),
        relative_luminance: luminance,
        is_light: luminance > LIGHT_THRESHOLD,
        temperature,
        contrast_on_white,
        contrast_on_black,
        preferred_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_blue() {
        let analysis = analyze_color(&Color::from_hex("#3498DB").unwrap());
        assert_eq!(analysis.hex, "#3498db");
        assert_eq!(analysis.rgb, [52, 152, 219]);
        assert_eq!(analysis.hsl.rounded(), Hsl::new(204.0, 70.0, 53.0));
        assert_eq!(analysis.temperature, Temperature::Cool);
        assert!(analysis.is_light);
        assert_eq!(analysis.preferred_text, Color::BLACK);
    }

    #[test]
    fn test_temperature() {
        assert_eq!(analyze_color(&Color::new(220, 80, 20)).temperature, Temperature::Warm);
        assert_eq!(analyze_color(&Color::new(128, 128, 128)).temperature, Temperature::Neutral);
    }

    #[test]
    fn test_preferred_text_on_dark() {
        let analysis = analyze_color(&Color::new(20, 20, 60));
        assert!(!analysis.is_light);
        assert_eq!(analysis.preferred_text, Color::WHITE);
        assert!(analysis.contrast_on_white > analysis.contrast_on_black);
    }
}
