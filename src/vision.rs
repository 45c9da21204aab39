//! Color-vision deficiency simulation
//!
//! Each deficiency maps to a fixed 3x3 matrix applied to normalized RGB.
//! Linear transforms can overshoot, so results are clamped back to bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Categories of color-vision deficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeficiencyKind {
    /// Red-blind (no L cones)
    Protanopia,
    /// Red-weak
    Protanomaly,
    /// Green-blind (no M cones)
    Deuteranopia,
    /// Green-weak, the most common form
    Deuteranomaly,
    /// Blue-blind (no S cones)
    Tritanopia,
    /// Blue-weak
    Tritanomaly,
    /// Complete color blindness
    Achromatopsia,
    /// Partial color blindness
    Achromatomaly,
}

type Matrix = [[f64; 3]; 3];

const PROTANOPIA: Matrix = [
    [0.567, 0.433, 0.0],
    [0.558, 0.442, 0.0],
    [0.0, 0.242, 0.758],
];

const PROTANOMALY: Matrix = [
    [0.817, 0.183, 0.0],
    [0.333, 0.667, 0.0],
    [0.0, 0.125, 0.875],
];

const DEUTERANOPIA: Matrix = [
    [0.625, 0.375, 0.0],
    [0.7, 0.3, 0.0],
    [0.0, 0.3, 0.7],
];

const DEUTERANOMALY: Matrix = [
    [0.8, 0.2, 0.0],
    [0.258, 0.742, 0.0],
    [0.0, 0.142, 0.858],
];

const TRITANOPIA: Matrix = [
    [0.95, 0.05, 0.0],
    [0.0, 0.433, 0.567],
    [0.0, 0.475, 0.525],
];

const TRITANOMALY: Matrix = [
    [0.967, 0.033, 0.0],
    [0.0, 0.733, 0.267],
    [0.0, 0.183, 0.817],
];

// Every row is the standard luma row
const ACHROMATOPSIA: Matrix = [
    [0.299, 0.587, 0.114],
    [0.299, 0.587, 0.114],
    [0.299, 0.587, 0.114],
];

const ACHROMATOMALY: Matrix = [
    [0.618, 0.320, 0.062],
    [0.163, 0.775, 0.062],
    [0.163, 0.320, 0.516],
];

impl DeficiencyKind {
    pub const ALL: [Self; 8] = [
        Self::Protanopia,
        Self::Protanomaly,
        Self::Deuteranopia,
        Self::Deuteranomaly,
        Self::Tritanopia,
        Self::Tritanomaly,
        Self::Achromatopsia,
        Self::Achromatomaly,
    ];

    pub fn matrix(self) -> &'static Matrix {
        match self {
            Self::Protanopia => &PROTANOPIA,
            Self::Protanomaly => &PROTANOMALY,
            Self::Deuteranopia => &DEUTERANOPIA,
            Self::Deuteranomaly => &DEUTERANOMALY,
            Self::Tritanopia => &TRITANOPIA,
            Self::Tritanomaly => &TRITANOMALY,
            Self::Achromatopsia => &ACHROMATOPSIA,
            Self::Achromatomaly => &ACHROMATOMALY,
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Protanopia => "Protanopia (red-blind)",
            Self::Protanomaly => "Protanomaly (red-weak)",
            Self::Deuteranopia => "Deuteranopia (green-blind)",
            Self::Deuteranomaly => "Deuteranomaly (green-weak)",
            Self::Tritanopia => "Tritanopia (blue-blind)",
            Self::Tritanomaly => "Tritanomaly (blue-weak)",
            Self::Achromatopsia => "Achromatopsia (no color)",
            Self::Achromatomaly => "Achromatomaly (weak color)",
        }
    }

    /// Dichromacy or full color loss, as opposed to a reduced sensitivity
    pub fn is_severe(self) -> bool {
        matches!(
            self,
            Self::Protanopia | Self::Deuteranopia | Self::Tritanopia | Self::Achromatopsia
        )
    }
}

impl fmt::Display for DeficiencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How `color` appears to someone with the given deficiency
pub fn simulate(color: &Color, kind: DeficiencyKind) -> Color {
    let rgb = color.rgb().normalized();
    let m = kind.matrix();

    let channel = |row: &[f64; 3]| {
        let v = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2];
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Color::new(channel(&m[0]), channel(&m[1]), channel(&m[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_achromatopsia_is_grayscale() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let color = Color::new(rng.gen(), rng.gen(), rng.gen());
            let rgb = simulate(&color, DeficiencyKind::Achromatopsia).rgb();
            assert!((rgb.r as i32 - rgb.g as i32).abs() <= 1, "{:?}", rgb);
            assert!((rgb.g as i32 - rgb.b as i32).abs() <= 1, "{:?}", rgb);
        }
    }

    #[test]
    fn test_black_and_white_are_fixed_points() {
        for kind in DeficiencyKind::ALL {
            assert_eq!(simulate(&Color::BLACK, kind), Color::BLACK, "{}", kind);
            assert_eq!(simulate(&Color::WHITE, kind), Color::WHITE, "{}", kind);
        }
    }

    #[test]
    fn test_protanopia_red() {
        let sim = simulate(&Color::new(255, 0, 0), DeficiencyKind::Protanopia);
        assert_eq!(sim, Color::new(145, 142, 0));
    }

    #[test]
    fn test_rows_preserve_gray() {
        for kind in DeficiencyKind::ALL {
            for row in kind.matrix() {
                let sum: f64 = row.iter().sum();
                assert!((sum - 1.0).abs() < 0.002, "{} row {:?}", kind, row);
            }
        }
    }

    #[test]
    fn test_simulation_is_deterministic() {
        let color = Color::new(30, 180, 90);
        for kind in DeficiencyKind::ALL {
            assert_eq!(simulate(&color, kind), simulate(&color, kind));
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&DeficiencyKind::Deuteranomaly).unwrap(),
            "\"deuteranomaly\""
        );
    }
}
