//! Accessibility scoring for a foreground/background pair
//!
//! Combines the WCAG contrast ratio, a pass/fail check under every simulated
//! color-vision deficiency, and a readability heuristic into one graded
//! result. The readability figure is a heuristic over HSL differences, not a
//! perceptual model.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::vision::{self, DeficiencyKind};

/// WCAG luminance epsilon, keeps the ratio finite for pure black
const WCAG_EPSILON: f64 = 0.05;

const AAA_RATIO: f64 = 7.0;
const AA_RATIO: f64 = 4.5;
const A_RATIO: f64 = 3.0;

/// Contrast a simulated pair must keep to count as accessible
const DEFICIENCY_PASS_RATIO: f64 = 4.5;

// Score weights, out of 100
const CONTRAST_WEIGHT: f64 = 40.0;
const CONTRAST_PARTIAL: f64 = 30.0;
const CONTRAST_MINIMAL: f64 = 10.0;
const COLOR_BLINDNESS_WEIGHT: f64 = 30.0;
const READABILITY_WEIGHT: f64 = 20.0;
// Motor and visual criteria need input this engine never sees, assume compliant
const PLACEHOLDER_WEIGHT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WcagLevel {
    #[serde(rename = "FAIL")]
    Fail,
    A,
    AA,
    AAA,
}

impl WcagLevel {
    /// Level reached by a contrast ratio
    pub fn from_contrast(ratio: f64) -> Self {
        if ratio >= AAA_RATIO {
            WcagLevel::AAA
        } else if ratio >= AA_RATIO {
            WcagLevel::AA
        } else if ratio >= A_RATIO {
            WcagLevel::A
        } else {
            WcagLevel::Fail
        }
    }

    /// Level reached by an aggregate 0-100 score
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            WcagLevel::AAA
        } else if score >= 70.0 {
            WcagLevel::AA
        } else if score >= 50.0 {
            WcagLevel::A
        } else {
            WcagLevel::Fail
        }
    }
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WcagLevel::Fail => write!(f, "FAIL"),
            WcagLevel::A => write!(f, "A"),
            WcagLevel::AA => write!(f, "AA"),
            WcagLevel::AAA => write!(f, "AAA"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    #[default]
    Normal,
    /// 18pt regular or 14pt bold and above
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Usage {
    #[default]
    BodyText,
    Heading,
    UiComponent,
    Decorative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Where and how the color pair is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityContext {
    pub text_size: TextSize,
    pub usage: Usage,
    pub importance: Importance,
}

/// Outcome for one deficiency category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeficiencyReport {
    pub accessible: bool,
    /// Contrast of the simulated pair
    pub contrast_ratio: f64,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessibilityResult {
    /// WCAG contrast ratio, two decimals
    pub contrast_ratio: f64,
    /// Level reached by the contrast ratio alone
    pub wcag_level: WcagLevel,
    pub per_deficiency: BTreeMap<DeficiencyKind, DeficiencyReport>,
    /// Heuristic, 0-100
    pub cognitive_readability: f64,
    /// Weighted aggregate, 0-100
    pub overall_score: f64,
    /// Level reached by the aggregate score
    pub overall_level: WcagLevel,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

impl AccessibilityResult {
    /// Share of deficiency categories that keep sufficient contrast
    pub fn color_blind_pass_rate(&self) -> f64 {
        if self.per_deficiency.is_empty() {
            return 0.0;
        }
        let passed = self.per_deficiency.values().filter(|r| r.accessible).count();
        passed as f64 / self.per_deficiency.len() as f64
    }
}

/// WCAG contrast ratio, always >= 1
pub fn contrast_ratio(a: &Color, b: &Color) -> f64 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let (lighter, darker) = if la > lb { (la, lb) } else { (lb, la) };
    (lighter + WCAG_EPSILON) / (darker + WCAG_EPSILON)
}

/// Readability heuristic from saturation and lightness differences
pub fn cognitive_readability(fg: &Color, bg: &Color) -> f64 {
    let a = fg.hsl();
    let b = bg.hsl();
    let score = (a.s - b.s).abs() + (a.l - b.l).abs();
    round_to(score.min(100.0), 1)
}

pub fn analyze_accessibility(
    fg: &Color,
    bg: &Color,
    context: &AccessibilityContext,
) -> AccessibilityResult {
    let ratio = contrast_ratio(fg, bg);
    let wcag_level = WcagLevel::from_contrast(ratio);

    let per_deficiency: BTreeMap<DeficiencyKind, DeficiencyReport> = DeficiencyKind::ALL
        .iter()
        .map(|&kind| (kind, deficiency_report(fg, bg, kind, ratio)))
        .collect();

    let passed = per_deficiency.values().filter(|r| r.accessible).count();
    let pass_rate = passed as f64 / per_deficiency.len() as f64;

    let cognitive = cognitive_readability(fg, bg);

    let contrast_points = if ratio >= AAA_RATIO {
        CONTRAST_WEIGHT
    } else if ratio >= AA_RATIO {
        CONTRAST_PARTIAL
    } else {
        CONTRAST_MINIMAL
    };

    let overall_score = round_to(
        (contrast_points
            + COLOR_BLINDNESS_WEIGHT * pass_rate
            + READABILITY_WEIGHT * cognitive / 100.0
            + PLACEHOLDER_WEIGHT)
            .clamp(0.0, 100.0),
        1,
    );
    let overall_level = WcagLevel::from_score(overall_score);

    let (issues, suggestions) = context_findings(fg, bg, ratio, cognitive, passed, context);

    tracing::debug!(
        "Accessibility {} on {}: ratio {:.2}, {}/{} deficiency passes, score {}",
        fg,
        bg,
        ratio,
        passed,
        per_deficiency.len(),
        overall_score
    );

    AccessibilityResult {
        contrast_ratio: round_to(ratio, 2),
        wcag_level,
        per_deficiency,
        cognitive_readability: cognitive,
        overall_score,
        overall_level,
        issues,
        suggestions,
    }
}

fn deficiency_report(
    fg: &Color,
    bg: &Color,
    kind: DeficiencyKind,
    original: f64,
) -> DeficiencyReport {
    let sim_fg = vision::simulate(fg, kind);
    let sim_bg = vision::simulate(bg, kind);
    let ratio = contrast_ratio(&sim_fg, &sim_bg);
    let accessible = ratio >= DEFICIENCY_PASS_RATIO;

    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    if !accessible {
        issues.push(format!(
            "Contrast drops to {:.2}:1 for {}",
            ratio,
            kind.label()
        ));
        suggestions.push("Increase the lightness difference between the two colors".to_string());
        if kind.is_severe() {
            suggestions.push(
                "Do not rely on hue alone; pair color with text, icons or patterns".to_string(),
            );
        }
    } else if ratio < original * 0.7 {
        issues.push(format!(
            "Contrast falls from {:.2}:1 to {:.2}:1 for {}",
            original,
            ratio,
            kind.label()
        ));
    }

    DeficiencyReport {
        accessible,
        contrast_ratio: round_to(ratio, 2),
        issues,
        suggestions,
    }
}

fn context_findings(
    fg: &Color,
    bg: &Color,
    ratio: f64,
    cognitive: f64,
    deficiency_passes: usize,
    context: &AccessibilityContext,
) -> (Vec<String>, Vec<String>) {
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    if context.usage == Usage::Decorative {
        suggestions
            .push("Purely decorative elements are exempt from WCAG contrast minimums".to_string());
    } else {
        let required = match (context.text_size, context.usage) {
            (TextSize::Large, _) | (_, Usage::UiComponent) => A_RATIO,
            _ => AA_RATIO,
        };
        if ratio < required {
            issues.push(format!(
                "Contrast {:.2}:1 is below the {:.1}:1 AA minimum for this use",
                ratio, required
            ));
            if fg.relative_luminance() > bg.relative_luminance() {
                suggestions.push("Lighten the foreground or darken the background".to_string());
            } else {
                suggestions.push("Darken the foreground or lighten the background".to_string());
            }
        }

        if context.importance == Importance::Critical && ratio < AAA_RATIO {
            issues.push(format!(
                "Critical content should reach AAA ({:.0}:1), currently {:.2}:1",
                AAA_RATIO, ratio
            ));
        }
    }

    if deficiency_passes < DeficiencyKind::ALL.len() {
        issues.push(format!(
            "Insufficient contrast for {} of {} color-vision deficiencies",
            DeficiencyKind::ALL.len() - deficiency_passes,
            DeficiencyKind::ALL.len()
        ));
    }

    if cognitive < 30.0 {
        suggestions.push(
            "Increase the saturation or lightness difference to make the pair easier to read"
                .to_string(),
        );
    }

    (issues, suggestions)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Color {
        Color::from_hex(s).unwrap()
    }

    #[test]
    fn test_black_on_white_is_21() {
        let ratio = contrast_ratio(&hex("#000000"), &hex("#ffffff"));
        assert!((ratio - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_contrast_is_order_independent() {
        let a = hex("#ff0000");
        let b = hex("#ffffff");
        assert_eq!(contrast_ratio(&a, &b), contrast_ratio(&b, &a));
        assert!((contrast_ratio(&b, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_black_on_white_is_aaa() {
        let result = analyze_accessibility(
            &hex("#000000"),
            &hex("#ffffff"),
            &AccessibilityContext::default(),
        );
        assert_eq!(result.contrast_ratio, 21.0);
        assert_eq!(result.wcag_level, WcagLevel::AAA);
        assert_eq!(result.per_deficiency.len(), DeficiencyKind::ALL.len());
        assert!(result.per_deficiency.values().all(|r| r.accessible));
        assert_eq!(result.cognitive_readability, 100.0);
        assert_eq!(result.overall_score, 100.0);
        assert_eq!(result.overall_level, WcagLevel::AAA);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_gray_on_white_is_aa() {
        let result = analyze_accessibility(
            &hex("#767676"),
            &hex("#ffffff"),
            &AccessibilityContext::default(),
        );
        assert!((result.contrast_ratio - 4.54).abs() < 0.01);
        assert_eq!(result.wcag_level, WcagLevel::AA);
        assert_eq!(result.color_blind_pass_rate(), 1.0);
        assert_eq!(result.overall_level, WcagLevel::AA);
    }

    #[test]
    fn test_red_on_green_fails() {
        let result = analyze_accessibility(
            &hex("#ff0000"),
            &hex("#00ff00"),
            &AccessibilityContext::default(),
        );
        assert_eq!(result.wcag_level, WcagLevel::Fail);
        assert!(result.overall_level < WcagLevel::AA);
        assert!(!result.issues.is_empty());
        let protan = &result.per_deficiency[&DeficiencyKind::Protanopia];
        assert!(!protan.accessible);
        assert!(!protan.suggestions.is_empty());
    }

    #[test]
    fn test_large_text_relaxes_minimum() {
        let fg = hex("#888888");
        let bg = hex("#ffffff");
        let ratio = contrast_ratio(&fg, &bg);
        assert!(ratio > 3.0 && ratio < 4.5);

        let normal = analyze_accessibility(&fg, &bg, &AccessibilityContext::default());
        let large = analyze_accessibility(
            &fg,
            &bg,
            &AccessibilityContext {
                text_size: TextSize::Large,
                ..Default::default()
            },
        );

        assert!(normal.issues.iter().any(|i| i.contains("AA minimum")));
        assert!(!large.issues.iter().any(|i| i.contains("AA minimum")));
        assert_eq!(normal.wcag_level, WcagLevel::A);
    }

    #[test]
    fn test_critical_content_wants_aaa() {
        let context = AccessibilityContext {
            importance: Importance::Critical,
            ..Default::default()
        };
        let result = analyze_accessibility(&hex("#767676"), &hex("#ffffff"), &context);
        assert!(result.issues.iter().any(|i| i.contains("AAA")));
    }

    #[test]
    fn test_levels() {
        assert_eq!(WcagLevel::from_contrast(7.0), WcagLevel::AAA);
        assert_eq!(WcagLevel::from_contrast(4.5), WcagLevel::AA);
        assert_eq!(WcagLevel::from_contrast(3.0), WcagLevel::A);
        assert_eq!(WcagLevel::from_contrast(2.99), WcagLevel::Fail);
        assert_eq!(WcagLevel::from_score(90.0), WcagLevel::AAA);
        assert_eq!(WcagLevel::from_score(70.0), WcagLevel::AA);
        assert_eq!(WcagLevel::from_score(50.0), WcagLevel::A);
        assert_eq!(WcagLevel::from_score(49.9), WcagLevel::Fail);
        assert_eq!(serde_json::to_string(&WcagLevel::Fail).unwrap(), "\"FAIL\"");
    }

    #[test]
    fn test_context_deserializes_with_defaults() {
        let context: AccessibilityContext =
            serde_json::from_str(r#"{"usage": "ui_component"}"#).unwrap();
        assert_eq!(context.usage, Usage::UiComponent);
        assert_eq!(context.text_size, TextSize::Normal);
        assert_eq!(context.importance, Importance::Medium);
    }
}
