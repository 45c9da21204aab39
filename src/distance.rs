//! Perceptual color distance
//!
//! Two metrics, chosen explicitly by the caller:
//! - Delta-E CIE76, Euclidean distance in LAB. Used for palette-level accuracy.
//! - Weighted "redmean" over RGB. Cheap, used for catalog matching.

use serde::{Deserialize, Serialize};

use crate::color::{Color, Lab, Rgb};

/// Largest plain Euclidean RGB distance, `sqrt(3 * 255^2)`
pub const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    Redmean,
    #[serde(rename = "deltae76")]
    DeltaE76,
}

/// Distance between two colors using the requested metric
pub fn distance(a: &Color, b: &Color, metric: DistanceMetric) -> f64 {
    match metric {
        DistanceMetric::Redmean => redmean(a.rgb(), b.rgb()),
        DistanceMetric::DeltaE76 => delta_e76_lab(&a.lab(), &b.lab()),
    }
}

/// Weighted Euclidean distance in RGB space.
///
/// Channel weights follow the mean red value of the pair.
#[inline]
pub fn redmean(c1: Rgb, c2: Rgb) -> f64 {
    let rmean = (c1.r as f64 + c2.r as f64) / 2.0;
    let dr = c1.r as f64 - c2.r as f64;
    let dg = c1.g as f64 - c2.g as f64;
    let db = c1.b as f64 - c2.b as f64;

    let wr = 2.0 + rmean / 256.0;
    let wg = 4.0;
    let wb = 2.0 + (255.0 - rmean) / 256.0;

    (wr * dr * dr + wg * dg * dg + wb * db * db).sqrt()
}

/// CIE76 Delta E between two colors
pub fn delta_e76(a: &Color, b: &Color) -> f64 {
    delta_e76_lab(&a.lab(), &b.lab())
}

/// CIE76 Delta E between two LAB values
#[inline]
pub fn delta_e76_lab(a: &Lab, b: &Lab) -> f64 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// Map a redmean distance onto a 0-100 match accuracy, one decimal.
///
/// Normalized by [`MAX_RGB_DISTANCE`]; redmean can exceed that bound for very
/// distant pairs, so the result is floored at zero.
pub fn match_accuracy(redmean_distance: f64) -> f64 {
    let accuracy = 100.0 - redmean_distance / MAX_RGB_DISTANCE * 100.0;
    (accuracy.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_color(rng: &mut StdRng) -> Color {
        Color::new(rng.gen(), rng.gen(), rng.gen())
    }

    #[test]
    fn test_identity_is_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let c = random_color(&mut rng);
            assert_eq!(distance(&c, &c, DistanceMetric::Redmean), 0.0);
            assert_eq!(distance(&c, &c, DistanceMetric::DeltaE76), 0.0);
        }
    }

    #[test]
    fn test_symmetry() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let a = random_color(&mut rng);
            let b = random_color(&mut rng);
            for metric in [DistanceMetric::Redmean, DistanceMetric::DeltaE76] {
                let ab = distance(&a, &b, metric);
                let ba = distance(&b, &a, metric);
                assert!(ab >= 0.0);
                assert!((ab - ba).abs() < 1e-9, "{:?}: {} vs {}", metric, ab, ba);
            }
        }
    }

    #[test]
    fn test_redmean_known_value() {
        // Pure red vs black: rmean = 127.5, only the red channel differs
        let d = redmean(Rgb::new(255, 0, 0), Rgb::new(0, 0, 0));
        let expected = ((2.0 + 127.5 / 256.0) * 255.0_f64 * 255.0).sqrt();
        assert!((d - expected).abs() < 1e-9);
    }

    #[test]
    fn test_delta_e_black_white() {
        let d = delta_e76(&Color::BLACK, &Color::WHITE);
        assert!((d - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_match_accuracy() {
        assert_eq!(match_accuracy(0.0), 100.0);
        assert_eq!(match_accuracy(MAX_RGB_DISTANCE / 2.0), 50.0);
        assert_eq!(match_accuracy(10_000.0), 0.0);
        assert_eq!(match_accuracy(4.4167), 99.0);
    }

    #[test]
    fn test_metric_serde_names() {
        assert_eq!(
            serde_json::to_string(&DistanceMetric::DeltaE76).unwrap(),
            "\"deltae76\""
        );
        assert_eq!(
            serde_json::from_str::<DistanceMetric>("\"redmean\"").unwrap(),
            DistanceMetric::Redmean
        );
    }
}
