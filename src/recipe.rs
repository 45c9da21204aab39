//! Paint recipe synthesis
//!
//! Starting from the closest catalog paint, a recipe is built by
//! 1. seeding the base ratio from match accuracy and luminance agreement,
//! 2. adding at most one luminance correction (white or black),
//! 3. adding at most one warm/cool hue correction,
//! 4. giving the base whatever remains of 100.
//!
//! Corrections keep their capped absolute ratios, so the base never drops
//! below 100 minus both caps.
//!
//! Everything is deterministic: the same target and catalog always yield the
//! same recipe.

use serde::Serialize;

use crate::catalog::{self, Opacity, PaintBrand, PaintColor, Permanence};
use crate::color::{linear_to_srgb, srgb_to_linear, Color};
use crate::distance;
use crate::error::ColorError;

/// Share of a mixed batch a typical project consumes
pub const DEFAULT_BATCH_USAGE_FRACTION: f64 = 0.4;

const BASE_RATIO_MIN: f64 = 50.0;
const BASE_RATIO_MAX: f64 = 90.0;

/// Relative luminance gap (0-1) that triggers a white or black correction
const LUMINANCE_THRESHOLD: f64 = 0.1;
const WHITE_SCALE: f64 = 50.0;
const WHITE_CAP: f64 = 25.0;
// Black desaturates aggressively, hence the smaller cap
const BLACK_SCALE: f64 = 30.0;
const BLACK_CAP: f64 = 15.0;

/// Warmth gap that triggers a hue correction
const HUE_THRESHOLD: f64 = 0.1;
const HUE_SCALE: f64 = 40.0;
const HUE_CAP: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// One paint in a recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingredient {
    pub paint: PaintColor,
    /// Percentage of the mix, 0-100
    pub ratio: f64,
    pub amount_label: String,
}

/// Output of a synthesis call. Base ingredient first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaintRecipe {
    pub target_color: Color,
    pub ingredients: Vec<Ingredient>,
    pub total_cost: f64,
    pub mixing_instructions: Vec<String>,
    pub tips: Vec<String>,
    pub difficulty: Difficulty,
    /// Base match accuracy, 0-100
    pub accuracy: f64,
    /// Base ratio as seeded from accuracy and luminance agreement
    pub base_seed_ratio: f64,
    /// Ratio-weighted average of the ingredients in linear RGB
    pub estimated_mix: Color,
    /// Delta-E76 between the estimated mix and the target
    pub estimated_delta_e: f64,
}

impl PaintRecipe {
    pub fn base(&self) -> Option<&Ingredient> {
        self.ingredients.first()
    }

    pub fn total_ratio(&self) -> f64 {
        self.ingredients.iter().map(|i| i.ratio).sum()
    }
}

/// Which correction an added ingredient performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Correction {
    Lighten,
    Darken,
    Warm,
    Cool,
}

struct Pending<'a> {
    paint: &'a PaintColor,
    ratio: f64,
    correction: Option<Correction>,
}

/// Recipe synthesizer with its cost model
#[derive(Debug, Clone, Copy)]
pub struct RecipeSynthesizer {
    batch_usage_fraction: f64,
}

impl Default for RecipeSynthesizer {
    fn default() -> Self {
        Self {
            batch_usage_fraction: DEFAULT_BATCH_USAGE_FRACTION,
        }
    }
}

impl RecipeSynthesizer {
    pub fn new(batch_usage_fraction: f64) -> Self {
        Self {
            batch_usage_fraction,
        }
    }

    pub fn synthesize(
        &self,
        target: &Color,
        brand: &PaintBrand,
    ) -> Result<PaintRecipe, ColorError> {
        let base_match = catalog::nearest(target, brand)?;
        let base = base_match.paint;
        let accuracy = distance::match_accuracy(base_match.distance);

        let luminance_gap = target.relative_luminance() - base.color.relative_luminance();
        let base_seed_ratio = seed_base_ratio(accuracy, luminance_gap);

        tracing::debug!(
            "Recipe for {}: base '{}' (accuracy {}, seed {:.1}, luminance gap {:.3})",
            target,
            base.name,
            accuracy,
            base_seed_ratio,
            luminance_gap
        );

        let mut corrections: Vec<Pending> = Vec::new();

        if let Some(pending) = luminance_correction(brand, base, luminance_gap) {
            corrections.push(pending);
        }

        let warmth_gap = target.warmth() - base.color.warmth();
        if let Some(pending) = hue_correction(brand, base, warmth_gap, &corrections) {
            corrections.push(pending);
        }

        for c in &mut corrections {
            c.ratio = round_to(c.ratio, 1);
        }
        let correction_total: f64 = corrections.iter().map(|c| c.ratio).sum();

        let mut pending = Vec::with_capacity(corrections.len() + 1);
        pending.push(Pending {
            paint: base,
            ratio: round_to((100.0 - correction_total).max(0.0), 1),
            correction: None,
        });
        pending.extend(corrections);

        let ratios: Vec<f64> = pending.iter().map(|p| p.ratio).collect();

        let ingredients: Vec<Ingredient> = pending
            .iter()
            .zip(&ratios)
            .map(|(p, &ratio)| Ingredient {
                paint: p.paint.clone(),
                ratio,
                amount_label: amount_label(ratio),
            })
            .collect();

        let total_cost = round_to(
            ingredients
                .iter()
                .map(|i| i.paint.price * (i.ratio / 100.0) * self.batch_usage_fraction)
                .sum(),
            2,
        );

        let difficulty = difficulty_for(&ratios);
        let estimated_mix = estimate_mix(&ingredients);
        let estimated_delta_e = round_to(distance::delta_e76(target, &estimated_mix), 2);
        let mixing_instructions = mixing_instructions(target, &ingredients, &pending);
        let tips = mixing_tips(&ingredients, accuracy);

        Ok(PaintRecipe {
            target_color: *target,
            ingredients,
            total_cost,
            mixing_instructions,
            tips,
            difficulty,
            accuracy,
            base_seed_ratio,
            estimated_mix,
            estimated_delta_e,
        })
    }
}

/// Synthesize with the default cost model
pub fn generate_recipe(target: &Color, brand: &PaintBrand) -> Result<PaintRecipe, ColorError> {
    RecipeSynthesizer::default().synthesize(target, brand)
}

/// Validate a hex string before touching the catalog, then synthesize
pub fn generate_recipe_from_hex(
    hex: &str,
    brand: &PaintBrand,
) -> Result<PaintRecipe, ColorError> {
    let target = Color::from_hex(hex)?;
    generate_recipe(&target, brand)
}

fn seed_base_ratio(accuracy: f64, luminance_gap: f64) -> f64 {
    let mut ratio = 60.0 + 0.3 * accuracy;
    let gap = luminance_gap.abs();
    if gap > 0.3 {
        ratio -= 10.0;
    } else if gap < 0.1 {
        ratio += 5.0;
    }
    ratio.clamp(BASE_RATIO_MIN, BASE_RATIO_MAX)
}

fn luminance_correction<'a>(
    brand: &'a PaintBrand,
    base: &PaintColor,
    gap: f64,
) -> Option<Pending<'a>> {
    let (correction, paint, ratio) = if gap > LUMINANCE_THRESHOLD {
        (Correction::Lighten, lightener(brand), (gap * WHITE_SCALE).min(WHITE_CAP))
    } else if gap < -LUMINANCE_THRESHOLD {
        (Correction::Darken, darkener(brand), (-gap * BLACK_SCALE).min(BLACK_CAP))
    } else {
        return None;
    };

    match paint {
        Some(paint) if paint.id != base.id => Some(Pending {
            paint,
            ratio,
            correction: Some(correction),
        }),
        _ => {
            tracing::warn!(
                "No paint in '{}' to {:?} base '{}'",
                brand.name,
                correction,
                base.name
            );
            None
        }
    }
}

/// A paint named white, else the lightest paint
fn lightener(brand: &PaintBrand) -> Option<&PaintColor> {
    brand.find_by_name("white").or_else(|| {
        brand
            .colors()
            .iter()
            .max_by(|a, b| {
                a.color
                    .relative_luminance()
                    .total_cmp(&b.color.relative_luminance())
            })
    })
}

/// A paint named black, else the darkest paint
fn darkener(brand: &PaintBrand) -> Option<&PaintColor> {
    brand.find_by_name("black").or_else(|| {
        brand
            .colors()
            .iter()
            .min_by(|a, b| {
                a.color
                    .relative_luminance()
                    .total_cmp(&b.color.relative_luminance())
            })
    })
}

fn hue_correction<'a>(
    brand: &'a PaintBrand,
    base: &PaintColor,
    warmth_gap: f64,
    existing: &[Pending<'a>],
) -> Option<Pending<'a>> {
    if warmth_gap.abs() <= HUE_THRESHOLD {
        return None;
    }

    let (correction, needles): (Correction, &[&str]) = if warmth_gap > 0.0 {
        (Correction::Warm, &["red", "yellow"])
    } else {
        (Correction::Cool, &["blue"])
    };

    let usable = |p: &PaintColor| p.id != base.id && existing.iter().all(|e| e.paint.id != p.id);
    let paint = needles.iter().find_map(|needle| {
        brand
            .colors()
            .iter()
            .find(|p| p.name.to_lowercase().contains(needle) && usable(*p))
    });

    let Some(paint) = paint else {
        tracing::warn!(
            "No paint in '{}' to {:?} base '{}'",
            brand.name,
            correction,
            base.name
        );
        return None;
    };

    Some(Pending {
        paint,
        ratio: (warmth_gap.abs() * HUE_SCALE).min(HUE_CAP),
        correction: Some(correction),
    })
}

/// Human amount label for a ratio
pub fn amount_label(ratio: f64) -> String {
    if ratio >= 50.0 {
        let parts = ((ratio / 20.0).round() as u32).max(2);
        format!("{} parts", parts)
    } else if ratio >= 20.0 {
        "1 part".to_string()
    } else if ratio >= 10.0 {
        "medium amount".to_string()
    } else if ratio >= 5.0 {
        "small amount".to_string()
    } else {
        "tiny amount".to_string()
    }
}

pub fn difficulty_for(ratios: &[f64]) -> Difficulty {
    if ratios.len() > 3 || ratios.iter().any(|&r| r < 5.0) {
        Difficulty::Advanced
    } else if ratios.len() == 3 {
        Difficulty::Intermediate
    } else {
        Difficulty::Beginner
    }
}

fn estimate_mix(ingredients: &[Ingredient]) -> Color {
    let mut linear = [0.0f64; 3];
    for ingredient in ingredients {
        let weight = ingredient.ratio / 100.0;
        let rgb = ingredient.paint.rgb();
        linear[0] += srgb_to_linear(rgb.r) * weight;
        linear[1] += srgb_to_linear(rgb.g) * weight;
        linear[2] += srgb_to_linear(rgb.b) * weight;
    }
    Color::new(
        linear_to_srgb(linear[0]),
        linear_to_srgb(linear[1]),
        linear_to_srgb(linear[2]),
    )
}

fn mixing_instructions(
    target: &Color,
    ingredients: &[Ingredient],
    pending: &[Pending],
) -> Vec<String> {
    let mut steps = Vec::with_capacity(ingredients.len() + 1);

    if let Some(base) = ingredients.first() {
        steps.push(format!(
            "Start with {} of {} ({}) as your base.",
            base.amount_label,
            base.paint.name,
            base.paint.hex()
        ));
    }

    for (ingredient, p) in ingredients.iter().zip(pending).skip(1) {
        let step = match p.correction {
            Some(Correction::Darken) => format!(
                "Add {} of {} a little at a time; it darkens and dulls the mix quickly.",
                ingredient.amount_label, ingredient.paint.name
            ),
            Some(Correction::Lighten) => format!(
                "Lighten with {} of {}, mixing thoroughly after each addition.",
                ingredient.amount_label, ingredient.paint.name
            ),
            Some(Correction::Warm) | Some(Correction::Cool) | None => format!(
                "Shift the hue with {} of {}, mixing thoroughly after each addition.",
                ingredient.amount_label, ingredient.paint.name
            ),
        };
        steps.push(step);
    }

    steps.push(format!(
        "Compare a dried swatch against the target {} and adjust in small increments.",
        target
    ));
    steps
}

fn mixing_tips(ingredients: &[Ingredient], accuracy: f64) -> Vec<String> {
    let mut tips = Vec::new();

    for ingredient in ingredients {
        let paint = &ingredient.paint;
        if paint.opacity == Opacity::Transparent {
            tips.push(format!(
                "{} is transparent; build it up in thin layers for full strength.",
                paint.name
            ));
        }
        if paint.permanence == Permanence::Fugitive {
            tips.push(format!(
                "{} is fugitive and may fade; avoid it for work meant to last.",
                paint.name
            ));
        }
        if paint.series >= 4 {
            tips.push(format!(
                "{} is a series {} paint; mix small batches to control cost.",
                paint.name, paint.series
            ));
        }
    }

    if ingredients
        .iter()
        .skip(1)
        .any(|i| i.paint.name.to_lowercase().contains("black"))
    {
        tips.push(
            "Black overpowers a mix quickly; add it with a palette knife tip, not a brush load."
                .to_string(),
        );
    }

    if accuracy < 70.0 {
        tips.push(
            "The closest catalog paint is a distant match; expect to fine-tune by eye.".to_string(),
        );
    }
    tips.push("Mix more than you need; matching a second batch exactly is difficult.".to_string());
    tips
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
