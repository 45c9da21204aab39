//! Color science and paint-recipe engine.
//!
//! Converts between hex, RGB, HSL, CMYK and CIE-LAB, measures perceptual
//! distance, matches colors against paint catalogs, synthesizes mixing
//! recipes, simulates color-vision deficiencies and scores foreground and
//! background pairs for accessibility.
//!
//! Everything is pure and deterministic. [`ColorEngine`] adds bounded,
//! per-instance memoization on top of the free functions.

pub mod accessibility;
pub mod analysis;
pub mod cache;
pub mod catalog;
pub mod color;
pub mod config;
pub mod distance;
pub mod engine;
pub mod error;
pub mod harmony;
pub mod logging;
pub mod recipe;
pub mod vision;

pub use accessibility::{
    analyze_accessibility, contrast_ratio, AccessibilityContext, AccessibilityResult, WcagLevel,
};
pub use analysis::{analyze_color, ColorAnalysis};
pub use cache::CacheStats;
pub use catalog::{closest_match, match_palette, reference_brand, PaintBrand, PaintColor};
pub use color::{convert, Color, ColorConversions};
pub use config::EngineConfig;
pub use distance::{distance, DistanceMetric};
pub use engine::ColorEngine;
pub use error::ColorError;
pub use harmony::{generate_palette, HarmonyKind};
pub use recipe::{generate_recipe, generate_recipe_from_hex, PaintRecipe};
pub use vision::{simulate, DeficiencyKind};
