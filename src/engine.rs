//! Engine instance composing configuration, caches and the color operations
//!
//! Callers construct a [`ColorEngine`] and pass it around; there is no global
//! instance. Caches are owned by the engine, so separate engines never share
//! state.

use crate::accessibility::{self, AccessibilityContext, AccessibilityResult};
use crate::analysis::{self, ColorAnalysis};
use crate::cache::{CacheSet, CacheStats};
use crate::catalog::{self, PaintBrand, PaintColor};
use crate::color::{Color, ColorConversions};
use crate::config::EngineConfig;
use crate::distance::{self, DistanceMetric};
use crate::error::ColorError;
use crate::harmony::{self, HarmonyKind};
use crate::recipe::{PaintRecipe, RecipeSynthesizer};
use crate::vision::{self, DeficiencyKind};

pub struct ColorEngine {
    config: EngineConfig,
    caches: CacheSet,
    synthesizer: RecipeSynthesizer,
}

impl ColorEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ColorError> {
        config.validate()?;
        let caches = CacheSet::new(&config)?;
        let synthesizer = RecipeSynthesizer::new(config.batch_usage_fraction);

        tracing::debug!(
            "Color engine ready (caching {}, capacities {}/{}/{})",
            if config.caching_enabled { "on" } else { "off" },
            config.conversion_cache_capacity,
            config.palette_cache_capacity,
            config.analysis_cache_capacity
        );

        Ok(Self {
            config,
            caches,
            synthesizer,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse a hex string
    pub fn convert(&self, hex: &str) -> Result<Color, ColorError> {
        self.convert_all(hex).map(|converted| converted.color)
    }

    /// Parse a hex string and derive every representation.
    ///
    /// Memoized by the trimmed, lowercased input, so a hit skips both parsing
    /// and derivation. Malformed input is never cached.
    pub fn convert_all(&self, hex: &str) -> Result<ColorConversions, ColorError> {
        let parse = || Color::from_hex(hex).map(|color| ColorConversions::of(&color));
        if !self.config.caching_enabled {
            return parse();
        }
        self.caches
            .conversions
            .get_or_try_insert_with(conversion_key(hex), parse)
    }

    pub fn distance(&self, a: &Color, b: &Color, metric: DistanceMetric) -> f64 {
        distance::distance(a, b, metric)
    }

    pub fn closest_match<'a>(
        &self,
        target: &Color,
        brand: &'a PaintBrand,
    ) -> Result<&'a PaintColor, ColorError> {
        catalog::closest_match(target, brand)
    }

    pub fn generate_recipe(
        &self,
        target: &Color,
        brand: &PaintBrand,
    ) -> Result<PaintRecipe, ColorError> {
        self.synthesizer.synthesize(target, brand)
    }

    pub fn simulate(&self, color: &Color, kind: DeficiencyKind) -> Color {
        vision::simulate(color, kind)
    }

    /// Recomputed on every call; the result depends on the context
    pub fn analyze_accessibility(
        &self,
        fg: &Color,
        bg: &Color,
        context: &AccessibilityContext,
    ) -> AccessibilityResult {
        accessibility::analyze_accessibility(fg, bg, context)
    }

    pub fn generate_palette(
        &self,
        base: &Color,
        kind: HarmonyKind,
    ) -> Result<Vec<Color>, ColorError> {
        if !self.config.caching_enabled {
            return harmony::generate_palette(base, kind);
        }
        self.caches
            .palettes
            .get_or_try_insert_with(format!("palette:{}:{}", kind, base.hex()), || {
                harmony::generate_palette(base, kind)
            })
    }

    pub fn analyze_color(&self, color: &Color) -> ColorAnalysis {
        if !self.config.caching_enabled {
            return analysis::analyze_color(color);
        }
        self.caches
            .analyses
            .get_or_insert_with(format!("analysis:{}", color.hex()), || {
                analysis::analyze_color(color)
            })
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.caches.stats()
    }

    pub fn clear_caches(&self) {
        self.caches.clear();
    }
}

/// Cache key for a hex input; equal for every spelling of the same valid color
fn conversion_key(hex: &str) -> String {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    format!("convert:{}", digits.to_ascii_lowercase())
}
