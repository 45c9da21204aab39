//! Engine configuration
//!
//! Defaults match the reference cache sizes. Values can come from JSON or be
//! overridden through `PAINTMIX_*` environment variables.

use serde::{Deserialize, Serialize};

use crate::error::ColorError;

const ENV_CONVERSION_CACHE: &str = "PAINTMIX_CONVERSION_CACHE";
const ENV_PALETTE_CACHE: &str = "PAINTMIX_PALETTE_CACHE";
const ENV_ANALYSIS_CACHE: &str = "PAINTMIX_ANALYSIS_CACHE";
const ENV_CACHE_ENABLED: &str = "PAINTMIX_CACHE_ENABLED";
const ENV_BATCH_USAGE: &str = "PAINTMIX_BATCH_USAGE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of the hex -> color cache
    pub conversion_cache_capacity: usize,
    /// Capacity of the generated palette cache
    pub palette_cache_capacity: usize,
    /// Capacity of the full color analysis cache
    pub analysis_cache_capacity: usize,
    /// When false every call recomputes
    pub caching_enabled: bool,
    /// Share of a mixed batch a typical project consumes, used for recipe cost
    pub batch_usage_fraction: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            conversion_cache_capacity: 500,
            palette_cache_capacity: 200,
            analysis_cache_capacity: 300,
            caching_enabled: true,
            batch_usage_fraction: 0.4,
        }
    }
}

impl EngineConfig {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ColorError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by environment variables.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Result<Self, ColorError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ColorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        override_from(&lookup, ENV_CONVERSION_CACHE, &mut config.conversion_cache_capacity);
        override_from(&lookup, ENV_PALETTE_CACHE, &mut config.palette_cache_capacity);
        override_from(&lookup, ENV_ANALYSIS_CACHE, &mut config.analysis_cache_capacity);
        override_from(&lookup, ENV_CACHE_ENABLED, &mut config.caching_enabled);
        override_from(&lookup, ENV_BATCH_USAGE, &mut config.batch_usage_fraction);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ColorError> {
        let capacities = [
            ("conversion", self.conversion_cache_capacity),
            ("palette", self.palette_cache_capacity),
            ("analysis", self.analysis_cache_capacity),
        ];
        for (name, capacity) in capacities {
            if capacity == 0 {
                return Err(ColorError::Config(format!(
                    "{} cache capacity must be > 0",
                    name
                )));
            }
        }

        let fraction = self.batch_usage_fraction;
        if !(fraction.is_finite() && fraction > 0.0 && fraction <= 1.0) {
            return Err(ColorError::Config(format!(
                "batch usage fraction must be in (0, 1], got {}",
                fraction
            )));
        }

        Ok(())
    }
}

fn override_from<F, T>(lookup: &F, name: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(raw) = lookup(name) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!("Ignoring unparseable {}={:?}", name, raw),
        }
    }
}
