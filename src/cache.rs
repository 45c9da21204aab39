//! Bounded LRU memoization
//!
//! Entries are keyed by a canonical string (operation name plus serialized
//! arguments). Eviction is purely least-recently-used by capacity: there is
//! no time-based expiry. Reads promote, so every cache sits behind its own
//! mutex.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use lru::LruCache;
use serde::Serialize;

use crate::analysis::ColorAnalysis;
use crate::color::{Color, ColorConversions};
use crate::config::EngineConfig;
use crate::error::ColorError;

/// Counters for a single cache family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheFamilyStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// A named, bounded LRU cache
pub struct ColorCache<V> {
    name: &'static str,
    entries: Mutex<LruCache<String, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> ColorCache<V> {
    pub fn new(name: &'static str, capacity: NonZeroUsize) -> Self {
        Self {
            name,
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Like [`ColorCache::new`] but rejects a zero capacity
    pub fn with_capacity(name: &'static str, capacity: usize) -> Result<Self, ColorError> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| ColorError::Config(format!("{} cache capacity must be > 0", name)))?;
        Ok(Self::new(name, capacity))
    }

    // A panic while holding the lock cannot leave the LRU half-updated in a
    // way that matters for pure values, so recover from poisoning.
    fn lock(&self) -> MutexGuard<'_, LruCache<String, V>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Look up an entry, promoting it to most-recently-used
    pub fn get(&self, key: &str) -> Option<V> {
        let value = self.lock().get(key).cloned();
        match value {
            Some(_) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("{} cache hit: {}", self.name, key);
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("{} cache miss: {}", self.name, key);
            }
        }
        value
    }

    /// Store an entry, evicting the single oldest one when over capacity
    pub fn set(&self, key: String, value: V) {
        let mut entries = self.lock();
        if let Some((old_key, _)) = entries.push(key.clone(), value) {
            if old_key != key {
                tracing::debug!("{} cache evicted: {}", self.name, old_key);
            }
        }
    }

    /// Return the cached value or compute, store and return it.
    ///
    /// The lock is not held while `compute` runs.
    pub fn get_or_insert_with<F>(&self, key: String, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.set(key, value.clone());
        value
    }

    /// Fallible variant of [`ColorCache::get_or_insert_with`]; errors are not cached
    pub fn get_or_try_insert_with<E, F>(&self, key: String, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute()?;
        self.set(key, value.clone());
        Ok(value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    pub fn clear(&self) {
        self.lock().clear();
        tracing::debug!("{} cache cleared", self.name);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn stats(&self) -> CacheFamilyStats {
        let entries = self.lock();
        CacheFamilyStats {
            entries: entries.len(),
            capacity: entries.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Per-family statistics for every cache the engine owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub conversions: CacheFamilyStats,
    pub palettes: CacheFamilyStats,
    pub analyses: CacheFamilyStats,
}

/// The three cache families, each sized independently
pub struct CacheSet {
    /// Hex input -> every representation of the parsed color
    pub conversions: ColorCache<ColorConversions>,
    /// Base color + harmony kind -> generated palette
    pub palettes: ColorCache<Vec<Color>>,
    /// Color -> full analysis
    pub analyses: ColorCache<ColorAnalysis>,
}

impl CacheSet {
    pub fn new(config: &EngineConfig) -> Result<Self, ColorError> {
        Ok(Self {
            conversions: ColorCache::with_capacity(
                "conversion",
                config.conversion_cache_capacity,
            )?,
            palettes: ColorCache::with_capacity("palette", config.palette_cache_capacity)?,
            analyses: ColorCache::with_capacity("analysis", config.analysis_cache_capacity)?,
        })
    }

    pub fn clear(&self) {
        self.conversions.clear();
        self.palettes.clear();
        self.analyses.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            conversions: self.conversions.stats(),
            palettes: self.palettes.stats(),
            analyses: self.analyses.stats(),
        }
    }
}
