//! Per-locale catalog cache with time-based expiry.

use std::time::Duration;

use moka::sync::Cache;

use super::Catalog;
use crate::formats::normalize_locale;

/// Default time a loaded catalog stays cached.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    /// Maximum number of cached locales.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_CACHE_TTL, max_capacity: 256 }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Read-through cache of locale → catalog.
///
/// Each entry is an immutable `Arc`, so readers never see a half-loaded map;
/// a reload replaces the entry as a whole.
#[derive(Clone)]
pub struct CatalogCache {
    inner: Cache<String, Catalog>,
    config: CacheConfig,
}

impl std::fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCache")
            .field("config", &self.config)
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

impl CatalogCache {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        let inner =
            Cache::builder().max_capacity(config.max_capacity).time_to_live(config.ttl).build();
        Self { inner, config }
    }

    #[must_use]
    pub const fn config(&self) -> CacheConfig {
        self.config
    }

    /// Cached catalog for `locale`, loading it with `load` on a miss.
    ///
    /// Concurrent misses for one locale run `load` once.
    pub fn get_or_load(&self, locale: &str, load: impl FnOnce() -> Catalog) -> Catalog {
        self.inner.get_with(normalize_locale(locale), load)
    }

    #[must_use]
    pub fn get(&self, locale: &str) -> Option<Catalog> {
        self.inner.get(&normalize_locale(locale))
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
