//! Runtime message lookup.
//!
//! A [`MessageSource`] hands out one hash → translation map per locale.
//! Lookups fall back from the requested locale to the default locale and
//! finally to the natural-language text the caller supplied.

mod cache;
mod catalog;
mod memory;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub use cache::{
    CacheConfig,
    CatalogCache,
};
pub use catalog::CatalogMessageSource;
pub use memory::StaticMessageSource;

/// Translations of one locale, keyed by message hash.
pub type Catalog = Arc<HashMap<String, String>>;

/// Outcome of [`MessageSource::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// False when neither the locale nor the default locale had a translation.
    pub found: bool,
    /// The translation, or the natural text when not found.
    pub translation: String,
}

/// Where compiled translations come from.
pub trait MessageSource: Send + Sync + fmt::Debug {
    /// Catalog for a locale; empty when none is available.
    fn catalog(&self, locale: &str) -> Catalog;

    fn default_locale(&self) -> &str;

    /// Locales with a catalog, sorted.
    fn supported_locales(&self) -> Vec<String>;

    /// Drops cached catalogs so the next lookup reads them again.
    fn reload(&self);

    /// Loads catalogs ahead of the first lookup. Never fails; problems are logged.
    fn warm_up(&self, locales: &[&str]) {
        for locale in locales {
            let catalog = self.catalog(locale);
            tracing::debug!(locale, entries = catalog.len(), "Warmed up message catalog");
        }
    }

    /// Translation in exactly this locale. Blank translations count as missing.
    fn lookup(&self, hash: &str, locale: &str) -> Option<String> {
        self.catalog(locale).get(hash).filter(|t| !t.trim().is_empty()).cloned()
    }

    /// Resolves a message: locale, then default locale, then `natural_text`.
    fn resolve(&self, hash: &str, natural_text: &str, locale: &str) -> Resolution {
        let default_locale = self.default_locale();
        let translation = self.lookup(hash, locale).or_else(|| {
            (!same_locale(locale, default_locale))
                .then(|| self.lookup(hash, default_locale))
                .flatten()
        });

        match translation {
            Some(translation) => Resolution { found: true, translation },
            None => {
                tracing::trace!(hash, locale, "No translation found, using natural text");
                Resolution { found: false, translation: natural_text.to_string() }
            }
        }
    }

    /// True if `resolve` would find a translation.
    fn exists(&self, hash: &str, locale: &str) -> bool {
        self.lookup(hash, locale).is_some()
            || (!same_locale(locale, self.default_locale())
                && self.lookup(hash, self.default_locale()).is_some())
    }
}

fn same_locale(a: &str, b: &str) -> bool {
    crate::formats::normalize_locale(a) == crate::formats::normalize_locale(b)
}
