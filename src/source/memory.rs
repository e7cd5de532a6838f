//! In-memory message source.

use std::collections::HashMap;
use std::sync::Arc;

use super::{
    Catalog,
    MessageSource,
};
use crate::formats::normalize_locale;

/// Catalogs held in memory; nothing to reload.
#[derive(Debug, Clone, Default)]
pub struct StaticMessageSource {
    catalogs: HashMap<String, Catalog>,
    default_locale: String,
}

impl StaticMessageSource {
    #[must_use]
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self { catalogs: HashMap::new(), default_locale: default_locale.into() }
    }

    /// Adds or replaces the catalog of a locale.
    #[must_use]
    pub fn with_catalog<K, V>(
        mut self,
        locale: &str,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let catalog = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.catalogs.insert(normalize_locale(locale), Arc::new(catalog));
        self
    }
}

impl MessageSource for StaticMessageSource {
    fn catalog(&self, locale: &str) -> Catalog {
        self.catalogs.get(&normalize_locale(locale)).cloned().unwrap_or_default()
    }

    fn default_locale(&self) -> &str {
        &self.default_locale
    }

    fn supported_locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.catalogs.keys().cloned().collect();
        locales.sort();
        locales
    }

    fn reload(&self) {}
}
