//! Message source backed by compiled catalog files on disk.

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;

use super::{
    CacheConfig,
    Catalog,
    CatalogCache,
    MessageSource,
};
use crate::config::ConfigManager;
use crate::formats::{
    CatalogFormat,
    FILE_PREFIX,
    normalize_locale,
};

/// Reads `messages_<locale>.<ext>` files from one directory.
///
/// A missing or unreadable file behaves like an empty catalog, so lookups
/// fall back to the default locale or the natural text.
#[derive(Debug)]
pub struct CatalogMessageSource {
    directory: PathBuf,
    format: CatalogFormat,
    default_locale: String,
    /// Overrides directory scanning when set.
    supported_locales: Option<Vec<String>>,
    cache: CatalogCache,
}

impl CatalogMessageSource {
    #[must_use]
    pub fn new(
        directory: impl Into<PathBuf>,
        format: CatalogFormat,
        default_locale: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            format,
            default_locale: default_locale.into(),
            supported_locales: None,
            cache: CatalogCache::default(),
        }
    }

    /// Directory, format, default locale, supported locales and cache TTL
    /// taken from the project settings.
    #[must_use]
    pub fn from_config(manager: &ConfigManager) -> Self {
        let settings = manager.get_settings();
        let source = Self::new(
            manager.message_source_directory(),
            settings.message_source_format(),
            settings.default_locale.clone(),
        )
        .with_cache_config(settings.cache_config());
        match &settings.supported_locales {
            Some(locales) => source.with_supported_locales(locales.clone()),
            None => source,
        }
    }

    #[must_use]
    pub fn with_cache_config(mut self, config: CacheConfig) -> Self {
        self.cache = CatalogCache::new(config);
        self
    }

    #[must_use]
    pub fn with_supported_locales(mut self, locales: Vec<String>) -> Self {
        self.supported_locales = Some(locales);
        self
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[must_use]
    pub const fn format(&self) -> CatalogFormat {
        self.format
    }

    #[must_use]
    pub fn catalog_path(&self, locale: &str) -> PathBuf {
        self.directory.join(self.format.file_name(locale))
    }

    fn load(&self, locale: &str) -> Catalog {
        let path = self.catalog_path(locale);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(locale, path = %path.display(), "No catalog for locale");
                return Arc::new(HashMap::new());
            }
            Err(e) => {
                tracing::warn!(locale, path = %path.display(), "Failed to read catalog: {e}");
                return Arc::new(HashMap::new());
            }
        };

        match self.format.decode(&bytes) {
            Ok(entries) => {
                tracing::debug!(
                    locale,
                    path = %path.display(),
                    entries = entries.len(),
                    "Loaded catalog"
                );
                Arc::new(entries)
            }
            Err(e) => {
                tracing::warn!(locale, path = %path.display(), "Ignoring corrupt catalog: {e}");
                Arc::new(HashMap::new())
            }
        }
    }

    /// Locales found as `messages_<locale>.<ext>` in the directory.
    fn scan_locales(&self) -> Vec<String> {
        let suffix = format!(".{}", self.format.extension());
        let entries = match std::fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(
                    directory = %self.directory.display(),
                    "Cannot list catalog directory: {e}"
                );
                return Vec::new();
            }
        };

        entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let locale = name.strip_prefix(FILE_PREFIX)?.strip_suffix(&suffix)?;
                (!locale.is_empty()).then(|| locale.to_string())
            })
            .collect()
    }
}

impl MessageSource for CatalogMessageSource {
    fn catalog(&self, locale: &str) -> Catalog {
        self.cache.get_or_load(locale, || self.load(locale))
    }

    fn default_locale(&self) -> &str {
        &self.default_locale
    }

    fn supported_locales(&self) -> Vec<String> {
        let mut locales = match &self.supported_locales {
            Some(locales) => locales.iter().map(|l| normalize_locale(l)).collect(),
            None => self.scan_locales(),
        };
        locales.sort();
        locales.dedup();
        locales
    }

    fn reload(&self) {
        tracing::debug!(directory = %self.directory.display(), "Reloading message catalogs");
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::fs;

    use googletest::prelude::*;
    use rstest::*;
    use tempfile::TempDir;

    use super::*;
    use crate::config::CONFIG_FILE_NAME;
    use crate::formats::binary::CatalogWriter;

    fn entries(pairs: &[(&str, &str)]) -> BTreeMap<String, Option<String>> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), Some((*v).to_string()))).collect()
    }

    /// `en` and `fr` binary catalogs; `fr` leaves `h2` blank.
    #[fixture]
    fn catalog_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let writer = CatalogWriter::new();
        writer
            .write_file(
                &dir.path().join("messages_en.bin"),
                "en",
                &entries(&[("h1", "Hello"), ("h2", "Goodbye"), ("h3", "Only English")]),
            )
            .unwrap();
        writer
            .with_compression(true)
            .write_file(
                &dir.path().join("messages_fr.bin"),
                "fr",
                &entries(&[("h1", "Bonjour"), ("h2", " ")]),
            )
            .unwrap();
        dir
    }

    fn source(dir: &TempDir) -> CatalogMessageSource {
        CatalogMessageSource::new(dir.path(), CatalogFormat::Binary, "en")
    }

    #[rstest]
    #[case::exact("h1", "fr", true, "Bonjour")]
    #[case::blank_falls_back_to_default("h2", "fr", true, "Goodbye")]
    #[case::missing_falls_back_to_default("h3", "fr", true, "Only English")]
    #[case::unknown_locale("h1", "de", true, "Hello")]
    #[case::natural_text("nope", "fr", false, "natural")]
    fn resolves_with_fallback(
        catalog_dir: TempDir,
        #[case] hash: &str,
        #[case] locale: &str,
        #[case] found: bool,
        #[case] translation: &str,
    ) {
        let resolution = source(&catalog_dir).resolve(hash, "natural", locale);

        assert_eq!(resolution.found, found);
        assert_eq!(resolution.translation, translation);
    }

    #[rstest]
    fn exists_applies_default_locale(catalog_dir: TempDir) {
        let source = source(&catalog_dir);

        assert!(source.exists("h1", "fr"));
        assert!(source.exists("h3", "fr"));
        assert!(!source.exists("nope", "fr"));
    }

    #[rstest]
    fn lists_locales_from_directory(catalog_dir: TempDir) {
        fs::write(catalog_dir.path().join("messages_fr_CA.json"), "{}").unwrap();
        fs::write(catalog_dir.path().join("notes.bin"), "").unwrap();

        assert_eq!(source(&catalog_dir).supported_locales(), vec!["en", "fr"]);
    }

    #[rstest]
    fn configured_locales_override_scan(catalog_dir: TempDir) {
        let source = source(&catalog_dir)
            .with_supported_locales(vec!["fr-CA".into(), "en".into(), "en".into()]);

        assert_eq!(source.supported_locales(), vec!["en", "fr_CA"]);
    }

    #[googletest::test]
    fn corrupt_catalog_degrades_to_fallback() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("messages_en.bin"), b"FL18\x09garbage").unwrap();
        let source = CatalogMessageSource::new(dir.path(), CatalogFormat::Binary, "en");

        source.warm_up(&["en", "fr"]);

        expect_that!(source.catalog("en").len(), eq(0));
        expect_that!(source.resolve("h1", "Hello", "en").found, eq(false));
    }

    #[rstest]
    fn reload_picks_up_new_files(catalog_dir: TempDir) {
        let source = source(&catalog_dir);
        assert_eq!(source.resolve("h1", "Hello", "fr").translation, "Bonjour");

        CatalogWriter::new()
            .write_file(
                &catalog_dir.path().join("messages_fr.bin"),
                "fr",
                &entries(&[("h1", "Salut")]),
            )
            .unwrap();
        assert_eq!(source.resolve("h1", "Hello", "fr").translation, "Bonjour");

        source.reload();
        assert_eq!(source.resolve("h1", "Hello", "fr").translation, "Salut");
    }

    #[rstest]
    fn from_config_uses_project_settings(catalog_dir: TempDir) {
        fs::write(
            catalog_dir.path().join(CONFIG_FILE_NAME),
            r#"{"outputDirectory": ".", "defaultLocale": "fr", "supportedLocales": ["fr"]}"#,
        )
        .unwrap();
        let mut manager = ConfigManager::new();
        manager.load_settings(Some(catalog_dir.path().to_path_buf())).unwrap();

        let source = CatalogMessageSource::from_config(&manager);

        assert_eq!(source.format(), CatalogFormat::Binary);
        assert_eq!(source.default_locale(), "fr");
        assert_eq!(source.supported_locales(), vec!["fr"]);
        assert_eq!(source.resolve("h1", "Hello", "de").translation, "Bonjour");
        assert!(!source.resolve("h3", "Only English", "de").found);
    }

    #[test]
    fn reads_json_and_properties_catalogs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("messages_fr_CA.json"), r#"{"h1": "Allô"}"#).unwrap();
        fs::write(dir.path().join("messages_fr_CA.properties"), "h1=Bonjour\n").unwrap();

        let json = CatalogMessageSource::new(dir.path(), CatalogFormat::Json, "en");
        let properties = CatalogMessageSource::new(dir.path(), CatalogFormat::Properties, "en");

        assert_eq!(json.resolve("h1", "Hello", "fr-CA").translation, "Allô");
        assert_eq!(properties.resolve("h1", "Hello", "fr-CA").translation, "Bonjour");
    }
}
