use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::formats::CatalogFormat;
use crate::hash::{
    DEFAULT_HASH_LENGTH,
    MAX_HASH_LENGTH,
    Sha256HashGenerator,
};
use crate::source::CacheConfig;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "poFiles.includePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to parse configuration: {0}")]
    SyntaxError(String),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    pub po_files: PoFilesConfig,

    /// Relative to the project root unless absolute.
    pub output_directory: PathBuf,

    /// `json`, `properties`, `binary` (or `bin`).
    pub output_formats: Vec<String>,

    pub compress_binary: bool,

    /// Header comments and `_metadata`/`source` fields in text formats.
    pub include_metadata: bool,

    /// Write entries without a translation as empty strings.
    pub include_untranslated: bool,

    pub pretty_json: bool,

    /// Characters kept from each message hash (1..=43).
    pub hash_length: usize,

    pub default_locale: String,

    /// Locales offered at runtime.
    ///
    /// - `None`: every catalog found in the message source directory
    /// - `Some([...])`: only these
    pub supported_locales: Option<Vec<String>>,

    pub message_source: MessageSourceConfig,

    pub compile: CompileConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoFilesConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageSourceConfig {
    pub format: String,
    /// Defaults to `outputDirectory`.
    pub directory: Option<PathBuf>,
    pub cache_ttl_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileConfig {
    /// PO files compiled in parallel.
    /// Default: number of CPU cores.
    pub concurrency: Option<usize>,
}

impl Default for PoFilesConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec!["**/*.po".to_string()],
            exclude_patterns: vec!["target/**".to_string(), "node_modules/**".to_string()],
        }
    }
}

impl Default for MessageSourceConfig {
    fn default() -> Self {
        Self { format: "binary".to_string(), directory: None, cache_ttl_seconds: 30 * 60 }
    }
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            po_files: PoFilesConfig::default(),
            output_directory: PathBuf::from("i18n"),
            output_formats: vec!["json".to_string()],
            compress_binary: false,
            include_metadata: true,
            include_untranslated: false,
            pretty_json: true,
            hash_length: DEFAULT_HASH_LENGTH,
            default_locale: "en".to_string(),
            supported_locales: None,
            message_source: MessageSourceConfig::default(),
            compile: CompileConfig::default(),
        }
    }
}

impl CompileConfig {
    /// Configured concurrency, or the number of CPUs.
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.unwrap_or_else(num_cpus::get).max(1)
    }
}

impl I18nSettings {
    /// # Errors
    /// - Invalid glob pattern
    /// - Unknown or missing output format
    /// - Hash length, cache TTL or concurrency out of range
    /// - Empty default locale
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.po_files.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "poFiles.includePatterns",
                "At least one pattern is required. Example: [\"**/*.po\"]",
            ));
        }

        for (field, patterns) in [
            ("poFiles.includePatterns", &self.po_files.include_patterns),
            ("poFiles.excludePatterns", &self.po_files.exclude_patterns),
        ] {
            for (index, pattern) in patterns.iter().enumerate() {
                if let Err(e) = globset::Glob::new(pattern) {
                    errors.push(ValidationError::new(
                        format!("{field}[{index}]"),
                        format!("Invalid glob pattern '{pattern}': {e}"),
                    ));
                }
            }
        }

        if self.output_formats.is_empty() {
            errors.push(ValidationError::new(
                "outputFormats",
                "At least one format is required. Example: [\"json\", \"binary\"]",
            ));
        }
        for (index, name) in self.output_formats.iter().enumerate() {
            if let Err(e) = name.parse::<CatalogFormat>() {
                errors.push(ValidationError::new(format!("outputFormats[{index}]"), e.to_string()));
            }
        }

        if !(1..=MAX_HASH_LENGTH).contains(&self.hash_length) {
            errors.push(ValidationError::new(
                "hashLength",
                format!("Must be between 1 and {MAX_HASH_LENGTH}, got {}", self.hash_length),
            ));
        }

        if self.default_locale.trim().is_empty() {
            errors.push(ValidationError::new(
                "defaultLocale",
                "The locale cannot be empty. Example: \"en\"",
            ));
        }

        if let Some(locales) = &self.supported_locales {
            for (index, locale) in locales.iter().enumerate() {
                if locale.trim().is_empty() {
                    errors.push(ValidationError::new(
                        format!("supportedLocales[{index}]"),
                        "The locale cannot be empty",
                    ));
                }
            }
        }

        if let Err(e) = self.message_source.format.parse::<CatalogFormat>() {
            errors.push(ValidationError::new("messageSource.format", e.to_string()));
        }

        if self.message_source.cache_ttl_seconds == 0 {
            errors.push(ValidationError::new(
                "messageSource.cacheTtlSeconds",
                "Must be greater than 0",
            ));
        }

        if self.compile.concurrency == Some(0) {
            errors.push(ValidationError::new("compile.concurrency", "Must be greater than 0"));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Parsed `outputFormats`, deduplicated in first-seen order; unknown names are skipped.
    #[must_use]
    pub fn catalog_formats(&self) -> Vec<CatalogFormat> {
        let mut formats = Vec::new();
        for format in self.output_formats.iter().filter_map(|name| name.parse().ok()) {
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        formats
    }

    /// Parsed `messageSource.format`, binary when invalid.
    #[must_use]
    pub fn message_source_format(&self) -> CatalogFormat {
        self.message_source.format.parse().unwrap_or(CatalogFormat::Binary)
    }

    /// Hasher for `hashLength`. Catalogs and lookups must share it, or no key
    /// will match.
    #[must_use]
    pub fn hash_generator(&self) -> Sha256HashGenerator {
        Sha256HashGenerator::with_length(self.hash_length)
    }

    #[must_use]
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::default()
            .with_ttl(std::time::Duration::from_secs(self.message_source.cache_ttl_seconds))
    }
}
