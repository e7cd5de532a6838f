use std::path::{
    Path,
    PathBuf,
};

use super::CompileError;
use crate::config::I18nSettings;
use crate::formats::CatalogFormat;
use crate::formats::binary::CatalogWriter;
use crate::formats::json::{
    JsonWriteOptions,
    write_json_catalog,
};
use crate::formats::properties::{
    PropertiesWriteOptions,
    write_properties_catalog,
};
use crate::types::TranslationData;

/// Writes [`TranslationData`] as `messages_<locale>.<ext>` files.
#[derive(Debug, Clone)]
pub struct TranslationCompiler {
    output_dir: PathBuf,
    formats: Vec<CatalogFormat>,
    compress_binary: bool,
    include_metadata: bool,
    include_untranslated: bool,
    pretty_json: bool,
}

impl TranslationCompiler {
    /// JSON output with metadata, pretty-printed, untranslated entries skipped.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            formats: vec![CatalogFormat::Json],
            compress_binary: false,
            include_metadata: true,
            include_untranslated: false,
            pretty_json: true,
        }
    }

    /// Uses the output options of `settings`, writing into `output_dir`.
    ///
    /// # Errors
    /// Returns an error if `outputFormats` names an unknown format.
    pub fn from_settings(
        settings: &I18nSettings,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, CompileError> {
        let formats = settings
            .output_formats
            .iter()
            .map(|name| name.parse::<CatalogFormat>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(output_dir)
            .with_formats(formats)
            .with_compression(settings.compress_binary)
            .with_metadata(settings.include_metadata)
            .with_untranslated(settings.include_untranslated)
            .with_pretty_json(settings.pretty_json))
    }

    /// Replaces the output formats; duplicates are dropped.
    #[must_use]
    pub fn with_formats(mut self, formats: impl IntoIterator<Item = CatalogFormat>) -> Self {
        self.formats.clear();
        for format in formats {
            if !self.formats.contains(&format) {
                self.formats.push(format);
            }
        }
        self
    }

    /// Gzip binary catalogs.
    #[must_use]
    pub const fn with_compression(mut self, compress: bool) -> Self {
        self.compress_binary = compress;
        self
    }

    #[must_use]
    pub const fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    #[must_use]
    pub const fn with_untranslated(mut self, include: bool) -> Self {
        self.include_untranslated = include;
        self
    }

    #[must_use]
    pub const fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn formats(&self) -> &[CatalogFormat] {
        &self.formats
    }

    /// Writes one file per format and returns their paths, in format order.
    ///
    /// The output directory is created when missing.
    ///
    /// # Errors
    /// Returns an error if a catalog cannot be encoded or written.
    pub fn compile(
        &self,
        data: &TranslationData,
        locale: &str,
    ) -> Result<Vec<PathBuf>, CompileError> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|source| CompileError::Io { path: self.output_dir.clone(), source })?;

        let mut written = Vec::with_capacity(self.formats.len());
        for &format in &self.formats {
            let path = self.output_dir.join(format.file_name(locale));
            let bytes = self.encode(format, data, locale)?;
            std::fs::write(&path, bytes)
                .map_err(|source| CompileError::Io { path: path.clone(), source })?;
            tracing::debug!(locale, format = %format, path = %path.display(), "Wrote catalog");
            written.push(path);
        }
        Ok(written)
    }

    /// Encodes `data` in one format without touching the filesystem.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    pub fn encode(
        &self,
        format: CatalogFormat,
        data: &TranslationData,
        locale: &str,
    ) -> Result<Vec<u8>, CompileError> {
        let bytes = match format {
            CatalogFormat::Json => write_json_catalog(
                data,
                locale,
                JsonWriteOptions {
                    include_metadata: self.include_metadata,
                    include_untranslated: self.include_untranslated,
                    pretty: self.pretty_json,
                },
            )?
            .into_bytes(),
            CatalogFormat::Properties => write_properties_catalog(
                data,
                locale,
                PropertiesWriteOptions {
                    include_metadata: self.include_metadata,
                    include_untranslated: self.include_untranslated,
                },
            )
            .into_bytes(),
            CatalogFormat::Binary => CatalogWriter::new()
                .with_compression(self.compress_binary)
                .encode(locale, &data.compiled_translations(self.include_untranslated))?,
        };
        Ok(bytes)
    }
}
