//! Encoder for the current (version 2) catalog layout.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use super::vlq::write_vlq;
use super::{
    CURRENT_VERSION,
    FLAG_COMPRESSED,
    FLAG_FIXED_HASH_LENGTH,
    MAGIC,
};
use crate::formats::CatalogError;

/// Serializes hash → translation maps into the binary catalog format.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogWriter {
    /// Gzip the whole output.
    compress: bool,
}

impl CatalogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables whole-file gzip compression.
    #[must_use]
    pub const fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    #[must_use]
    pub const fn is_compressed(&self) -> bool {
        self.compress
    }

    /// Encodes one locale's catalog.
    ///
    /// Entries are written in map order, so equal input yields identical
    /// bytes. A missing translation is written as an empty string.
    ///
    /// # Errors
    /// Returns an error if a string does not fit a 32-bit length or if gzip fails.
    pub fn encode(
        &self,
        locale: &str,
        entries: &BTreeMap<String, Option<String>>,
    ) -> Result<Vec<u8>, CatalogError> {
        let fixed_length = fixed_hash_length(entries.keys().map(String::as_str));

        let mut flags = 0u8;
        if self.compress {
            flags |= FLAG_COMPRESSED;
        }
        if fixed_length.is_some() {
            flags |= FLAG_FIXED_HASH_LENGTH;
        }

        let mut out = Vec::with_capacity(16 + entries.len() * 32);
        out.extend_from_slice(&MAGIC);
        out.push(CURRENT_VERSION);
        out.push(flags);
        write_string(&mut out, locale, "locale")?;
        if let Some(length) = fixed_length {
            out.push(length);
        }
        write_vlq(&mut out, length_u32(entries.len(), "entry count")?);

        for (hash, translation) in entries {
            if fixed_length.is_some() {
                out.extend_from_slice(hash.as_bytes());
            } else {
                write_string(&mut out, hash, "hash")?;
            }
            write_string(&mut out, translation.as_deref().unwrap_or_default(), "translation")?;
        }

        tracing::debug!(
            locale,
            entries = entries.len(),
            fixed_hash_length = ?fixed_length,
            compressed = self.compress,
            "Encoded binary catalog"
        );

        if self.compress { Self::gzip(&out) } else { Ok(out) }
    }

    /// Encodes the catalog and writes it to `path`.
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    pub fn write_file(
        &self,
        path: &Path,
        locale: &str,
        entries: &BTreeMap<String, Option<String>>,
    ) -> Result<(), CatalogError> {
        let bytes = self.encode(locale, entries)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn gzip(bytes: &[u8]) -> Result<Vec<u8>, CatalogError> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes)?;
        Ok(encoder.finish()?)
    }
}

/// Byte length shared by every key, or `None` if lengths differ, exceed 255,
/// or there are no keys.
#[must_use]
pub fn fixed_hash_length<'a>(mut keys: impl Iterator<Item = &'a str>) -> Option<u8> {
    let first = keys.next()?.len();
    if keys.all(|key| key.len() == first) { u8::try_from(first).ok() } else { None }
}

fn write_string(out: &mut Vec<u8>, value: &str, field: &'static str) -> Result<(), CatalogError> {
    write_vlq(out, length_u32(value.len(), field)?);
    out.extend_from_slice(value.as_bytes());
    Ok(())
}

fn length_u32(length: usize, field: &'static str) -> Result<u32, CatalogError> {
    u32::try_from(length).map_err(|_| CatalogError::LengthOverflow { field, length })
}
