//! Decoder for the version 1 layout.
//!
//! Fixed-width little-endian integers throughout: 2-byte version, 2-byte
//! locale length, 4-byte entry count, then `[u16 hash len][hash][u32
//! translation len][translation]` per entry. No flags, no VLQ.

use std::collections::HashMap;

use super::cursor::ByteCursor;
use super::{
    DecodedCatalog,
    LEGACY_VERSION,
    MAGIC,
};
use crate::formats::CatalogError;

/// Decodes a decompressed version 1 catalog whose magic has been checked.
pub(super) fn decode(bytes: &[u8]) -> Result<DecodedCatalog, CatalogError> {
    let mut cursor = ByteCursor::new(bytes, MAGIC.len());

    let version = cursor.u16_le("version")?;
    if version != u16::from(LEGACY_VERSION) {
        return Err(CatalogError::UnsupportedVersion(version));
    }
    let locale_length = usize::from(cursor.u16_le("locale length")?);
    let locale = cursor.string(locale_length, "locale")?;
    let declared_entries = cursor.u32_le("entry count")? as usize;

    let mut entries = HashMap::with_capacity(declared_entries.min(cursor.remaining()));
    let mut complete = true;

    for index in 0..declared_entries {
        match read_entry(&mut cursor) {
            Ok((hash, translation)) => {
                entries.insert(hash, translation);
            }
            Err(e) => {
                tracing::warn!(
                    locale = %locale,
                    index,
                    declared_entries,
                    "Stopped reading legacy catalog entries: {e}"
                );
                complete = false;
                break;
            }
        }
    }

    Ok(DecodedCatalog {
        version,
        flags: 0,
        locale,
        fixed_hash_length: None,
        declared_entries,
        entries,
        complete,
        compressed: false,
    })
}

fn read_entry(cursor: &mut ByteCursor<'_>) -> Result<(String, String), CatalogError> {
    let hash_length = usize::from(cursor.u16_le("hash length")?);
    let hash = cursor.string(hash_length, "hash")?;
    let translation_length = cursor.u32_le("translation length")? as usize;
    let translation = cursor.string(translation_length, "translation")?;
    Ok((hash, translation))
}

/// Builds a version 1 catalog; test-only, the toolchain never writes this layout.
#[cfg(test)]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn encode_for_tests(locale: &str, entries: &[(&str, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&u16::from(LEGACY_VERSION).to_le_bytes());
    out.extend_from_slice(&(locale.len() as u16).to_le_bytes());
    out.extend_from_slice(locale.as_bytes());
    out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    for (hash, translation) in entries {
        out.extend_from_slice(&(hash.len() as u16).to_le_bytes());
        out.extend_from_slice(hash.as_bytes());
        out.extend_from_slice(&(translation.len() as u32).to_le_bytes());
        out.extend_from_slice(translation.as_bytes());
    }
    out
}
