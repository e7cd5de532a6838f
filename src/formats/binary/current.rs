//! Decoder for the version 2 layout (VLQ lengths, flags byte).

use std::collections::HashMap;

use super::cursor::ByteCursor;
use super::{
    CURRENT_VERSION,
    DecodedCatalog,
    FLAG_FIXED_HASH_LENGTH,
    HEADER_PREFIX_LEN,
};
use crate::formats::CatalogError;

/// Decodes a decompressed version 2 catalog whose magic and version byte
/// have already been checked.
///
/// Header problems fail the whole catalog. A problem inside the entry list
/// stops decoding and keeps the entries read so far.
pub(super) fn decode(bytes: &[u8]) -> Result<DecodedCatalog, CatalogError> {
    let mut cursor = ByteCursor::new(bytes, HEADER_PREFIX_LEN);

    let flags = cursor.u8("flags")?;
    let locale_length = cursor.vlq("locale length")? as usize;
    let locale = cursor.string(locale_length, "locale")?;
    let fixed_hash_length = if flags & FLAG_FIXED_HASH_LENGTH == 0 {
        None
    } else {
        Some(usize::from(cursor.u8("fixed hash length")?))
    };
    let declared_entries = cursor.vlq("entry count")? as usize;

    let mut entries = HashMap::with_capacity(declared_entries.min(cursor.remaining()));
    let mut complete = true;

    for index in 0..declared_entries {
        match read_entry(&mut cursor, fixed_hash_length) {
            Ok((hash, translation)) => {
                entries.insert(hash, translation);
            }
            Err(e) => {
                tracing::warn!(
                    locale = %locale,
                    index,
                    declared_entries,
                    "Stopped reading catalog entries: {e}"
                );
                complete = false;
                break;
            }
        }
    }

    Ok(DecodedCatalog {
        version: u16::from(CURRENT_VERSION),
        flags,
        locale,
        fixed_hash_length,
        declared_entries,
        entries,
        complete,
        compressed: false,
    })
}

fn read_entry(
    cursor: &mut ByteCursor<'_>,
    fixed_hash_length: Option<usize>,
) -> Result<(String, String), CatalogError> {
    let hash_length = match fixed_hash_length {
        Some(length) => length,
        None => cursor.vlq("hash length")? as usize,
    };
    let hash = cursor.string(hash_length, "hash")?;
    let translation_length = cursor.vlq("translation length")? as usize;
    let translation = cursor.string(translation_length, "translation")?;
    Ok((hash, translation))
}
