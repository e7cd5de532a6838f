//! Compact binary catalog (`messages_<locale>.bin`).
//!
//! Two wire layouts share the `FL18` magic and are told apart by the byte
//! following it:
//!
//! | version | header | lengths |
//! |---|---|---|
//! | 1 (legacy) | u16 version, u16 locale length, u32 entry count | u16 hash, u32 translation |
//! | 2 (current) | u8 version, u8 flags, VLQ locale length, optional u8 fixed hash length, VLQ entry count | VLQ, hash length omitted when fixed |
//!
//! Either layout may be gzip-compressed as a whole; readers sniff the gzip
//! magic instead of trusting the flags byte, which sits inside the
//! compressed payload.

mod current;
mod cursor;
mod legacy;
mod vlq;
mod writer;

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
pub use writer::{
    CatalogWriter,
    fixed_hash_length,
};

use super::CatalogError;

/// File type tag.
pub const MAGIC: [u8; 4] = *b"FL18";
/// Version written by [`CatalogWriter`].
pub const CURRENT_VERSION: u8 = 2;
/// Fixed-width layout still accepted by readers.
pub const LEGACY_VERSION: u8 = 1;
/// The whole stream is gzip-compressed.
pub const FLAG_COMPRESSED: u8 = 0b0000_0001;
/// Every hash has the length stored once in the header.
pub const FLAG_FIXED_HASH_LENGTH: u8 = 0b0000_0010;
/// Leading bytes of any gzip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Magic plus the version discriminator byte.
const HEADER_PREFIX_LEN: usize = MAGIC.len() + 1;

/// Wire layout selected by the version byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireVersion {
    Legacy,
    Current,
}

impl WireVersion {
    /// Maps the byte after the magic to a layout.
    ///
    /// # Errors
    /// Returns [`CatalogError::UnsupportedVersion`] for any other value.
    pub fn from_byte(byte: u8) -> Result<Self, CatalogError> {
        match byte {
            LEGACY_VERSION => Ok(Self::Legacy),
            CURRENT_VERSION => Ok(Self::Current),
            other => Err(CatalogError::UnsupportedVersion(u16::from(other))),
        }
    }
}

/// A decoded catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCatalog {
    pub version: u16,
    /// Flags byte as stored; always 0 for legacy catalogs.
    pub flags: u8,
    pub locale: String,
    pub fixed_hash_length: Option<usize>,
    /// Entry count announced by the header.
    pub declared_entries: usize,
    /// hash → translation
    pub entries: HashMap<String, String>,
    /// False when decoding stopped early on a corrupt entry.
    pub complete: bool,
    /// The stream was gzipped, whatever the flags byte says.
    pub compressed: bool,
}

impl DecodedCatalog {
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn get(&self, hash: &str) -> Option<&str> {
        self.entries.get(hash).map(String::as_str)
    }
}

/// Returns true if the bytes start with the gzip magic.
#[must_use]
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Decodes a catalog of either layout, compressed or not.
///
/// # Errors
/// Fails on gzip errors, a bad magic, an unknown version or a truncated
/// header. Damage inside the entry list is not an error: the result holds the
/// entries before the damage and `complete` is false.
pub fn decode_catalog(bytes: &[u8]) -> Result<DecodedCatalog, CatalogError> {
    let data = gunzip_if_needed(bytes)?;

    let magic = data.get(..MAGIC.len()).unwrap_or(&data);
    if magic != MAGIC {
        return Err(CatalogError::InvalidMagic { found: magic.to_vec() });
    }

    let version_byte = *data
        .get(MAGIC.len())
        .ok_or(CatalogError::Truncated { field: "version", offset: MAGIC.len() })?;

    let mut catalog = match WireVersion::from_byte(version_byte)? {
        WireVersion::Legacy => legacy::decode(&data)?,
        WireVersion::Current => current::decode(&data)?,
    };
    catalog.compressed = matches!(data, Cow::Owned(_));
    Ok(catalog)
}

/// Decodes a catalog, logging failures and returning an empty map instead.
#[must_use]
pub fn decode_catalog_lenient(bytes: &[u8]) -> HashMap<String, String> {
    match decode_catalog(bytes) {
        Ok(catalog) => catalog.entries,
        Err(e) => {
            tracing::warn!("Ignoring unreadable binary catalog: {e}");
            HashMap::new()
        }
    }
}

/// Reads and decodes a catalog file.
///
/// # Errors
/// Returns an error if the file cannot be read or [`decode_catalog`] fails.
pub fn read_catalog_file(path: &Path) -> Result<DecodedCatalog, CatalogError> {
    let bytes = std::fs::read(path)?;
    decode_catalog(&bytes)
}

/// Decompresses the whole stream in memory when it starts with the gzip magic.
fn gunzip_if_needed(bytes: &[u8]) -> Result<Cow<'_, [u8]>, CatalogError> {
    if !is_gzip(bytes) {
        return Ok(Cow::Borrowed(bytes));
    }
    let mut decompressed = Vec::with_capacity(bytes.len().saturating_mul(4));
    GzDecoder::new(bytes).read_to_end(&mut decompressed)?;
    Ok(Cow::Owned(decompressed))
}
