use thiserror::Error;

/// Errors raised while encoding or decoding a compiled catalog.
///
/// Runtime readers log these and fall back to an empty catalog; build-time
/// writers return them to the caller.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error while processing catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog magic {found:02X?}, expected \"FL18\"")]
    InvalidMagic { found: Vec<u8> },

    #[error("Unsupported catalog version {0}")]
    UnsupportedVersion(u16),

    #[error("Catalog truncated while reading {field} at offset {offset}")]
    Truncated { field: &'static str, offset: usize },

    #[error("Variable-length integer exceeds 32 bits at offset {offset}")]
    VlqOverflow { offset: usize },

    #[error("Invalid UTF-8 in {field} at offset {offset}")]
    InvalidUtf8 { field: &'static str, offset: usize },

    #[error("{field} is too long for the catalog format ({length} bytes)")]
    LengthOverflow { field: &'static str, length: usize },

    #[error("Failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON catalog must be an object at the top level")]
    JsonNotObject,

    #[error("Invalid properties catalog at line {line}: {message}")]
    Properties { line: usize, message: String },
}
