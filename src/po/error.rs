use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a PO file.
#[derive(Error, Debug)]
pub enum PoParseError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: unexpected content '{content}'")]
    UnexpectedLine { line: usize, content: String },

    #[error("Line {line}: invalid string literal: {message}")]
    InvalidString { line: usize, message: String },

    #[error("Line {line}: continuation string without a preceding keyword")]
    OrphanContinuation { line: usize },

    #[error("Line {line}: invalid plural index '{index}'")]
    InvalidPluralIndex { line: usize, index: String },

    #[error("Line {line}: entry has a translation but no msgid")]
    MissingMsgid { line: usize },
}
