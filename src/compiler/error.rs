use std::path::PathBuf;

use thiserror::Error;

use crate::config::{
    ConfigError,
    MatcherError,
};
use crate::formats::{
    CatalogError,
    UnknownFormat,
};
use crate::po::PoParseError;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Po(#[from] PoParseError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Format(#[from] UnknownFormat),

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pattern(#[from] MatcherError),

    #[error("Cannot determine the locale of {}", .path.display())]
    UnknownLocale { path: PathBuf },

    #[error("Compilation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(
        "{} and {} both compile to locale '{locale}'",
        .first.display(),
        .second.display()
    )]
    DuplicateLocale { locale: String, first: PathBuf, second: PathBuf },

    #[error("{failed} of {total} PO files failed to compile")]
    Failed { failed: usize, total: usize },
}
