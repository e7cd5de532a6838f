//! natural-i18n
//!
//! Translation catalogs keyed by the hash of each message's natural text.
//! PO files are compiled into JSON, properties or a compact binary format,
//! and read back at runtime through a cached [`source::MessageSource`].

pub mod compiler;
pub mod config;
pub mod formats;
pub mod hash;
pub mod message;
pub mod plural;
pub mod po;
pub mod source;
pub mod types;
