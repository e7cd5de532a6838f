//! gettext PO input.

mod error;
mod parser;

pub use error::PoParseError;
pub use parser::{
    PoParser,
    parse_header,
};
