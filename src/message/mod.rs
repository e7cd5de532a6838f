//! Message descriptors and argument formatting.

mod descriptor;
mod format;

pub use descriptor::MessageDescriptor;
pub use format::{
    FormatError,
    format_message,
    replace_placeholders,
    try_format,
};
