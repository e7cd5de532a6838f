//! PO files → runtime catalogs.
//!
//! [`TranslationCompiler`] writes one parsed PO file in every configured
//! format; [`compile_workspace`] discovers and compiles a whole project.

mod error;
mod workspace;
mod writer;

pub use error::CompileError;
pub use workspace::{
    CompileReport,
    LocaleReport,
    compile_workspace,
    find_po_files,
    locale_from_path,
};
pub use writer::TranslationCompiler;
