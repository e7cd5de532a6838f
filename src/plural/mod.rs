//! Plural messages: categories, ICU plural strings and the runtime builder.

mod builder;
mod icu;
mod rules;

pub use builder::{
    PluralBuilder,
    substitute_count,
};
pub use icu::{
    ICU_PLURAL_PREFIX,
    extract_all_plural_forms,
    extract_plural_form,
    is_icu_plural,
    resolve_plural_form,
    to_icu_string,
};
pub use rules::{
    PluralForm,
    PluralRules,
    SimplePluralRules,
    UnknownPluralForm,
};
