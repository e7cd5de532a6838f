//! Fluent construction and resolution of plural messages.

use std::collections::BTreeMap;

use super::{
    PluralForm,
    PluralRules,
    SimplePluralRules,
    is_icu_plural,
    resolve_plural_form,
    to_icu_string,
};
use crate::hash::HashGenerator;
use crate::source::MessageSource;

/// Builds a plural message from its source-language forms and resolves it.
///
/// ```ignore
/// let text = PluralBuilder::new(&source, &hasher, count)
///     .one("{0} file")
///     .other("{0} files")
///     .format("fr");
/// ```
///
/// The whole message shares one hash, computed over its canonical ICU string,
/// so the order in which forms are supplied does not matter.
#[derive(Debug)]
pub struct PluralBuilder<'a> {
    source: &'a dyn MessageSource,
    hasher: &'a dyn HashGenerator,
    rules: &'a dyn PluralRules,
    count: i64,
    forms: BTreeMap<PluralForm, String>,
    context: Option<String>,
}

impl<'a> PluralBuilder<'a> {
    #[must_use]
    pub fn new(source: &'a dyn MessageSource, hasher: &'a dyn HashGenerator, count: i64) -> Self {
        Self {
            source,
            hasher,
            rules: &SimplePluralRules,
            count,
            forms: BTreeMap::new(),
            context: None,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: &'a dyn PluralRules) -> Self {
        self.rules = rules;
        self
    }

    /// Disambiguates identical texts used with different meanings.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets the text of one form, replacing any earlier text for it.
    #[must_use]
    pub fn form(mut self, form: PluralForm, text: impl Into<String>) -> Self {
        self.forms.insert(form, text.into());
        self
    }

    #[must_use]
    pub fn zero(self, text: impl Into<String>) -> Self {
        self.form(PluralForm::Zero, text)
    }

    #[must_use]
    pub fn one(self, text: impl Into<String>) -> Self {
        self.form(PluralForm::One, text)
    }

    #[must_use]
    pub fn two(self, text: impl Into<String>) -> Self {
        self.form(PluralForm::Two, text)
    }

    #[must_use]
    pub fn few(self, text: impl Into<String>) -> Self {
        self.form(PluralForm::Few, text)
    }

    #[must_use]
    pub fn many(self, text: impl Into<String>) -> Self {
        self.form(PluralForm::Many, text)
    }

    #[must_use]
    pub fn other(self, text: impl Into<String>) -> Self {
        self.form(PluralForm::Other, text)
    }

    #[must_use]
    pub const fn count(&self) -> i64 {
        self.count
    }

    /// Canonical ICU string of the source-language forms.
    #[must_use]
    pub fn icu_string(&self) -> String {
        to_icu_string(&self.forms)
    }

    /// Lookup key of this message.
    #[must_use]
    pub fn hash(&self) -> String {
        self.hasher.generate_hash_with_context(&self.icu_string(), self.context.as_deref())
    }

    /// Resolves and formats the message for `locale`.
    ///
    /// Falls back to the source-language forms when no translation exists,
    /// and within a message from the selected form to `other` to the bare
    /// count.
    #[must_use]
    pub fn format(&self, locale: &str) -> String {
        let form = self.rules.determine(self.count, locale);
        let icu = self.icu_string();
        let hash = self.hasher.generate_hash_with_context(&icu, self.context.as_deref());

        let resolution = self.source.resolve(&hash, &icu, locale);
        let text = if is_icu_plural(&resolution.translation) {
            resolve_plural_form(&resolution.translation, form, self.count)
        } else {
            resolution.translation
        };

        substitute_count(&text, self.count)
    }

    /// [`format`](Self::format) in the source's default locale.
    #[must_use]
    pub fn format_default(&self) -> String {
        self.format(self.source.default_locale())
    }
}

/// Replaces `{0}`, `{}` and `#` with the count.
#[must_use]
pub fn substitute_count(text: &str, count: i64) -> String {
    let count = count.to_string();
    text.replace("{0}", &count).replace("{}", &count).replace('#', &count)
}
