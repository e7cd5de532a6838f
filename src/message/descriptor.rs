//! Hash-keyed message handles resolved lazily against a [`MessageSource`].

use super::format_message;
use crate::hash::HashGenerator;
use crate::source::MessageSource;

/// A translatable message: its lookup hash, natural text and arguments.
///
/// Descriptors are cheap values. Nothing is resolved until
/// [`resolve`](Self::resolve) is called with a source and a locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageDescriptor {
    hash: String,
    natural_text: String,
    args: Vec<String>,
}

impl MessageDescriptor {
    /// Hashes `natural_text` with `hasher`.
    #[must_use]
    pub fn new(hasher: &dyn HashGenerator, natural_text: impl Into<String>) -> Self {
        let natural_text = natural_text.into();
        Self { hash: hasher.generate_hash(&natural_text), natural_text, args: Vec::new() }
    }

    /// Hashes `natural_text` within `context`.
    #[must_use]
    pub fn with_context(
        hasher: &dyn HashGenerator,
        natural_text: impl Into<String>,
        context: &str,
    ) -> Self {
        let natural_text = natural_text.into();
        Self {
            hash: hasher.generate_hash_with_context(&natural_text, Some(context)),
            natural_text,
            args: Vec::new(),
        }
    }

    /// Uses a precomputed hash.
    #[must_use]
    pub fn from_parts(hash: impl Into<String>, natural_text: impl Into<String>) -> Self {
        Self { hash: hash.into(), natural_text: natural_text.into(), args: Vec::new() }
    }

    /// A copy of this descriptor carrying `args`.
    #[must_use]
    pub fn with_args<I, T>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self {
            hash: self.hash.clone(),
            natural_text: self.natural_text.clone(),
            args: args.into_iter().map(|arg| arg.to_string()).collect(),
        }
    }

    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    #[must_use]
    pub fn natural_text(&self) -> &str {
        &self.natural_text
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Translates and formats the message.
    ///
    /// `None` uses the source's default locale.
    #[must_use]
    pub fn resolve(&self, source: &dyn MessageSource, locale: Option<&str>) -> String {
        let locale = locale.unwrap_or_else(|| source.default_locale());
        let resolution = source.resolve(&self.hash, &self.natural_text, locale);
        format_message(&resolution.translation, &self.args)
    }

    /// True if a translation exists for `locale` or the default locale.
    #[must_use]
    pub fn is_translated(&self, source: &dyn MessageSource, locale: &str) -> bool {
        source.exists(&self.hash, locale)
    }
}
