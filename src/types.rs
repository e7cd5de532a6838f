//! Translation data model shared by the PO parser, the writers and the compiler.

use std::collections::{
    BTreeMap,
    HashMap,
};

use crate::plural::{
    PluralForm,
    to_icu_string,
};

/// One message of a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    /// Source-language text (msgid).
    pub original_text: String,
    pub content: EntryContent,
    /// `file:line` reference of the first occurrence, if known.
    pub source_location: Option<String>,
}

/// Singular or plural payload of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    Singular {
        translation: Option<String>,
    },
    Plural {
        /// msgid_plural
        plural_text: String,
        /// gettext `msgstr[n]` index → text; may be sparse.
        plural_forms: BTreeMap<usize, String>,
    },
}

impl TranslationEntry {
    /// A singular entry; `None` means untranslated.
    #[must_use]
    pub fn singular(original_text: impl Into<String>, translation: Option<&str>) -> Self {
        Self {
            original_text: original_text.into(),
            content: EntryContent::Singular { translation: translation.map(str::to_string) },
            source_location: None,
        }
    }

    /// A plural entry built from `msgstr[n]` slots.
    #[must_use]
    pub fn plural(
        original_text: impl Into<String>,
        plural_text: impl Into<String>,
        plural_forms: BTreeMap<usize, String>,
    ) -> Self {
        Self {
            original_text: original_text.into(),
            content: EntryContent::Plural { plural_text: plural_text.into(), plural_forms },
            source_location: None,
        }
    }

    #[must_use]
    pub fn with_source_location(mut self, location: impl Into<String>) -> Self {
        self.source_location = Some(location.into());
        self
    }

    #[must_use]
    pub const fn is_plural(&self) -> bool {
        matches!(self.content, EntryContent::Plural { .. })
    }

    /// True if at least one form holds non-blank text.
    #[must_use]
    pub fn has_translation(&self) -> bool {
        match &self.content {
            EntryContent::Singular { translation } => {
                translation.as_deref().is_some_and(|t| !t.trim().is_empty())
            }
            EntryContent::Plural { plural_forms, .. } => {
                plural_forms.values().any(|t| !t.trim().is_empty())
            }
        }
    }

    /// The string stored in compiled catalogs.
    ///
    /// Plural slots are mapped to categories by `slot_count` (defaulting to
    /// the highest slot index + 1) and rendered as a canonical ICU string.
    /// Returns `None` when nothing is translated.
    #[must_use]
    pub fn compiled_translation(&self, slot_count: Option<usize>) -> Option<String> {
        if !self.has_translation() {
            return None;
        }
        match &self.content {
            EntryContent::Singular { translation } => translation.clone(),
            EntryContent::Plural { plural_forms, .. } => {
                let slot_count = slot_count
                    .or_else(|| plural_forms.keys().next_back().map(|max| max + 1))
                    .unwrap_or_default();
                let forms: BTreeMap<PluralForm, String> = plural_forms
                    .iter()
                    .filter(|(_, text)| !text.trim().is_empty())
                    .filter_map(|(&index, text)| {
                        let form = PluralForm::from_gettext_index(index, slot_count);
                        if form.is_none() {
                            tracing::warn!(
                                msgid = %self.original_text,
                                index,
                                slot_count,
                                "Ignoring plural slot outside nplurals"
                            );
                        }
                        form.map(|form| (form, text.clone()))
                    })
                    .collect();
                if forms.is_empty() { None } else { Some(to_icu_string(&forms)) }
            }
        }
    }
}

/// PO header fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoMetadata {
    pub project_id_version: Option<String>,
    pub language: Option<String>,
    pub pot_creation_date: Option<String>,
    pub po_revision_date: Option<String>,
    pub content_type: Option<String>,
    /// Raw `Plural-Forms` header.
    pub plural_forms: Option<String>,
    /// Every other header, by name.
    pub other: HashMap<String, String>,
}

impl PoMetadata {
    /// `nplurals` from the `Plural-Forms` header.
    #[must_use]
    pub fn nplurals(&self) -> Option<usize> {
        let header = self.plural_forms.as_deref()?;
        header.split(';').find_map(|part| {
            let (name, value) = part.split_once('=')?;
            if name.trim() == "nplurals" { value.trim().parse().ok() } else { None }
        })
    }
}

/// All entries of one PO file, keyed by message hash.
///
/// Entries are kept sorted so that every writer produces reproducible output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationData {
    pub entries: BTreeMap<String, TranslationEntry>,
    pub metadata: PoMetadata,
}

impl TranslationData {
    #[must_use]
    pub const fn new(entries: BTreeMap<String, TranslationEntry>, metadata: PoMetadata) -> Self {
        Self { entries, metadata }
    }

    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries with a non-blank translation.
    #[must_use]
    pub fn translated_count(&self) -> usize {
        self.entries.values().filter(|e| e.has_translation()).count()
    }

    #[must_use]
    pub fn has_translation(&self, hash: &str) -> bool {
        self.entries.get(hash).is_some_and(TranslationEntry::has_translation)
    }

    /// hash → compiled translation, in hash order.
    ///
    /// Untranslated entries are dropped unless `include_untranslated` is set,
    /// in which case they map to `None`.
    #[must_use]
    pub fn compiled_translations(
        &self,
        include_untranslated: bool,
    ) -> BTreeMap<String, Option<String>> {
        let slot_count = self.metadata.nplurals();
        self.entries
            .iter()
            .filter_map(|(hash, entry)| {
                let translation = entry.compiled_translation(slot_count);
                (translation.is_some() || include_untranslated)
                    .then(|| (hash.clone(), translation))
            })
            .collect()
    }
}
