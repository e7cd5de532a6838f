//! Plural categories and count → category selection.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Grammatical number category of a pluralized message.
///
/// Declaration order is the canonical order used when rendering ICU plural
/// strings, so reordering the variants changes message hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PluralForm {
    Zero,
    One,
    Two,
    Few,
    Many,
    /// Universal fallback; every plural message can resolve it.
    Other,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown plural form '{0}'")]
pub struct UnknownPluralForm(pub String);

impl PluralForm {
    /// All categories in canonical order.
    pub const ALL: [Self; 6] =
        [Self::Zero, Self::One, Self::Two, Self::Few, Self::Many, Self::Other];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }

    /// Maps a gettext `msgstr[index]` slot to a category.
    ///
    /// gettext numbers plural slots positionally, so the mapping depends on how
    /// many slots the entry has. The last slot is always `Other`.
    #[must_use]
    pub fn from_gettext_index(index: usize, slot_count: usize) -> Option<Self> {
        let layout: &[Self] = match slot_count {
            0 => &[],
            1 => &[Self::Other],
            2 => &[Self::One, Self::Other],
            3 => &[Self::One, Self::Few, Self::Other],
            4 => &[Self::One, Self::Two, Self::Few, Self::Other],
            5 => &[Self::One, Self::Two, Self::Few, Self::Many, Self::Other],
            _ => &Self::ALL,
        };
        layout.get(index).copied()
    }
}

impl fmt::Display for PluralForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluralForm {
    type Err = UnknownPluralForm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(Self::Zero),
            "one" => Ok(Self::One),
            "two" => Ok(Self::Two),
            "few" => Ok(Self::Few),
            "many" => Ok(Self::Many),
            "other" => Ok(Self::Other),
            _ => Err(UnknownPluralForm(s.to_string())),
        }
    }
}

/// Selects the plural category for a count in a locale.
pub trait PluralRules: Send + Sync + fmt::Debug {
    fn determine(&self, count: i64, locale: &str) -> PluralForm;
}

/// English-like table shared by every locale: 0 → zero, 1 → one, 2 → two, else other.
///
/// Per-language CLDR tables are not implemented. The table only affects which
/// form is selected at runtime, never a message hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplePluralRules;

impl PluralRules for SimplePluralRules {
    fn determine(&self, count: i64, _locale: &str) -> PluralForm {
        match count {
            0 => PluralForm::Zero,
            1 => PluralForm::One,
            2 => PluralForm::Two,
            _ => PluralForm::Other,
        }
    }
}
