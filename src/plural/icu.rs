//! ICU-style plural strings: `{0, plural, one {# file} other {# files}}`.
//!
//! The canonical rendering is both the storage format of a pluralized
//! message and the input of its hash, so it must not depend on the order in
//! which forms were supplied.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::PluralForm;

/// Prefix every canonical plural string starts with.
pub const ICU_PLURAL_PREFIX: &str = "{0, plural,";

/// Outer `{0, plural, ... }` wrapper, tolerant of whitespace and keyword case.
#[allow(clippy::expect_used)]
static PLURAL_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*\{\s*0\s*,\s*plural\s*,(.*)\}\s*$").expect("valid plural body regex")
});

/// `word {content}` where content may hold one level of nested braces.
#[allow(clippy::expect_used)]
static PLURAL_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\s*\{((?:[^{}]|\{[^{}]*\})*)\}").expect("valid plural pair regex")
});

/// Renders forms as the canonical ICU plural string.
///
/// Forms are emitted in [`PluralForm`] order and empty texts are omitted.
#[must_use]
pub fn to_icu_string(forms: &BTreeMap<PluralForm, String>) -> String {
    let body = forms
        .iter()
        .filter(|(_, text)| !text.is_empty())
        .map(|(form, text)| format!("{form} {{{text}}}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{ICU_PLURAL_PREFIX} {body}}}")
}

/// Returns true if the text is a canonical ICU plural template.
#[must_use]
pub fn is_icu_plural(text: &str) -> bool {
    text.starts_with(ICU_PLURAL_PREFIX)
}

/// Parses every recognised `form {text}` pair of an ICU plural string.
///
/// Returns an empty map when the text is not a plural template. Unknown form
/// names are skipped; the first occurrence of a repeated form wins.
#[must_use]
pub fn extract_all_plural_forms(icu: &str) -> BTreeMap<PluralForm, String> {
    let mut forms = BTreeMap::new();

    let Some(body) = PLURAL_BODY.captures(icu).and_then(|caps| caps.get(1)) else {
        tracing::debug!("Not an ICU plural string: {icu:?}");
        return forms;
    };

    for caps in PLURAL_PAIR.captures_iter(body.as_str()) {
        let (Some(name), Some(text)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        match name.as_str().parse::<PluralForm>() {
            Ok(form) => {
                forms.entry(form).or_insert_with(|| text.as_str().to_string());
            }
            Err(e) => tracing::warn!("Skipping plural form in {icu:?}: {e}"),
        }
    }

    forms
}

/// Text of a single form, if present.
#[must_use]
pub fn extract_plural_form(icu: &str, form: PluralForm) -> Option<String> {
    extract_all_plural_forms(icu).remove(&form)
}

/// Text for `form`, falling back to `other`, then to the count itself.
#[must_use]
pub fn resolve_plural_form(icu: &str, form: PluralForm, count: i64) -> String {
    let mut forms = extract_all_plural_forms(icu);
    forms
        .remove(&form)
        .or_else(|| forms.remove(&PluralForm::Other))
        .unwrap_or_else(|| count.to_string())
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn forms(pairs: &[(PluralForm, &str)]) -> BTreeMap<PluralForm, String> {
        pairs.iter().map(|(form, text)| (*form, (*text).to_string())).collect()
    }

    #[test]
    fn canonical_string_uses_enum_order() {
        let icu = to_icu_string(&forms(&[
            (PluralForm::Other, "# files"),
            (PluralForm::Zero, "no files"),
            (PluralForm::One, "one file"),
        ]));

        assert_eq!(icu, "{0, plural, zero {no files} one {one file} other {# files}}");
    }

    #[test]
    fn canonical_string_skips_empty_forms() {
        let icu = to_icu_string(&forms(&[
            (PluralForm::One, "one file"),
            (PluralForm::Few, ""),
            (PluralForm::Other, "# files"),
        ]));

        assert_eq!(icu, "{0, plural, one {one file} other {# files}}");
    }

    #[googletest::test]
    fn extract_all_forms() {
        let result = extract_all_plural_forms("{0, plural, one {# file} other {# files}}");

        expect_that!(result.get(&PluralForm::One), some(eq("# file")));
        expect_that!(result.get(&PluralForm::Other), some(eq("# files")));
        expect_that!(result.len(), eq(2));
    }

    #[rstest]
    #[case::extra_whitespace("  {  0 ,   plural ,  one {a}   other {b} }  ")]
    #[case::upper_keyword("{0, PLURAL, one {a} other {b}}")]
    #[case::multiline("{0, plural,\n  one {a}\n  other {b}\n}")]
    fn extract_is_whitespace_and_case_tolerant(#[case] icu: &str) {
        let result = extract_all_plural_forms(icu);

        assert_eq!(result.get(&PluralForm::One).map(String::as_str), Some("a"));
        assert_eq!(result.get(&PluralForm::Other).map(String::as_str), Some("b"));
    }

    #[test]
    fn extract_supports_one_nesting_level() {
        let icu = "{0, plural, one {{1} has one file} other {{1} has {0} files}}";

        let result = extract_all_plural_forms(icu);

        assert_eq!(result.get(&PluralForm::One).map(String::as_str), Some("{1} has one file"));
        assert_eq!(result.get(&PluralForm::Other).map(String::as_str), Some("{1} has {0} files"));
    }

    #[test]
    fn extract_skips_unknown_forms() {
        let result = extract_all_plural_forms("{0, plural, one {a} several {b} other {c}}");

        assert_eq!(result.len(), 2);
        assert!(result.contains_key(&PluralForm::One));
        assert!(result.contains_key(&PluralForm::Other));
    }

    #[rstest]
    #[case::plain_text("Hello world")]
    #[case::select("{0, select, a {x} other {y}}")]
    #[case::empty("")]
    fn extract_returns_empty_for_non_plural(#[case] text: &str) {
        assert!(extract_all_plural_forms(text).is_empty());
    }

    #[test]
    fn round_trip_through_canonical_string() {
        let original =
            forms(&[(PluralForm::One, "one {nested} item"), (PluralForm::Other, "items")]);

        assert_eq!(extract_all_plural_forms(&to_icu_string(&original)), original);
    }

    #[rstest]
    #[case::requested_present("{0, plural, one {one} other {many}}", PluralForm::One, "one")]
    #[case::falls_back_to_other("{0, plural, one {one} other {many}}", PluralForm::Two, "many")]
    #[case::falls_back_to_count("{0, plural, one {one}}", PluralForm::Few, "7")]
    #[case::garbage("not plural", PluralForm::One, "7")]
    fn resolve_fallback_chain(#[case] icu: &str, #[case] form: PluralForm, #[case] expected: &str) {
        assert_eq!(resolve_plural_form(icu, form, 7), expected);
    }

    #[test]
    fn extract_single_form() {
        let icu = "{0, plural, zero {none} other {some}}";

        assert_eq!(extract_plural_form(icu, PluralForm::Zero).as_deref(), Some("none"));
        assert_eq!(extract_plural_form(icu, PluralForm::One), None);
    }

    #[rstest]
    #[case("{0, plural, one {a}}", true)]
    #[case("{0,plural, one {a}}", false)]
    #[case("Plural", false)]
    fn detects_canonical_prefix(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_icu_plural(text), expected);
    }
}
