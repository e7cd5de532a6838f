//! Key-value catalog (`messages_<locale>.properties`).
//!
//! One `hash=translation` per line. `\`, line breaks, tabs, `=` and `:` are
//! backslash-escaped in both keys and values, as are spaces in keys and
//! leading spaces in values.

use std::collections::HashMap;
use std::fmt::Write as _;

use super::CatalogError;
use crate::types::TranslationData;

/// Options for [`write_properties_catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertiesWriteOptions {
    /// Emit a header and a `# Source:` comment before each entry.
    pub include_metadata: bool,
    /// Keep entries without a translation (written with an empty value).
    pub include_untranslated: bool,
}

impl Default for PropertiesWriteOptions {
    fn default() -> Self {
        Self { include_metadata: true, include_untranslated: false }
    }
}

/// Serializes a catalog to properties text.
#[must_use]
pub fn write_properties_catalog(
    data: &TranslationData,
    locale: &str,
    options: PropertiesWriteOptions,
) -> String {
    let translations = data.compiled_translations(options.include_untranslated);
    let mut out = String::new();

    if options.include_metadata {
        let _ = writeln!(out, "# Translations for locale: {locale}");
        if let Some(revision) = &data.metadata.po_revision_date {
            let _ = writeln!(out, "# Last modified: {revision}");
        }
        let _ = writeln!(out, "# Entries: {}", translations.len());
        out.push('\n');
    }

    for (hash, translation) in &translations {
        if options.include_metadata
            && let Some(entry) = data.entries.get(hash)
        {
            // Comments end at the line break, so flatten it.
            let source = entry.original_text.replace(['\r', '\n'], " ");
            let _ = writeln!(out, "# Source: {source}");
        }
        let _ = writeln!(
            out,
            "{}={}",
            escape_key(hash),
            escape(translation.as_deref().unwrap_or_default())
        );
    }
    out
}

/// Escapes a value. Leading spaces are escaped so readers do not strip them.
#[must_use]
pub fn escape(text: &str) -> String {
    escape_with(text, false)
}

/// Escapes a key. Every space is escaped since an unescaped one ends the key.
#[must_use]
pub fn escape_key(text: &str) -> String {
    escape_with(text, true)
}

fn escape_with(text: &str, escape_all_spaces: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut leading = true;
    for c in text.chars() {
        match c {
            ' ' if leading || escape_all_spaces => out.push_str("\\ "),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{c}' => out.push_str("\\f"),
            '=' => out.push_str("\\="),
            ':' => out.push_str("\\:"),
            c => out.push(c),
        }
        leading &= matches!(c, ' ' | '\t' | '\u{c}');
    }
    out
}

/// Parses a properties catalog into hash → translation.
///
/// Accepts `#` and `!` comments, `=`, `:` or whitespace separators,
/// backslash line continuations and `\uXXXX` escapes.
///
/// # Errors
/// Returns an error on a malformed `\u` escape.
pub fn parse_properties_catalog(text: &str) -> Result<HashMap<String, String>, CatalogError> {
    let mut entries = HashMap::new();
    let mut lines = text.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        let line_number = index + 1;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (raw_key, raw_value) = split_key_value(&logical);
        let key = unescape(raw_key, line_number)?;
        let value = unescape(raw_value, line_number)?;
        entries.insert(key, value);
    }
    Ok(entries)
}

/// An odd number of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Splits at the first unescaped separator, skipping the whitespace around it.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut split = None;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\u{c}' => {
                split = Some((i, c));
                break;
            }
            _ => {}
        }
    }

    let Some((at, separator)) = split else {
        return (line, "");
    };
    let Some((key, rest)) = line.split_at_checked(at) else {
        return (line, "");
    };
    let mut rest = rest
        .strip_prefix(separator)
        .unwrap_or(rest)
        .trim_start_matches([' ', '\t', '\u{c}']);
    if separator.is_whitespace()
        && let Some(stripped) = rest.strip_prefix(['=', ':'])
    {
        rest = stripped.trim_start_matches([' ', '\t', '\u{c}']);
    }
    (key, rest)
}

fn unescape(text: &str, line: usize) -> Result<String, CatalogError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let digits: String = chars.by_ref().take(4).collect();
                let code = u32::from_str_radix(&digits, 16)
                    .ok()
                    .filter(|_| digits.len() == 4)
                    .ok_or_else(|| CatalogError::Properties {
                        line,
                        message: format!("invalid unicode escape \\u{digits}"),
                    })?;
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use rstest::rstest;

    use super::*;
    use crate::types::{
        PoMetadata,
        TranslationEntry,
    };

    fn sorted(entries: HashMap<String, String>) -> BTreeMap<String, String> {
        entries.into_iter().collect()
    }

    #[rstest]
    #[case::plain("Bonjour", "Bonjour")]
    #[case::separators("a=b:c", "a\\=b\\:c")]
    #[case::whitespace("line1\nline2\tend\r", "line1\\nline2\\tend\\r")]
    #[case::backslash("C:\\temp", "C\\:\\\\temp")]
    #[case::leading_spaces("  indented text", "\\ \\ indented text")]
    #[case::leading_tab_then_space("\t x", "\\t\\ x")]
    fn escapes_special_characters(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape(input), expected);
    }

    #[test]
    fn key_spaces_are_always_escaped() {
        assert_eq!(escape_key("a b"), "a\\ b");
    }

    #[test]
    fn writes_source_comments_and_header() {
        let mut entries = BTreeMap::new();
        entries.insert("h1".to_string(), TranslationEntry::singular("Hello", Some("Bonjour")));
        entries.insert("h2".to_string(), TranslationEntry::singular("Two\nlines", Some("a=b")));
        entries.insert("h3".to_string(), TranslationEntry::singular("Skip me", None));
        let data = TranslationData::new(
            entries,
            PoMetadata { po_revision_date: Some("2024-01-01".into()), ..PoMetadata::default() },
        );

        let text = write_properties_catalog(&data, "fr", PropertiesWriteOptions::default());

        assert_eq!(
            text,
            "# Translations for locale: fr\n\
             # Last modified: 2024-01-01\n\
             # Entries: 2\n\
             \n\
             # Source: Hello\n\
             h1=Bonjour\n\
             # Source: Two lines\n\
             h2=a\\=b\n"
        );
    }

    #[test]
    fn writes_bare_entries_without_metadata() {
        let mut entries = BTreeMap::new();
        entries.insert("h1".to_string(), TranslationEntry::singular("Hello", Some("Bonjour")));
        entries.insert("h2".to_string(), TranslationEntry::singular("Bye", None));
        let data = TranslationData::new(entries, PoMetadata::default());
        let options =
            PropertiesWriteOptions { include_metadata: false, include_untranslated: true };

        assert_eq!(write_properties_catalog(&data, "fr", options), "h1=Bonjour\nh2=\n");
    }

    #[test]
    fn parses_comments_separators_and_continuations() {
        let text = "# comment\n\
                    ! other comment\n\
                    \n\
                    a=1\n\
                    b : 2\n\
                    c 3\n\
                    d=first \\\n    second\n\
                    e=caf\\u00e9\n\
                    f\\=key=value\\nnext\n\
                    g\n";

        let entries = sorted(parse_properties_catalog(text).unwrap());

        assert_eq!(
            entries,
            BTreeMap::from([
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
                ("c".to_string(), "3".to_string()),
                ("d".to_string(), "first second".to_string()),
                ("e".to_string(), "café".to_string()),
                ("f=key".to_string(), "value\nnext".to_string()),
                ("g".to_string(), String::new()),
            ])
        );
    }

    #[test]
    fn escaped_trailing_backslash_is_not_a_continuation() {
        let entries = parse_properties_catalog("path=C\\:\\\\\nnext=1\n").unwrap();

        assert_eq!(entries.get("path").map(String::as_str), Some("C:\\"));
        assert_eq!(entries.get("next").map(String::as_str), Some("1"));
    }

    #[test]
    fn rejects_bad_unicode_escape() {
        let result = parse_properties_catalog("ok=1\nbad=\\u12G4\n");

        assert!(matches!(result, Err(CatalogError::Properties { line: 2, .. })));
    }

    #[test]
    fn written_catalog_parses_back() {
        let mut entries = BTreeMap::new();
        for (i, text) in [
            "Hello",
            "a = b",
            "tab\there",
            "multi\nline",
            "back\\slash",
            "日本語",
            "  indented",
            "\t\u{c} mixed lead",
            "trailing  ",
        ]
        .into_iter()
        .enumerate()
        {
            entries.insert(format!("h{i}"), TranslationEntry::singular(text, Some(text)));
        }
        let data = TranslationData::new(entries, PoMetadata::default());

        let text = write_properties_catalog(&data, "ja", PropertiesWriteOptions::default());
        let parsed = sorted(parse_properties_catalog(&text).unwrap());

        let expected: BTreeMap<String, String> =
            data.entries.iter().map(|(k, e)| (k.clone(), e.original_text.clone())).collect();
        assert_eq!(parsed, expected);
    }
}
