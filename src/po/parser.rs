//! Line-oriented PO parser.
//!
//! Produces [`TranslationData`] keyed by message hash. Singular entries are
//! keyed by `hash(msgid, msgctxt)`. Plural entries are keyed by the hash of
//! their canonical ICU form `{0, plural, one {msgid} other {msgid_plural}}`,
//! which is what [`PluralBuilder`](crate::plural::PluralBuilder) computes for
//! the same forms.

use std::collections::BTreeMap;
use std::path::Path;

use super::PoParseError;
use crate::hash::HashGenerator;
use crate::plural::{
    PluralForm,
    is_icu_plural,
    to_icu_string,
};
use crate::types::{
    PoMetadata,
    TranslationData,
    TranslationEntry,
};

/// Field that continuation strings are appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    MsgstrIndex(usize),
}

/// Entry being accumulated.
#[derive(Debug, Default)]
struct PendingEntry {
    /// Line of the first keyword.
    line: usize,
    msgctxt: Option<String>,
    msgid: Option<String>,
    msgid_plural: Option<String>,
    msgstr: Option<String>,
    msgstr_plural: BTreeMap<usize, String>,
    reference: Option<String>,
    fuzzy: bool,
}

impl PendingEntry {
    fn has_translation_fields(&self) -> bool {
        self.msgstr.is_some() || !self.msgstr_plural.is_empty()
    }

    fn is_empty(&self) -> bool {
        self.msgctxt.is_none()
            && self.msgid.is_none()
            && self.msgid_plural.is_none()
            && !self.has_translation_fields()
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Msgctxt => self.msgctxt.get_or_insert_default(),
            Field::Msgid => self.msgid.get_or_insert_default(),
            Field::MsgidPlural => self.msgid_plural.get_or_insert_default(),
            Field::Msgstr => self.msgstr.get_or_insert_default(),
            Field::MsgstrIndex(index) => self.msgstr_plural.entry(index).or_default(),
        }
    }
}

/// Parses PO text into [`TranslationData`].
#[derive(Debug)]
pub struct PoParser<'a> {
    hasher: &'a dyn HashGenerator,
}

impl<'a> PoParser<'a> {
    #[must_use]
    pub fn new(hasher: &'a dyn HashGenerator) -> Self {
        Self { hasher }
    }

    /// Reads and parses a PO file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is malformed.
    pub fn parse_file(&self, path: &Path) -> Result<TranslationData, PoParseError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| PoParseError::Io { path: path.to_path_buf(), source })?;
        let data = self.parse(&text)?;
        tracing::debug!(
            path = %path.display(),
            entries = data.entry_count(),
            translated = data.translated_count(),
            "Parsed PO file"
        );
        Ok(data)
    }

    /// Parses PO text.
    ///
    /// Obsolete (`#~`) entries are skipped. Fuzzy entries keep their msgid
    /// but lose their translation, as `msgfmt` does.
    ///
    /// # Errors
    /// Returns an error with a 1-based line number on malformed input.
    pub fn parse(&self, text: &str) -> Result<TranslationData, PoParseError> {
        let mut entries = BTreeMap::new();
        let mut metadata = None;
        let mut pending = PendingEntry::default();
        let mut field: Option<Field> = None;

        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim();

            if line.is_empty() {
                self.finish(std::mem::take(&mut pending), &mut entries, &mut metadata)?;
                field = None;
                continue;
            }

            if let Some(comment) = line.strip_prefix('#') {
                if comment.starts_with('~') {
                    continue;
                }
                if pending.has_translation_fields() {
                    self.finish(std::mem::take(&mut pending), &mut entries, &mut metadata)?;
                    field = None;
                }
                if let Some(references) = comment.strip_prefix(':') {
                    if pending.reference.is_none() {
                        pending.reference =
                            references.split_whitespace().next().map(str::to_string);
                    }
                } else if let Some(flags) = comment.strip_prefix(',') {
                    pending.fuzzy |= flags.split(',').any(|flag| flag.trim() == "fuzzy");
                }
                continue;
            }

            if line.starts_with('"') {
                let Some(current) = field else {
                    return Err(PoParseError::OrphanContinuation { line: line_number });
                };
                let value = parse_quoted(line, line_number)?;
                pending.field_mut(current).push_str(&value);
                continue;
            }

            let (keyword, rest) = line.split_once(char::is_whitespace).ok_or_else(|| {
                PoParseError::UnexpectedLine { line: line_number, content: line.to_string() }
            })?;
            let next_field = parse_keyword(keyword, line_number)?;

            // A new msgctxt/msgid after a translation starts the next entry.
            if matches!(next_field, Field::Msgctxt | Field::Msgid)
                && pending.has_translation_fields()
            {
                self.finish(std::mem::take(&mut pending), &mut entries, &mut metadata)?;
            }
            if pending.is_empty() {
                pending.line = line_number;
            }

            let value = parse_quoted(rest.trim(), line_number)?;
            *pending.field_mut(next_field) = value;
            field = Some(next_field);
        }
        self.finish(pending, &mut entries, &mut metadata)?;

        Ok(TranslationData::new(entries, metadata.unwrap_or_default()))
    }

    fn finish(
        &self,
        pending: PendingEntry,
        entries: &mut BTreeMap<String, TranslationEntry>,
        metadata: &mut Option<PoMetadata>,
    ) -> Result<(), PoParseError> {
        if pending.msgid.is_none() && pending.has_translation_fields() {
            return Err(PoParseError::MissingMsgid { line: pending.line });
        }
        let Some(msgid) = pending.msgid else {
            return Ok(());
        };
        let context = pending.msgctxt.as_deref();

        if msgid.is_empty() && context.is_none() {
            if metadata.is_none() {
                *metadata = Some(parse_header(pending.msgstr.as_deref().unwrap_or_default()));
            }
            return Ok(());
        }

        let (hash, entry) = match pending.msgid_plural {
            Some(plural_text) => {
                let key_text = if is_icu_plural(&msgid) {
                    msgid.clone()
                } else {
                    to_icu_string(&BTreeMap::from([
                        (PluralForm::One, msgid.clone()),
                        (PluralForm::Other, plural_text.clone()),
                    ]))
                };
                let forms = if pending.fuzzy { BTreeMap::new() } else { pending.msgstr_plural };
                (
                    self.hasher.generate_hash_with_context(&key_text, context),
                    TranslationEntry::plural(msgid, plural_text, forms),
                )
            }
            None => {
                let translation = pending.msgstr.filter(|t| !t.is_empty() && !pending.fuzzy);
                (
                    self.hasher.generate_hash_with_context(&msgid, context),
                    TranslationEntry::singular(msgid, translation.as_deref()),
                )
            }
        };
        let entry = match pending.reference {
            Some(reference) => entry.with_source_location(reference),
            None => entry,
        };

        if entries.contains_key(&hash) {
            tracing::warn!(
                line = pending.line,
                hash = %hash,
                msgid = %entry.original_text,
                "Duplicate message, keeping the first occurrence"
            );
        } else {
            entries.insert(hash, entry);
        }
        Ok(())
    }
}

fn parse_keyword(keyword: &str, line: usize) -> Result<Field, PoParseError> {
    match keyword {
        "msgctxt" => Ok(Field::Msgctxt),
        "msgid" => Ok(Field::Msgid),
        "msgid_plural" => Ok(Field::MsgidPlural),
        "msgstr" => Ok(Field::Msgstr),
        _ => {
            let index = keyword
                .strip_prefix("msgstr[")
                .and_then(|rest| rest.strip_suffix(']'))
                .ok_or_else(|| PoParseError::UnexpectedLine {
                    line,
                    content: keyword.to_string(),
                })?;
            index
                .trim()
                .parse()
                .map(Field::MsgstrIndex)
                .map_err(|_| PoParseError::InvalidPluralIndex { line, index: index.to_string() })
        }
    }
}

/// Parses one `"..."` literal with C escapes.
fn parse_quoted(text: &str, line: usize) -> Result<String, PoParseError> {
    let invalid = |message: &str| PoParseError::InvalidString { line, message: message.into() };

    let mut chars = text.chars();
    if chars.next() != Some('"') {
        return Err(invalid("expected '\"'"));
    }

    let mut value = String::with_capacity(text.len());
    loop {
        match chars.next() {
            None => return Err(invalid("missing closing '\"'")),
            Some('"') => break,
            Some('\\') => {
                let escaped = match chars.next() {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('r') => '\r',
                    Some('"') => '"',
                    Some('\\') => '\\',
                    Some('a') => '\u{7}',
                    Some('b') => '\u{8}',
                    Some('f') => '\u{c}',
                    Some('v') => '\u{b}',
                    Some(other) => return Err(invalid(&format!("unknown escape '\\{other}'"))),
                    None => return Err(invalid("dangling '\\'")),
                };
                value.push(escaped);
            }
            Some(c) => value.push(c),
        }
    }

    if !chars.as_str().trim().is_empty() {
        return Err(invalid("unexpected text after closing '\"'"));
    }
    Ok(value)
}

/// Parses the header entry's `Name: value` lines.
#[must_use]
pub fn parse_header(header: &str) -> PoMetadata {
    let mut metadata = PoMetadata::default();
    for line in header.lines() {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        match name.trim() {
            "Project-Id-Version" => metadata.project_id_version = Some(value),
            "Language" => metadata.language = Some(value),
            "POT-Creation-Date" => metadata.pot_creation_date = Some(value),
            "PO-Revision-Date" => metadata.po_revision_date = Some(value),
            "Content-Type" => metadata.content_type = Some(value),
            "Plural-Forms" => metadata.plural_forms = Some(value),
            other => {
                metadata.other.insert(other.to_string(), value);
            }
        }
    }
    metadata
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::hash::Sha256HashGenerator;
    use crate::types::EntryContent;

    const HASHER: Sha256HashGenerator = Sha256HashGenerator::new();

    fn parse(text: &str) -> TranslationData {
        PoParser::new(&HASHER).parse(text).unwrap()
    }

    const SAMPLE: &str = r#"# French translations.
msgid ""
msgstr ""
"Project-Id-Version: demo 1.0\n"
"Language: fr\n"
"PO-Revision-Date: 2024-01-01 12:00+0000\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Plural-Forms: nplurals=2; plural=(n > 1);\n"
"X-Generator: hand\n"

#: src/main.rs:10 src/lib.rs:3
msgid "Hello"
msgstr "Bonjour"

msgctxt "menu"
msgid "Open"
msgstr "Ouvrir"

msgid ""
"Multi "
"line"
msgstr "Sur "
"plusieurs lignes"

msgid "{0} file"
msgid_plural "{0} files"
msgstr[0] "{0} fichier"
msgstr[1] "{0} fichiers"

#, fuzzy
msgid "Draft"
msgstr "Brouillon"

msgid "Untranslated"
msgstr ""

#~ msgid "Old"
#~ msgstr "Vieux"
"#;

    #[googletest::test]
    fn parses_header() {
        let data = parse(SAMPLE);

        expect_that!(data.metadata.project_id_version.as_deref(), some(eq("demo 1.0")));
        expect_that!(data.metadata.language.as_deref(), some(eq("fr")));
        expect_that!(
            data.metadata.po_revision_date.as_deref(),
            some(eq("2024-01-01 12:00+0000"))
        );
        expect_that!(data.metadata.nplurals(), some(eq(2)));
        expect_that!(data.metadata.other.get("X-Generator").map(String::as_str), some(eq("hand")));
    }

    #[test]
    fn parses_singular_entries() {
        let data = parse(SAMPLE);

        let hello = &data.entries[&HASHER.generate_hash("Hello")];
        assert_eq!(
            hello.content,
            EntryContent::Singular { translation: Some("Bonjour".to_string()) }
        );
        assert_eq!(hello.source_location.as_deref(), Some("src/main.rs:10"));

        let open = &data.entries[&HASHER.generate_hash("menu:Open")];
        assert!(open.has_translation());
        assert!(!data.entries.contains_key(&HASHER.generate_hash("Open")));

        assert!(data.has_translation(&HASHER.generate_hash("Multi line")));
        assert!(!data.has_translation(&HASHER.generate_hash("Untranslated")));
        assert!(data.entries.contains_key(&HASHER.generate_hash("Untranslated")));
    }

    #[test]
    fn fuzzy_entries_are_untranslated() {
        let data = parse(SAMPLE);

        let draft = &data.entries[&HASHER.generate_hash("Draft")];
        assert!(!draft.has_translation());
    }

    #[test]
    fn skips_obsolete_entries() {
        let data = parse(SAMPLE);

        assert!(!data.entries.contains_key(&HASHER.generate_hash("Old")));
        assert_eq!(data.entry_count(), 6);
    }

    #[test]
    fn plural_entry_is_keyed_by_canonical_icu() {
        let data = parse(SAMPLE);
        let hash = HASHER.generate_hash("{0, plural, one {{0} file} other {{0} files}}");

        let entry = &data.entries[&hash];
        assert!(entry.is_plural());
        assert_eq!(
            data.compiled_translations(false).get(&hash).cloned().flatten().as_deref(),
            Some("{0, plural, one {{0} fichier} other {{0} fichiers}}")
        );
    }

    #[test]
    fn icu_msgid_is_hashed_as_is() {
        let icu = "{0, plural, one {# item} other {# items}}";
        let text = format!(
            "msgid \"{icu}\"\n\
             msgid_plural \"# items\"\n\
             msgstr[0] \"# élément\"\n\
             msgstr[1] \"# éléments\"\n"
        );

        let data = parse(&text);

        assert!(data.entries.contains_key(&HASHER.generate_hash(icu)));
    }

    #[test]
    fn unescapes_strings() {
        let data = parse(r#"msgid "Tab\tquote\"back\\slash\nend"
msgstr "ok""#);

        assert!(data.entries.contains_key(&HASHER.generate_hash("Tab\tquote\"back\\slash\nend")));
    }

    #[test]
    fn entries_without_blank_separator() {
        let data = parse("msgid \"a\"\nmsgstr \"A\"\nmsgid \"b\"\nmsgstr \"B\"\n");

        assert_eq!(data.entry_count(), 2);
        assert!(data.has_translation(&HASHER.generate_hash("b")));
    }

    #[test]
    fn duplicate_keeps_first() {
        let data = parse("msgid \"a\"\nmsgstr \"first\"\n\nmsgid \"a\"\nmsgstr \"second\"\n");

        assert_eq!(
            data.entries[&HASHER.generate_hash("a")].compiled_translation(None).as_deref(),
            Some("first")
        );
    }

    #[rstest]
    #[case::unknown_keyword("msgid \"a\"\nmsgfoo \"b\"\n", 2)]
    #[case::bare_word("msgid \"a\"\nmsgstr \"b\"\ngarbage\n", 3)]
    #[case::unterminated("msgid \"a\nmsgstr \"b\"\n", 1)]
    #[case::bad_escape("msgid \"a\\q\"\nmsgstr \"b\"\n", 1)]
    #[case::orphan_continuation("\"dangling\"\n", 1)]
    #[case::bad_plural_index("msgid \"a\"\nmsgid_plural \"b\"\nmsgstr[x] \"c\"\n", 3)]
    #[case::trailing_text("msgid \"a\" extra\nmsgstr \"b\"\n", 1)]
    fn malformed_input_reports_line(#[case] text: &str, #[case] expected_line: usize) {
        let err = PoParser::new(&HASHER).parse(text).unwrap_err();

        let line = match err {
            PoParseError::UnexpectedLine { line, .. }
            | PoParseError::InvalidString { line, .. }
            | PoParseError::OrphanContinuation { line }
            | PoParseError::InvalidPluralIndex { line, .. }
            | PoParseError::MissingMsgid { line } => line,
            PoParseError::Io { .. } => panic!("unexpected I/O error"),
        };
        assert_eq!(line, expected_line);
    }

    #[test]
    fn msgstr_without_msgid_is_an_error() {
        let err = PoParser::new(&HASHER).parse("msgstr \"orphan\"\n").unwrap_err();

        assert!(matches!(err, PoParseError::MissingMsgid { line: 1 }));
    }

    #[test]
    fn parse_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PoParser::new(&HASHER).parse_file(&dir.path().join("missing.po")).unwrap_err();

        assert!(matches!(err, PoParseError::Io { .. }));
    }
}
