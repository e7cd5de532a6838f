//! Runtime catalog formats.
//!
//! Every format maps a message hash to its translation. File names follow
//! `messages_<locale>.<ext>` with `-` in the locale replaced by `_`.

pub mod binary;
mod error;
pub mod json;
pub mod properties;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use error::CatalogError;
use serde::{
    Deserialize,
    Serialize,
};

/// File name prefix shared by all formats.
pub const FILE_PREFIX: &str = "messages_";

/// Output and input catalog formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFormat {
    Json,
    Properties,
    #[serde(alias = "bin")]
    Binary,
}

impl CatalogFormat {
    pub const ALL: [Self; 3] = [Self::Json, Self::Properties, Self::Binary];

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Properties => "properties",
            Self::Binary => "bin",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Properties => "properties",
            Self::Binary => "binary",
        }
    }

    /// `messages_<locale>.<ext>`
    #[must_use]
    pub fn file_name(self, locale: &str) -> String {
        format!("{FILE_PREFIX}{}.{}", normalize_locale(locale), self.extension())
    }

    /// Format of a catalog file, from its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        Self::ALL.into_iter().find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    /// Decodes raw file contents in this format into hash → translation.
    ///
    /// Binary catalogs damaged inside the entry list yield the entries read so
    /// far; see [`binary::decode_catalog`].
    ///
    /// # Errors
    /// Returns an error if the contents cannot be decoded at all.
    pub fn decode(self, bytes: &[u8]) -> Result<HashMap<String, String>, CatalogError> {
        match self {
            Self::Binary => Ok(binary::decode_catalog(bytes)?.entries),
            Self::Json => json::parse_json_catalog(&text(bytes)?),
            Self::Properties => properties::parse_properties_catalog(&text(bytes)?),
        }
    }
}

fn text(bytes: &[u8]) -> Result<String, CatalogError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| CatalogError::InvalidUtf8 {
        field: "catalog",
        offset: e.utf8_error().valid_up_to(),
    })
}

impl fmt::Display for CatalogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown catalog format \"{0}\" (expected json, properties or binary)")]
pub struct UnknownFormat(pub String);

impl FromStr for CatalogFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "properties" => Ok(Self::Properties),
            "binary" | "bin" => Ok(Self::Binary),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// `fr-CA` → `fr_CA`
#[must_use]
pub fn normalize_locale(locale: &str) -> String {
    locale.replace('-', "_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::json(CatalogFormat::Json, "fr", "messages_fr.json")]
    #[case::properties(CatalogFormat::Properties, "de", "messages_de.properties")]
    #[case::binary_region(CatalogFormat::Binary, "fr-CA", "messages_fr_CA.bin")]
    #[case::already_normalized(CatalogFormat::Binary, "pt_BR", "messages_pt_BR.bin")]
    fn file_names(#[case] format: CatalogFormat, #[case] locale: &str, #[case] expected: &str) {
        assert_eq!(format.file_name(locale), expected);
    }

    #[rstest]
    #[case::json("i18n/messages_fr.json", Some(CatalogFormat::Json))]
    #[case::properties("messages_fr.properties", Some(CatalogFormat::Properties))]
    #[case::binary("messages_fr.BIN", Some(CatalogFormat::Binary))]
    #[case::po("fr.po", None)]
    #[case::no_extension("messages_fr", None)]
    fn format_from_path(#[case] path: &str, #[case] expected: Option<CatalogFormat>) {
        assert_eq!(CatalogFormat::from_path(Path::new(path)), expected);
    }

    #[rstest]
    #[case::json("json", CatalogFormat::Json)]
    #[case::upper("JSON", CatalogFormat::Json)]
    #[case::properties("properties", CatalogFormat::Properties)]
    #[case::binary("binary", CatalogFormat::Binary)]
    #[case::bin("bin", CatalogFormat::Binary)]
    fn parse_names(#[case] name: &str, #[case] expected: CatalogFormat) {
        assert_eq!(name.parse::<CatalogFormat>().unwrap(), expected);
    }

    #[googletest::test]
    fn rejects_unknown_name() {
        let err = "yaml".parse::<CatalogFormat>().unwrap_err();

        expect_that!(err.0, eq("yaml"));
        expect_that!(err.to_string(), contains_substring("yaml"));
    }

    #[test]
    fn deserializes_bin_alias() {
        let formats: Vec<CatalogFormat> =
            serde_json::from_str(r#"["json", "bin", "binary", "properties"]"#).unwrap();

        assert_eq!(
            formats,
            vec![
                CatalogFormat::Json,
                CatalogFormat::Binary,
                CatalogFormat::Binary,
                CatalogFormat::Properties
            ]
        );
    }

    #[test]
    fn decodes_every_format() {
        let json = br#"{"h1": "Bonjour"}"#;
        let properties = b"h1=Bonjour\n";
        let entries = std::collections::BTreeMap::from([(
            "h1".to_string(),
            Some("Bonjour".to_string()),
        )]);
        let binary = binary::CatalogWriter::new().encode("fr", &entries).unwrap();

        for (format, bytes) in [
            (CatalogFormat::Json, json.to_vec()),
            (CatalogFormat::Properties, properties.to_vec()),
            (CatalogFormat::Binary, binary),
        ] {
            let decoded = format.decode(&bytes).unwrap();
            assert_eq!(decoded.get("h1").map(String::as_str), Some("Bonjour"), "{format}");
        }
    }

    #[test]
    fn decode_rejects_non_utf8_text() {
        assert!(matches!(
            CatalogFormat::Json.decode(&[0xFF, 0x00]),
            Err(CatalogError::InvalidUtf8 { field: "catalog", offset: 0 })
        ));
    }
}
