//! JSON catalog (`messages_<locale>.json`).
//!
//! A flat object keyed by hash. Values are either the translation itself or
//! an object carrying `translation` (and optionally `source`). Keys starting
//! with `_metadata` are reserved.

use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

use super::CatalogError;
use crate::types::TranslationData;

/// Prefix of reserved, non-translation keys.
pub const METADATA_KEY: &str = "_metadata";

/// Optional `_metadata` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JsonCatalogMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

/// Options for [`write_json_catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonWriteOptions {
    /// Emit `_metadata` and `{"translation", "source"}` objects.
    pub include_metadata: bool,
    /// Keep entries without a translation (written as empty strings).
    pub include_untranslated: bool,
    pub pretty: bool,
}

impl Default for JsonWriteOptions {
    fn default() -> Self {
        Self { include_metadata: true, include_untranslated: false, pretty: true }
    }
}

/// Serializes a catalog to JSON text.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn write_json_catalog(
    data: &TranslationData,
    locale: &str,
    options: JsonWriteOptions,
) -> Result<String, CatalogError> {
    let mut root = Map::new();
    let translations = data.compiled_translations(options.include_untranslated);

    if options.include_metadata {
        let metadata = JsonCatalogMetadata {
            locale: Some(locale.to_string()),
            entry_count: Some(translations.len()),
            last_modified: Some(
                data.metadata
                    .po_revision_date
                    .clone()
                    .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
            ),
        };
        root.insert(METADATA_KEY.to_string(), serde_json::to_value(metadata)?);
    }

    for (hash, translation) in &translations {
        let translation = translation.clone().unwrap_or_default();
        let value = if options.include_metadata {
            let mut entry = Map::new();
            entry.insert("translation".to_string(), Value::String(translation));
            if let Some(source) = data.entries.get(hash).map(|e| e.original_text.clone()) {
                entry.insert("source".to_string(), Value::String(source));
            }
            Value::Object(entry)
        } else {
            Value::String(translation)
        };
        root.insert(hash.clone(), value);
    }

    let root = Value::Object(root);
    let text = if options.pretty {
        serde_json::to_string_pretty(&root)?
    } else {
        serde_json::to_string(&root)?
    };
    Ok(text)
}

/// Parses a JSON catalog into hash → translation.
///
/// Values that are neither strings nor objects with a string `translation`
/// are skipped.
///
/// # Errors
/// Returns an error if the text is not JSON or the root is not an object.
pub fn parse_json_catalog(text: &str) -> Result<HashMap<String, String>, CatalogError> {
    let root: Value = serde_json::from_str(text)?;
    let Value::Object(map) = root else {
        return Err(CatalogError::JsonNotObject);
    };

    let mut entries = HashMap::with_capacity(map.len());
    for (key, value) in map {
        if key.starts_with(METADATA_KEY) {
            continue;
        }
        match value {
            Value::String(translation) => {
                entries.insert(key, translation);
            }
            Value::Object(mut object) => match object.remove("translation") {
                Some(Value::String(translation)) => {
                    entries.insert(key, translation);
                }
                _ => tracing::debug!("Skipping JSON entry without translation: {key}"),
            },
            _ => tracing::debug!("Skipping non-string JSON entry: {key}"),
        }
    }
    Ok(entries)
}

/// Reads the `_metadata` object, if present and well-formed.
#[must_use]
pub fn parse_json_metadata(text: &str) -> Option<JsonCatalogMetadata> {
    let root: Value = serde_json::from_str(text).ok()?;
    let metadata = root.get(METADATA_KEY)?.clone();
    serde_json::from_value(metadata).ok()
}
