//! Configuration file loading.

use std::path::Path;

use jsonc_parser::ParseOptions;

use super::{
    CONFIG_FILE_NAME,
    ConfigError,
    I18nSettings,
};

/// Loads `.natural-i18n.json` from the project root.
///
/// # Returns
/// - `Ok(Some(settings))`: the file exists and parses
/// - `Ok(None)`: there is no configuration file
/// - `Err(ConfigError)`: the file cannot be read or parsed
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<I18nSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    load_from_path(&config_path).map(Some)
}

/// Loads settings from an explicit file.
///
/// Comments and trailing commas are accepted. An empty file yields the
/// defaults.
pub(super) fn load_from_path(config_path: &Path) -> Result<I18nSettings, ConfigError> {
    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(config_path)?;
    parse_settings(&content)
}

fn parse_settings(content: &str) -> Result<I18nSettings, ConfigError> {
    let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
        .map_err(|e| ConfigError::SyntaxError(e.to_string()))?;

    match value {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(I18nSettings::default()),
    }
}
