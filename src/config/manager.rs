//! Settings lifecycle: load, validate, hold.

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    I18nSettings,
    loader,
};

/// Holds the validated settings of one project.
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// Validated settings in effect
    current_settings: I18nSettings,

    /// Base for relative paths in the settings
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: I18nSettings::default(), workspace_root: None }
    }

    /// Loads `.natural-i18n.json` from `workspace_root`, falling back to the
    /// defaults when there is no root or no file.
    ///
    /// # Errors
    /// - The file cannot be read or parsed
    /// - Validation fails
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        let settings = if let Some(root) = &workspace_root {
            loader::load_from_workspace(root)?.map_or_else(I18nSettings::default, |ws| {
                tracing::debug!("Loaded workspace settings: {:?}", ws);
                ws
            })
        } else {
            I18nSettings::default()
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.workspace_root = workspace_root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// Loads settings from an explicit file; relative paths in it resolve
    /// against `workspace_root`.
    ///
    /// # Errors
    /// - The file is missing, unreadable or malformed
    /// - Validation fails
    pub fn load_settings_from_file(
        &mut self,
        config_path: &Path,
        workspace_root: PathBuf,
    ) -> Result<(), ConfigError> {
        let settings = loader::load_from_path(config_path)?;
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.workspace_root = Some(workspace_root);
        tracing::debug!("Settings loaded from {:?}", config_path);

        Ok(())
    }

    /// Replaces the settings after validating them.
    ///
    /// # Errors
    /// Returns every validation problem found.
    pub fn update_settings(&mut self, new_settings: I18nSettings) -> Result<(), ConfigError> {
        tracing::debug!("Updating settings...");

        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    #[must_use]
    pub const fn get_settings(&self) -> &I18nSettings {
        &self.current_settings
    }

    #[must_use]
    pub const fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }

    /// `outputDirectory` resolved against the workspace root.
    #[must_use]
    pub fn output_directory(&self) -> PathBuf {
        self.resolve(&self.current_settings.output_directory)
    }

    /// `messageSource.directory`, or the output directory when unset.
    #[must_use]
    pub fn message_source_directory(&self) -> PathBuf {
        self.current_settings
            .message_source
            .directory
            .as_deref()
            .map_or_else(|| self.output_directory(), |dir| self.resolve(dir))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.workspace_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::CONFIG_FILE_NAME;

    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings().default_locale, "en");
        assert!(manager.workspace_root().is_none());
    }

    #[rstest]
    fn test_load_settings_without_workspace() {
        let mut manager = ConfigManager::new();

        let result = manager.load_settings(None);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings(), &I18nSettings::default());
        assert!(manager.workspace_root().is_none());
    }

    #[rstest]
    fn test_load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"defaultLocale": "de", "outputDirectory": "out"}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().default_locale, "de");
        assert_eq!(manager.output_directory(), temp_dir.path().join("out"));
        assert_eq!(manager.message_source_directory(), temp_dir.path().join("out"));
    }

    #[rstest]
    fn test_load_settings_without_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().default_locale, "en");
        assert_eq!(manager.output_directory(), temp_dir.path().join("i18n"));
    }

    #[rstest]
    fn test_load_settings_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"hashLength": 0}"#).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert!(manager.workspace_root().is_none());
    }

    #[rstest]
    fn test_load_settings_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.json");
        fs::write(&path, r#"{"messageSource": {"directory": "/srv/i18n"}}"#).unwrap();

        let mut manager = ConfigManager::new();
        manager.load_settings_from_file(&path, temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(manager.message_source_directory(), Path::new("/srv/i18n"));
    }

    #[rstest]
    fn test_load_settings_from_missing_file() {
        let temp_dir = TempDir::new().unwrap();

        let mut manager = ConfigManager::new();
        let result = manager
            .load_settings_from_file(&temp_dir.path().join("nope.json"), PathBuf::from("/"));

        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[rstest]
    fn test_update_settings_valid() {
        let mut manager = ConfigManager::new();
        let new_settings =
            I18nSettings { default_locale: "ja".to_string(), ..I18nSettings::default() };

        let result = manager.update_settings(new_settings);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().default_locale, "ja");
    }

    #[rstest]
    fn test_update_settings_invalid() {
        let mut manager = ConfigManager::new();
        let new_settings = I18nSettings { output_formats: Vec::new(), ..I18nSettings::default() };

        let result = manager.update_settings(new_settings);

        assert!(result.is_err());
        assert!(manager.get_settings().output_formats.len() == 1);
    }
}
