//! Project configuration (`.natural-i18n.json`).
mod loader;
mod manager;
mod matcher;
mod types;

pub use manager::ConfigManager;
pub use matcher::{
    FileMatcher,
    MatcherError,
};
pub use types::{
    CompileConfig,
    ConfigError,
    I18nSettings,
    MessageSourceConfig,
    PoFilesConfig,
    ValidationError,
};

/// Configuration file looked up at the project root.
pub const CONFIG_FILE_NAME: &str = ".natural-i18n.json";
