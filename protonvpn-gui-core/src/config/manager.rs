//! Loading and saving `settings.toml`

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::paths;

use super::settings::AppSettings;

/// Settings file name inside the config directory
pub const SETTINGS_FILE: &str = "settings.toml";

/// Session marker file name inside the config directory
pub const SESSION_FILE: &str = "session.toml";

/// Manages the front-end's configuration directory
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager for the user's config directory
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] when the platform has no config
    /// directory.
    pub fn new() -> ConfigResult<Self> {
        let config_dir = paths::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self { config_dir })
    }

    /// Creates a manager rooted at an explicit directory
    #[must_use]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Config directory
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the settings file
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Path of the session marker
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.config_dir.join(SESSION_FILE)
    }

    /// Loads settings, returning defaults when the file does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_settings(&self) -> ConfigResult<AppSettings> {
        let path = self.settings_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(AppSettings::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path,
            reason: e.to_string(),
        })
    }

    /// Loads settings, logging and falling back to defaults on error
    #[must_use]
    pub fn load_settings_or_default(&self) -> AppSettings {
        self.load_settings().unwrap_or_else(|e| {
            tracing::warn!(%e, "Failed to load settings, using defaults");
            AppSettings::default()
        })
    }

    /// Writes settings, creating the directory when needed
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_settings(&self, settings: &AppSettings) -> ConfigResult<()> {
        std::fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Io {
            path: self.config_dir.clone(),
            source,
        })?;

        let content =
            toml::to_string_pretty(settings).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        let path = self.settings_path();
        std::fs::write(&path, content).map_err(|source| ConfigError::Io { path, source })
    }
}
