//! Application settings stored in `settings.toml`

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Default prefix of the NetworkManager profiles managed by the app
pub const DEFAULT_CONNECTION_PREFIX: &str = "ProtonVPN";

/// Root settings document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Window and tray options (`[ui]`)
    #[serde(default)]
    pub ui: UiSettings,
    /// Logging options (`[logging]`)
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Backend options (`[network]`)
    #[serde(default)]
    pub network: NetworkSettings,
}

/// Color scheme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Follow the desktop preference
    #[default]
    System,
    /// Always light
    Light,
    /// Always dark
    Dark,
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Show the tray indicator (default: true)
    #[serde(default = "default_true")]
    pub enable_tray_icon: bool,
    /// Color scheme
    #[serde(default)]
    pub color_scheme: ColorScheme,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            enable_tray_icon: true,
            color_scheme: ColorScheme::System,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level written (default: info)
    #[serde(default)]
    pub level: LogLevel,
    /// Also write to the log file bundled in bug reports (default: true)
    #[serde(default = "default_true")]
    pub log_to_file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            log_to_file: true,
        }
    }
}

/// Backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Only profiles whose name starts with this prefix are shown
    #[serde(default = "default_prefix")]
    pub connection_prefix: String,
    /// Dashboard refresh interval in seconds (minimum 1, default 5)
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u32,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            connection_prefix: default_prefix(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl NetworkSettings {
    /// Refresh interval with the lower bound applied
    #[must_use]
    pub const fn effective_refresh_interval_secs(&self) -> u32 {
        if self.refresh_interval_secs == 0 {
            1
        } else {
            self.refresh_interval_secs
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_prefix() -> String {
    DEFAULT_CONNECTION_PREFIX.to_string()
}

const fn default_refresh_interval_secs() -> u32 {
    5
}
