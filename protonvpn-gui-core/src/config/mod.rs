//! Configuration management
//!
//! Settings are stored as TOML in `$XDG_CONFIG_HOME/protonvpn-gui/`.

mod manager;
pub mod settings;

pub use manager::{ConfigManager, SESSION_FILE, SETTINGS_FILE};
pub use settings::{
    AppSettings, ColorScheme, DEFAULT_CONNECTION_PREFIX, LoggingSettings, NetworkSettings,
    UiSettings,
};
