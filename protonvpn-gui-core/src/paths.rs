//! Well-known file locations
//!
//! Logs live in the fixed cache directory shared with the VPN library
//! (`~/.cache/protonvpn/logs`); settings and the session marker live in the
//! front-end's own config directory.

use std::path::PathBuf;

/// Directory name under the user config dir
pub const CONFIG_DIR_NAME: &str = "protonvpn-gui";

/// Log file written by the GUI
pub const LOG_FILE_NAME: &str = "protonvpn-gui.log";

/// Returns the logs directory (`$XDG_CACHE_HOME/protonvpn/logs`)
///
/// Falls back to `~/.cache` and finally to the temp dir when no cache
/// directory can be determined.
#[must_use]
pub fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir)
        .join("protonvpn")
        .join("logs")
}

/// Returns the GUI log file path
#[must_use]
pub fn log_file() -> PathBuf {
    log_dir().join(LOG_FILE_NAME)
}

/// Returns the config directory, if the platform has one
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME))
}
