//! ProtonVPN - GTK4 desktop front-end
//!
//! Presents the login and dashboard windows, the global actions (quit,
//! logout, about, get logs) and the tray indicator. All VPN work is delegated
//! to [`protonvpn_gui_core`], whose [`AppController`](protonvpn_gui_core::AppController)
//! drives this crate through the [`shell::GtkShell`] implementation.
//!
//! # GTK Widget Lifecycle
//!
//! Window structs keep their widgets as fields and are shared as `Rc`.
//! Signal handlers capture `Weak` references to them, so a closed window is
//! freed once the shell forgets it and no handler keeps it alive.

// Global clippy lint configuration for GUI code
#![allow(clippy::too_many_lines)] // GUI setup functions are inherently long
#![allow(clippy::type_complexity)] // GTK callback types are complex by design
#![allow(clippy::missing_errors_doc)] // Internal GUI functions don't need error docs

mod app;
mod dialogs;
mod i18n;
mod shell;
mod tasks;
#[cfg(feature = "tray")]
mod tray;
mod window;

use protonvpn_gui_core::paths::{self, CONFIG_DIR_NAME};
use protonvpn_gui_core::{AppSettings, ConfigManager, LogOutput, LoggingConfig, init_logging};

/// Oldest GTK runtime the interface is built for
const MIN_GTK_VERSION: (u32, u32, u32) = (4, 14, 0);

fn main() -> gtk4::glib::ExitCode {
    let (config, config_error) = match ConfigManager::new() {
        Ok(config) => (config, None),
        Err(e) => (
            ConfigManager::with_config_dir(std::env::temp_dir().join(CONFIG_DIR_NAME)),
            Some(e),
        ),
    };
    let settings = config.load_settings_or_default();

    if let Err(e) = init_logging(&logging_config(&settings)) {
        eprintln!("Failed to initialize logging: {e}");
    }
    if let Some(e) = config_error {
        tracing::warn!(%e, path = %config.config_dir().display(), "No config directory, using fallback");
    }

    i18n::init();

    let (major, minor, micro) = MIN_GTK_VERSION;
    if let Some(reason) = gtk4::check_version(major, minor, micro) {
        tracing::error!(
            %reason,
            "GTK {major}.{minor}.{micro} or newer is required, found {}.{}.{}",
            gtk4::major_version(),
            gtk4::minor_version(),
            gtk4::micro_version()
        );
        return gtk4::glib::ExitCode::FAILURE;
    }

    app::run(config, settings)
}

/// Logging setup derived from the `[logging]` settings
fn logging_config(settings: &AppSettings) -> LoggingConfig {
    let output = if settings.logging.log_to_file {
        LogOutput::StderrAndFile(paths::log_file())
    } else {
        LogOutput::Stderr
    };
    LoggingConfig::new()
        .with_level(settings.logging.level)
        .with_output(output)
}
