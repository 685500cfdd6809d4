//! Integration tests for persistence and bug reports

use protonvpn_gui_core::backend::{BugReport, DiagnosticCommand, LogBundle, Session, SessionStore};
use protonvpn_gui_core::config::{AppSettings, ColorScheme, ConfigManager};
use protonvpn_gui_core::logging::LogLevel;
use tempfile::TempDir;

#[test]
fn session_store_round_trip_and_clear() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().join("nested").join("session.toml"));
    assert!(!store.exists());
    assert_eq!(store.load().unwrap(), None);

    let session = Session::new("alice");
    store.save(&session).unwrap();
    assert!(store.exists());
    assert_eq!(store.load().unwrap(), Some(session));

    store.clear().unwrap();
    assert!(!store.exists());
    // Clearing twice is fine
    store.clear().unwrap();
}

#[test]
fn settings_default_without_file_and_persist() {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::with_config_dir(dir.path().join("protonvpn-gui"));

    let defaults = manager.load_settings().unwrap();
    assert_eq!(defaults, AppSettings::default());
    assert!(defaults.ui.enable_tray_icon);

    let mut settings = defaults;
    settings.ui.color_scheme = ColorScheme::Dark;
    settings.logging.level = LogLevel::Debug;
    settings.network.refresh_interval_secs = 0;
    manager.save_settings(&settings).unwrap();

    let loaded = manager.load_settings().unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.network.effective_refresh_interval_secs(), 1);
}

#[test]
fn invalid_settings_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::with_config_dir(dir.path());
    std::fs::write(manager.settings_path(), "[ui\nbroken").unwrap();

    assert!(manager.load_settings().is_err());
    assert_eq!(manager.load_settings_or_default(), AppSettings::default());
}

#[test]
fn log_bundle_writes_manifest_and_diagnostics() {
    let dir = TempDir::new().unwrap();
    let logs_dir = dir.path().join("logs");
    let bundle = LogBundle::new(
        &logs_dir,
        vec![DiagnosticCommand::new(
            "missing.txt",
            "definitely-not-a-real-binary-4711",
            &["--version"],
        )],
    );

    let written = bundle.generate_logs().unwrap();
    assert_eq!(written, logs_dir);
    assert_eq!(bundle.logs_dir(), logs_dir);

    let manifest = std::fs::read_to_string(logs_dir.join("system-info.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    assert_eq!(value["os"], std::env::consts::OS);
    assert_eq!(value["diagnostics"][0], "missing.txt");

    let diagnostic = std::fs::read_to_string(logs_dir.join("missing.txt")).unwrap();
    assert!(diagnostic.contains("unavailable:"));
}

#[test]
fn log_bundle_fails_when_dir_is_a_file() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("logs");
    std::fs::write(&blocker, "not a directory").unwrap();

    let bundle = LogBundle::new(&blocker, Vec::new());
    assert!(bundle.generate_logs().is_err());
}
