//! ProtonVPN GUI Core Library
//!
//! Toolkit-independent part of the ProtonVPN GTK front-end: the application
//! controller, the background task dispatcher, the window view models and the
//! NetworkManager-backed VPN backend.
//!
//! # Crate Structure
//!
//! - [`app`] - Application controller and the [`app::Shell`] toolkit seam
//! - [`task`] - Background task dispatch (`setup` / `start` with UI-thread callbacks)
//! - [`backend`] - [`backend::VpnBackend`] trait, `nmcli` implementation, bug reports
//! - [`view_model`] - Login and dashboard presentation state
//! - [`models`] - Servers, server lists and connection status
//! - [`config`] - Settings persistence
//! - [`logging`] - `tracing` subscriber setup
//! - [`privilege`] - Elevated launch detection and confirmation
//! - [`actions`] - Global application actions

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod actions;
pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod paths;
pub mod privilege;
pub mod task;
pub mod view_model;

pub use actions::AppAction;
pub use app::{
    AppController, AppPhase, AppWindow, Confirmation, Notice, Shell, StartupOutcome, UiText,
};
pub use backend::{BugReport, NetworkManagerBackend, VpnBackend, ensure_disconnected};
pub use config::{AppSettings, ConfigManager};
pub use error::{
    BugReportError, BugReportResult, ConfigError, ConfigResult, SessionError, SessionResult,
    VpnError, VpnResult,
};
pub use logging::{LogLevel, LogOutput, LoggingConfig, LoggingError, init_logging};
pub use models::{ActiveConnection, ConnectionStatus, Server, ServerList, VpnKind};
pub use privilege::Privilege;
pub use task::{BackgroundProcess, Executor, TaskError, TaskFactory, TaskKind, TaskOutcome};
pub use view_model::{DashboardViewModel, LoginViewModel};
