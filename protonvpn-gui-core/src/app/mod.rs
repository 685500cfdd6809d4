//! Application lifecycle coordination
//!
//! [`AppController`] holds the process-wide state and drives windows and
//! dialogs through the [`Shell`] seam.

mod controller;
mod shell;

pub use controller::{
    APP_ID, AppController, AppPhase, GENERATING_LOGS_BODY, GENERATING_LOGS_TITLE,
    LOGGING_OUT_BODY, LOGOUT_FAILED_BODY, LOGOUT_FAILED_TITLE, LOGOUT_PENDING_BODY, LOGOUT_TITLE,
    LOGS_FAILED_BODY, LOGS_FAILED_TITLE, LOGS_FOLDER_FAILED_BODY, LogsFailure, StartupOutcome,
};
pub use shell::{AppWindow, Confirmation, GracefulClose, Notice, Shell, ShutdownAware, UiText};
