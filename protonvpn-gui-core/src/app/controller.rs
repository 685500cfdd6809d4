//! Application controller
//!
//! One instance lives for the whole process. It reacts to the toolkit's
//! lifecycle signals and the four global actions, decides which window or
//! dialog to show, and pushes every blocking backend call onto a background
//! task. Widget work happens only through the [`Shell`].

use std::cell::{Cell, RefCell};
use std::io::{BufRead, Write};
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use crate::actions::AppAction;
use crate::backend::{BugReport, VpnBackend, ensure_disconnected};
use crate::error::{BugReportError, VpnResult};
use crate::privilege::{Privilege, confirm_elevated_launch};
use crate::task::{BackgroundProcess, TaskFactory, TaskKind, TaskOutcome};

use super::shell::{AppWindow, Confirmation, Notice, Shell, UiText};

/// GTK application id
pub const APP_ID: &str = "com.protonvpn.www";

/// Title of the logout notices
pub const LOGOUT_TITLE: &str = "Logout";
/// Body shown while the logout runs
pub const LOGGING_OUT_BODY: &str = "Logging out...";
/// Body shown when logout is requested twice
pub const LOGOUT_PENDING_BODY: &str = "You're currently being logged out, please wait...";
/// Title shown when the logout call failed
pub const LOGOUT_FAILED_TITLE: &str = "Unable to log out";
/// Body shown when the logout call failed; `{}` is the reason
pub const LOGOUT_FAILED_BODY: &str = "Unable to log out: {}";

/// Title of the log generation notice
pub const GENERATING_LOGS_TITLE: &str = "Generating logs";
/// Body of the log generation notice
pub const GENERATING_LOGS_BODY: &str = "Generating logs, please wait...";
/// Title shown when log generation or folder opening failed
pub const LOGS_FAILED_TITLE: &str = "Unable to generate logs";
/// Body shown when log generation failed; `{}` is the reason
pub const LOGS_FAILED_BODY: &str = "\nUnable to generate logs: {}";
/// Body shown when the file manager could not be opened; `{}` is the logs directory
pub const LOGS_FOLDER_FAILED_BODY: &str =
    "\nUnable to open file explorer with logs. You can find the logs at {}";

/// Coarse application state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    /// Nothing shown yet
    #[default]
    NoWindow,
    /// Login window shown
    Login,
    /// Dashboard window shown
    Dashboard,
    /// Logout task running
    LoggingOut,
    /// Shutting down
    Quitting,
}

/// Result of the startup handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOutcome {
    /// Continue with action registration and activation
    Ready,
    /// The operator declined an elevated launch; the shell was asked to quit
    Abort,
}

/// Which step of the log bundle failed
#[derive(Debug)]
pub enum LogsFailure {
    /// Writing the bundle failed
    Generate(BugReportError),
    /// The file manager could not be opened
    OpenFolder(BugReportError),
}

/// Process-wide application controller
pub struct AppController<S: Shell> {
    shell: S,
    backend: Arc<dyn VpnBackend>,
    tasks: TaskFactory,
    app_version: &'static str,
    is_logging_out: Cell<bool>,
    indicator: RefCell<Option<S::Indicator>>,
    phase: Cell<AppPhase>,
    logout_windows: RefCell<Vec<Rc<dyn AppWindow>>>,
}

impl<S: Shell + 'static> AppController<S> {
    /// Creates a controller; wrap it in an `Rc` before use
    #[must_use]
    pub fn new(shell: S, backend: Arc<dyn VpnBackend>, tasks: TaskFactory) -> Self {
        Self {
            shell,
            backend,
            tasks,
            app_version: env!("CARGO_PKG_VERSION"),
            is_logging_out: Cell::new(false),
            indicator: RefCell::new(None),
            phase: Cell::new(AppPhase::NoWindow),
            logout_windows: RefCell::new(Vec::new()),
        }
    }

    /// Sets the front-end version reported in the startup banner
    #[must_use]
    pub fn with_app_version(mut self, version: &'static str) -> Self {
        self.app_version = version;
        self
    }

    /// The toolkit shell
    #[must_use]
    pub const fn shell(&self) -> &S {
        &self.shell
    }

    /// The VPN backend
    #[must_use]
    pub const fn backend(&self) -> &Arc<dyn VpnBackend> {
        &self.backend
    }

    /// The background task factory
    #[must_use]
    pub const fn tasks(&self) -> &TaskFactory {
        &self.tasks
    }

    /// Current coarse state
    #[must_use]
    pub fn phase(&self) -> AppPhase {
        self.phase.get()
    }

    /// Returns true while a logout is in flight
    #[must_use]
    pub fn is_logging_out(&self) -> bool {
        self.is_logging_out.get()
    }

    /// Returns true once the tray indicator exists
    #[must_use]
    pub fn has_indicator(&self) -> bool {
        self.indicator.borrow().is_some()
    }

    /// Startup handler
    ///
    /// Logs the banner and, for an elevated launch, asks the operator on
    /// `input`/`output` whether to continue. Declining quits the application
    /// before any window exists.
    pub fn startup<R: BufRead, W: Write>(
        &self,
        privilege: Privilege,
        input: R,
        output: W,
    ) -> StartupOutcome {
        tracing::info!("---------------- Initialized ProtonVPN GUI ----------------");
        tracing::info!(
            app_version = self.app_version,
            core_version = env!("CARGO_PKG_VERSION"),
            "ProtonVPN v{} (protonvpn-gui-core v{})",
            self.app_version,
            env!("CARGO_PKG_VERSION")
        );

        if privilege.is_elevated() {
            tracing::info!("Initialized app with elevated privileges");
            let proceed = confirm_elevated_launch(input, output).unwrap_or_else(|e| {
                tracing::warn!(%e, "Unable to read confirmation, assuming no");
                false
            });
            if !proceed {
                tracing::info!("Quit app launched with elevated privileges");
                self.phase.set(AppPhase::Quitting);
                self.shell.quit();
                return StartupOutcome::Abort;
            }
        }

        tracing::info!("Startup successful");
        StartupOutcome::Ready
    }

    /// Activate handler
    ///
    /// Creates the tray indicator on first use, re-presents an existing
    /// window, and otherwise opens the dashboard or login window depending on
    /// whether a session exists.
    pub fn activate(self: &Rc<Self>) {
        if self.indicator.borrow().is_none() {
            let indicator = self.shell.create_indicator();
            *self.indicator.borrow_mut() = indicator;
        }

        if self.shell.has_active_window() {
            tracing::debug!("Presenting existing window");
            self.shell.present_active_window();
            return;
        }

        if self.backend.session_exists() {
            tracing::info!("Window to display: dashboard");
            self.show_dashboard();
        } else {
            tracing::info!("Window to display: login");
            self.show_login();
        }
    }

    /// Runs a global action
    pub fn activate_action(self: &Rc<Self>, action: AppAction) {
        tracing::debug!(action = action.name(), "Application action");
        match action {
            AppAction::Quit => self.request_quit(),
            AppAction::Logout => self.request_logout(),
            AppAction::About => self.show_about(),
            AppAction::GetLogs => self.get_logs(),
        }
    }

    /// Opens the login window
    pub fn show_login(self: &Rc<Self>) {
        self.phase.set(AppPhase::Login);
        let weak = Rc::downgrade(self);
        self.shell.show_login(Rc::new(move || {
            if let Some(controller) = weak.upgrade() {
                tracing::info!("Authenticated, switching to dashboard");
                controller.show_dashboard();
            }
        }));
    }

    /// Opens the dashboard window
    pub fn show_dashboard(&self) {
        self.phase.set(AppPhase::Dashboard);
        self.shell.show_dashboard();
    }

    /// Shows the About dialog
    pub fn show_about(&self) {
        self.shell.show_about();
    }

    /// Quit action: asks first when a connection is active
    pub fn request_quit(self: &Rc<Self>) {
        tracing::info!("Quit app");
        if self.connection_active() {
            let weak = Rc::downgrade(self);
            self.shell.confirm(
                Confirmation::Quit,
                Box::new(move |confirmed| {
                    if confirmed {
                        if let Some(controller) = weak.upgrade() {
                            controller.quit_now();
                        }
                    } else {
                        tracing::debug!("Quit cancelled");
                    }
                }),
            );
            return;
        }
        self.quit_now();
    }

    /// Disconnects (best effort) and stops the main loop
    pub fn quit_now(&self) {
        self.phase.set(AppPhase::Quitting);
        if let Err(e) = ensure_disconnected(self.backend.as_ref()) {
            tracing::error!(%e, "Failed to disconnect before quitting");
        }
        self.shell.quit();
    }

    /// Logout action
    ///
    /// Only one logout runs at a time; further requests show a notice.
    pub fn request_logout(self: &Rc<Self>) {
        if self.is_logging_out.get() {
            tracing::info!("Logout already in progress");
            // The notice stays up until the user dismisses it
            let _notice = self
                .shell
                .show_message(LOGOUT_TITLE, &UiText::new(LOGOUT_PENDING_BODY));
            return;
        }

        self.is_logging_out.set(true);
        let notice = Rc::new(
            self.shell
                .show_message(LOGOUT_TITLE, &UiText::new(LOGGING_OUT_BODY)),
        );

        let mut process = self.tasks.factory::<VpnResult<()>>(TaskKind::Native);
        let backend = Arc::clone(&self.backend);
        let weak = Rc::downgrade(self);
        let progress = Rc::clone(&notice);
        process.setup(
            move || {
                tracing::info!("Logging out");
                let result = backend.logout();
                if let Err(e) = &result {
                    tracing::error!(error = %e, "Logout failed");
                }
                result
            },
            Some(move |outcome| {
                if let Some(controller) = weak.upgrade() {
                    controller.finish_logout(outcome, progress.as_ref());
                }
            }),
        );

        if self.connection_active() {
            notice.close();
            let weak = Rc::downgrade(self);
            let progress = Rc::clone(&notice);
            self.shell.confirm(
                Confirmation::Logout,
                Box::new(move |confirmed| {
                    let Some(controller) = weak.upgrade() else {
                        return;
                    };
                    if confirmed {
                        controller.begin_logout(process, progress.as_ref());
                    } else {
                        tracing::info!("Logout cancelled");
                        controller.is_logging_out.set(false);
                    }
                }),
            );
            return;
        }

        self.begin_logout(process, notice.as_ref());
    }

    fn begin_logout(&self, process: BackgroundProcess<VpnResult<()>>, progress: &S::Notice) {
        let windows = self.shell.windows();
        tracing::info!(windows = windows.len(), "Stopping background work");
        for window in &windows {
            if let Some(aware) = window.shutdown_aware() {
                aware.prepare_for_app_shutdown();
            }
        }
        *self.logout_windows.borrow_mut() = windows;
        let previous = self.phase.replace(AppPhase::LoggingOut);

        if let Err(e) = process.start() {
            tracing::error!(%e, "Unable to start logout");
            progress.close();
            self.logout_windows.borrow_mut().clear();
            self.phase.set(previous);
            self.is_logging_out.set(false);
            let _notice = self.shell.show_message(
                LOGOUT_FAILED_TITLE,
                &UiText::new(LOGOUT_FAILED_BODY).with_arg(e),
            );
        }
    }

    fn finish_logout(self: &Rc<Self>, outcome: TaskOutcome<VpnResult<()>>, progress: &S::Notice) {
        progress.close();
        self.is_logging_out.set(false);

        // Login opens before the old windows go away so the application
        // never runs out of windows
        self.show_login();

        let windows = std::mem::take(&mut *self.logout_windows.borrow_mut());
        for window in windows {
            tracing::info!(window = %window.title(), "Closing window");
            match window.graceful_close() {
                Some(closable) => closable.close_for_logout(),
                None => window.destroy(),
            }
        }

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(e) => Some(e.to_string()),
        };
        if let Some(reason) = failure {
            let _notice = self.shell.show_message(
                LOGOUT_FAILED_TITLE,
                &UiText::new(LOGOUT_FAILED_BODY).with_arg(reason),
            );
        }
    }

    /// Get-logs action
    ///
    /// The progress dialog closes on success and is rewritten with the error
    /// on failure.
    pub fn get_logs(&self) {
        let notice = Rc::new(
            self.shell
                .show_message(GENERATING_LOGS_TITLE, &UiText::new(GENERATING_LOGS_BODY)),
        );
        let report = self.backend.bug_report();
        let logs_dir = report.logs_dir();

        let progress = Rc::clone(&notice);
        let started = self.tasks.spawn(
            TaskKind::Worker,
            move || collect_logs(report.as_ref()),
            move |outcome| apply_logs_outcome(progress.as_ref(), outcome, &logs_dir),
        );
        if let Err(e) = started {
            tracing::error!(%e, "Unable to start log generation");
            notice.update_content(
                LOGS_FAILED_TITLE,
                &UiText::new(LOGS_FAILED_BODY).with_arg(e),
            );
        }
    }

    fn connection_active(&self) -> bool {
        match self.backend.active_connection() {
            Ok(active) => active.is_some(),
            Err(e) => {
                tracing::warn!(%e, "Unable to query active connection");
                false
            }
        }
    }
}

impl<S: Shell> std::fmt::Debug for AppController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppController")
            .field("phase", &self.phase.get())
            .field("is_logging_out", &self.is_logging_out.get())
            .field("has_indicator", &self.indicator.borrow().is_some())
            .finish_non_exhaustive()
    }
}

/// Generates the log bundle and opens its folder
fn collect_logs(report: &dyn BugReport) -> Result<(), LogsFailure> {
    report.generate_logs().map_err(|e| {
        tracing::error!(error = %e, "Unable to generate logs");
        LogsFailure::Generate(e)
    })?;
    report.open_folder_with_logs().map_err(|e| {
        tracing::error!(error = %e, "Unable to open logs folder");
        LogsFailure::OpenFolder(e)
    })
}

fn apply_logs_outcome(
    notice: &impl Notice,
    outcome: TaskOutcome<Result<(), LogsFailure>>,
    logs_dir: &Path,
) {
    match outcome {
        Ok(Ok(())) => notice.close(),
        Ok(Err(LogsFailure::Generate(e))) => notice.update_content(
            LOGS_FAILED_TITLE,
            &UiText::new(LOGS_FAILED_BODY).with_arg(e),
        ),
        Ok(Err(LogsFailure::OpenFolder(_))) => notice.update_content(
            LOGS_FAILED_TITLE,
            &UiText::new(LOGS_FOLDER_FAILED_BODY).with_arg(logs_dir.display()),
        ),
        Err(e) => notice.update_content(
            LOGS_FAILED_TITLE,
            &UiText::new(LOGS_FAILED_BODY).with_arg(e),
        ),
    }
}
