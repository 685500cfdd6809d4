//! In-memory fakes shared by the integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use protonvpn_gui_core::app::{
    AppController, AppWindow, Confirmation, GracefulClose, Notice, Shell, ShutdownAware, UiText,
};
use protonvpn_gui_core::backend::{BugReport, VpnBackend};
use protonvpn_gui_core::error::{BugReportError, BugReportResult, VpnError, VpnResult};
use protonvpn_gui_core::models::{ActivationState, ActiveConnection, Server, VpnKind};
use protonvpn_gui_core::task::{Completion, Executor, Job, TaskError, TaskFactory};
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

// ========== Backend ==========

/// Mutable state behind [`FakeBackend`]
#[derive(Debug, Default)]
pub struct BackendState {
    pub session: bool,
    pub active: Option<ActiveConnection>,
    pub servers: Vec<Server>,
    pub fail_logout: bool,
    pub fail_generate: bool,
    pub fail_open_folder: bool,
    pub calls: Vec<&'static str>,
}

/// Backend keeping everything in memory
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub state: Mutex<BackendState>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_session() -> Arc<Self> {
        let backend = Self::new();
        backend.state.lock().unwrap().session = true;
        backend
    }

    pub fn set(&self, update: impl FnOnce(&mut BackendState)) {
        update(&mut self.state.lock().unwrap());
    }

    pub fn connect_to(&self, name: &str) {
        self.state.lock().unwrap().active = Some(active_connection(name));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    fn record(&self, call: &'static str) -> std::sync::MutexGuard<'_, BackendState> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state
    }
}

impl VpnBackend for FakeBackend {
    fn session_exists(&self) -> bool {
        self.record("session_exists").session
    }

    fn login(&self, username: &str, password: &SecretString) -> VpnResult<()> {
        let mut state = self.record("login");
        if username.is_empty() || password.expose_secret() != "secret" {
            return Err(VpnError::InvalidCredentials("rejected".to_string()));
        }
        state.session = true;
        Ok(())
    }

    fn logout(&self) -> VpnResult<()> {
        let mut state = self.record("logout");
        if state.fail_logout {
            return Err(VpnError::CommandFailed {
                command: "logout".to_string(),
                stderr: "session locked".to_string(),
            });
        }
        state.session = false;
        state.active = None;
        Ok(())
    }

    fn active_connection(&self) -> VpnResult<Option<ActiveConnection>> {
        Ok(self.record("active_connection").active.clone())
    }

    fn servers(&self) -> VpnResult<Vec<Server>> {
        Ok(self.record("servers").servers.clone())
    }

    fn connect(&self, server: Uuid) -> VpnResult<ActiveConnection> {
        let mut state = self.record("connect");
        let found = state
            .servers
            .iter()
            .find(|s| s.id == server)
            .cloned()
            .ok_or_else(|| VpnError::ServerNotFound(server.to_string()))?;
        let active = ActiveConnection {
            id: found.id,
            name: found.name,
            device: Some("proton0".to_string()),
            state: ActivationState::Activated,
        };
        state.active = Some(active.clone());
        Ok(active)
    }

    fn disconnect(&self) -> VpnResult<()> {
        let mut state = self.record("disconnect");
        match state.active.take() {
            Some(_) => Ok(()),
            None => Err(VpnError::ConnectionNotFound),
        }
    }

    fn bug_report(&self) -> Box<dyn BugReport> {
        let state = self.state.lock().unwrap();
        Box::new(FakeBugReport {
            fail_generate: state.fail_generate,
            fail_open_folder: state.fail_open_folder,
        })
    }
}

pub const FAKE_LOGS_DIR: &str = "/tmp/protonvpn-fake-logs";

struct FakeBugReport {
    fail_generate: bool,
    fail_open_folder: bool,
}

impl BugReport for FakeBugReport {
    fn generate_logs(&self) -> BugReportResult<PathBuf> {
        if self.fail_generate {
            return Err(BugReportError::Write {
                path: self.logs_dir(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        Ok(self.logs_dir())
    }

    fn open_folder_with_logs(&self) -> BugReportResult<()> {
        if self.fail_open_folder {
            return Err(BugReportError::OpenFolder {
                path: self.logs_dir(),
                reason: "no file manager".to_string(),
            });
        }
        Ok(())
    }

    fn logs_dir(&self) -> PathBuf {
        PathBuf::from(FAKE_LOGS_DIR)
    }
}

pub fn active_connection(name: &str) -> ActiveConnection {
    ActiveConnection {
        id: Uuid::new_v4(),
        name: name.to_string(),
        device: Some("proton0".to_string()),
        state: ActivationState::Activated,
    }
}

pub fn server(name: &str) -> Server {
    Server::new(Uuid::new_v4(), name, VpnKind::WireGuard)
}

// ========== Executor ==========

/// Queues jobs until the test runs them
#[derive(Default)]
pub struct ManualExecutor {
    queue: RefCell<VecDeque<(Job, Completion)>>,
    /// Report every job as unable to spawn instead of queueing it
    pub refuse: Cell<bool>,
}

impl ManualExecutor {
    pub fn queued(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Runs the oldest job and its completion; returns false when idle
    pub fn run_next(&self) -> bool {
        let next = self.queue.borrow_mut().pop_front();
        match next {
            Some((job, done)) => {
                job();
                done(Ok(()));
                true
            }
            None => false,
        }
    }

    pub fn run_all(&self) {
        while self.run_next() {}
    }
}

impl Executor for ManualExecutor {
    fn execute(&self, job: Job, done: Completion) {
        if self.refuse.get() {
            drop(job);
            done(Err(TaskError::Spawn("thread limit reached".to_string())));
            return;
        }
        self.queue.borrow_mut().push_back((job, done));
    }
}

// ========== Shell ==========

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    IndicatorCreated,
    PresentedExisting,
    Login,
    Dashboard,
    Message(String, String),
    Confirm(Confirmation),
    About,
    Quit,
}

#[derive(Debug, Default)]
pub struct NoticeState {
    pub title: RefCell<String>,
    pub description: RefCell<String>,
    /// Untranslated template behind `description`
    pub template: Cell<&'static str>,
    pub closed: Cell<bool>,
}

pub struct FakeNotice(Rc<NoticeState>);

impl Notice for FakeNotice {
    fn update_content(&self, title: &str, description: &UiText) {
        *self.0.title.borrow_mut() = title.to_string();
        *self.0.description.borrow_mut() = description.render();
        self.0.template.set(description.template());
    }

    fn close(&self) {
        self.0.closed.set(true);
    }
}

#[derive(Default)]
pub struct ShellState {
    pub has_window: Cell<bool>,
    pub indicator_available: Cell<bool>,
    pub events: RefCell<Vec<ShellEvent>>,
    pub notices: RefCell<Vec<Rc<NoticeState>>>,
    /// Answer given to confirmations; `None` leaves them pending
    pub answer: Cell<Option<bool>>,
    pub pending_confirm: RefCell<Option<Box<dyn FnOnce(bool)>>>,
    pub windows: RefCell<Vec<Rc<dyn AppWindow>>>,
    pub on_authenticated: RefCell<Option<Rc<dyn Fn()>>>,
}

/// Shell recording every request
#[derive(Clone)]
pub struct FakeShell {
    pub state: Rc<ShellState>,
}

impl FakeShell {
    pub fn new() -> Self {
        let state = ShellState::default();
        state.indicator_available.set(true);
        Self {
            state: Rc::new(state),
        }
    }

    pub fn events(&self) -> Vec<ShellEvent> {
        self.state.events.borrow().clone()
    }

    pub fn count(&self, matches: impl Fn(&ShellEvent) -> bool) -> usize {
        self.state.events.borrow().iter().filter(|e| matches(e)).count()
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.state
            .events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ShellEvent::Message(t, d) => Some((t.clone(), d.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn notice(&self, index: usize) -> Rc<NoticeState> {
        Rc::clone(&self.state.notices.borrow()[index])
    }

    pub fn answer_pending(&self, confirmed: bool) {
        let respond = self.state.pending_confirm.borrow_mut().take();
        respond.expect("no pending confirmation")(confirmed);
    }

    pub fn add_window(&self, window: Rc<dyn AppWindow>) {
        self.state.windows.borrow_mut().push(window);
        self.state.has_window.set(true);
    }

    fn push(&self, event: ShellEvent) {
        self.state.events.borrow_mut().push(event);
    }
}

impl Shell for FakeShell {
    type Notice = FakeNotice;
    type Indicator = ();

    fn has_active_window(&self) -> bool {
        self.state.has_window.get()
    }

    fn present_active_window(&self) {
        self.push(ShellEvent::PresentedExisting);
    }

    fn show_login(&self, on_authenticated: Rc<dyn Fn()>) {
        *self.state.on_authenticated.borrow_mut() = Some(on_authenticated);
        self.state.has_window.set(true);
        self.push(ShellEvent::Login);
    }

    fn show_dashboard(&self) {
        self.state.has_window.set(true);
        self.push(ShellEvent::Dashboard);
    }

    fn show_message(&self, title: &str, description: &UiText) -> FakeNotice {
        self.push(ShellEvent::Message(title.to_string(), description.render()));
        let notice = Rc::new(NoticeState {
            title: RefCell::new(title.to_string()),
            description: RefCell::new(description.render()),
            template: Cell::new(description.template()),
            closed: Cell::new(false),
        });
        self.state.notices.borrow_mut().push(Rc::clone(&notice));
        FakeNotice(notice)
    }

    fn confirm(&self, confirmation: Confirmation, respond: Box<dyn FnOnce(bool)>) {
        self.push(ShellEvent::Confirm(confirmation));
        match self.state.answer.get() {
            Some(answer) => respond(answer),
            None => *self.state.pending_confirm.borrow_mut() = Some(respond),
        }
    }

    fn show_about(&self) {
        self.push(ShellEvent::About);
    }

    fn windows(&self) -> Vec<Rc<dyn AppWindow>> {
        self.state.windows.borrow().clone()
    }

    fn create_indicator(&self) -> Option<()> {
        if self.state.indicator_available.get() {
            self.push(ShellEvent::IndicatorCreated);
            Some(())
        } else {
            None
        }
    }

    fn quit(&self) {
        self.push(ShellEvent::Quit);
    }
}

// ========== Windows ==========

/// Window with configurable capabilities, logging what happens to it
pub struct FakeWindow {
    pub name: &'static str,
    pub shutdown_aware: bool,
    pub graceful: bool,
    pub log: Rc<RefCell<Vec<String>>>,
}

impl FakeWindow {
    pub fn new(
        name: &'static str,
        shutdown_aware: bool,
        graceful: bool,
        log: &Rc<RefCell<Vec<String>>>,
    ) -> Rc<Self> {
        Rc::new(Self {
            name,
            shutdown_aware,
            graceful,
            log: Rc::clone(log),
        })
    }
}

impl ShutdownAware for FakeWindow {
    fn prepare_for_app_shutdown(&self) {
        self.log.borrow_mut().push(format!("{}:prepare", self.name));
    }
}

impl GracefulClose for FakeWindow {
    fn close_for_logout(&self) {
        self.log.borrow_mut().push(format!("{}:close", self.name));
    }
}

impl AppWindow for FakeWindow {
    fn title(&self) -> String {
        self.name.to_string()
    }

    fn shutdown_aware(&self) -> Option<&dyn ShutdownAware> {
        self.shutdown_aware.then_some(self as &dyn ShutdownAware)
    }

    fn graceful_close(&self) -> Option<&dyn GracefulClose> {
        self.graceful.then_some(self as &dyn GracefulClose)
    }

    fn destroy(&self) {
        self.log.borrow_mut().push(format!("{}:destroy", self.name));
    }
}

// ========== Harness ==========

pub struct Harness {
    pub controller: Rc<AppController<FakeShell>>,
    pub shell: FakeShell,
    pub backend: Arc<FakeBackend>,
    pub worker: Rc<ManualExecutor>,
    pub native: Rc<ManualExecutor>,
}

impl Harness {
    pub fn new(backend: Arc<FakeBackend>) -> Self {
        let shell = FakeShell::new();
        let worker = Rc::new(ManualExecutor::default());
        let native = Rc::new(ManualExecutor::default());
        let tasks = TaskFactory::new(worker.clone(), native.clone());
        let controller = Rc::new(AppController::new(
            shell.clone(),
            backend.clone() as Arc<dyn VpnBackend>,
            tasks,
        ));
        Self {
            controller,
            shell,
            backend,
            worker,
            native,
        }
    }
}
