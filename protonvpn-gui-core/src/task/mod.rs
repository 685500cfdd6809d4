//! Background task dispatch
//!
//! Long-running backend calls must not block the GTK main loop. A
//! [`BackgroundProcess`] binds a `Send` target closure and an optional
//! completion callback; on [`BackgroundProcess::start`] the target runs on an
//! [`Executor`] off the UI thread and the callback is invoked afterwards on the
//! UI thread.
//!
//! Two executor variants exist, selected with [`TaskKind`]:
//!
//! | Kind | Runner | Key |
//! |------|--------|-----|
//! | [`TaskKind::Worker`] | one named thread per job ([`ThreadWorker`]) | `"worker"`, `"thread"` |
//! | [`TaskKind::Native`] | the toolkit's own async task primitive | `"gtask"`, `"native"` |
//!
//! # Callback contract
//!
//! The callback always receives a [`TaskOutcome`]: `Ok(value)` with the
//! target's return value, or a [`TaskError`] when the target panicked or could
//! not be started. Domain failures are returned by the target itself
//! (typically as its own `Result`), so each call site logs its backend errors
//! inside the target.

mod worker;

pub use worker::ThreadWorker;

use std::any::Any;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// Errors produced by the task dispatcher itself
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    /// `start` was called before `setup`
    #[error("Background task started without a target")]
    NotConfigured,

    /// The target panicked
    #[error("Background task panicked: {0}")]
    Panicked(String),

    /// No thread could be spawned for the target
    #[error("Failed to spawn background task: {0}")]
    Spawn(String),

    /// The target finished but its value was lost
    #[error("Background task finished without a result")]
    MissingResult,

    /// Unknown task kind key
    #[error("Unknown background task kind: {0}")]
    UnknownKind(String),
}

/// Value handed to a completion callback
pub type TaskOutcome<T> = Result<T, TaskError>;

/// Type-erased work item run off the UI thread
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Type-erased completion run on the UI thread
pub type Completion = Box<dyn FnOnce(Result<(), TaskError>) + 'static>;

/// Runs jobs off the UI thread and reports back on it
///
/// Implementations must invoke `done` on the thread that owns the UI event
/// loop, exactly once per job.
pub trait Executor {
    /// Runs `job` in the background and schedules `done` on the UI thread
    fn execute(&self, job: Job, done: Completion);
}

/// Selects a task runner variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskKind {
    /// Generic one-shot worker thread
    #[default]
    Worker,
    /// The GUI toolkit's native async task
    Native,
}

impl TaskKind {
    /// Returns the canonical key for this kind
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Worker => "worker",
            Self::Native => "gtask",
        }
    }
}

impl FromStr for TaskKind {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "worker" | "thread" => Ok(Self::Worker),
            "gtask" | "native" => Ok(Self::Native),
            other => Err(TaskError::UnknownKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

type Target<T> = Box<dyn FnOnce() -> T + Send + 'static>;
type Callback<T> = Box<dyn FnOnce(TaskOutcome<T>) + 'static>;

/// A unit of background work and its completion handler
pub struct BackgroundProcess<T> {
    kind: TaskKind,
    executor: Rc<dyn Executor>,
    target: Option<Target<T>>,
    callback: Option<Callback<T>>,
}

impl<T: Send + 'static> BackgroundProcess<T> {
    /// Creates an unconfigured task bound to an executor
    #[must_use]
    pub fn new(kind: TaskKind, executor: Rc<dyn Executor>) -> Self {
        Self {
            kind,
            executor,
            target: None,
            callback: None,
        }
    }

    /// Returns the runner variant of this task
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Returns true once a target is bound
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.target.is_some()
    }

    /// Binds the work function and optional completion handler
    ///
    /// Calling `setup` again replaces both.
    pub fn setup<F, C>(&mut self, target: F, callback: Option<C>)
    where
        F: FnOnce() -> T + Send + 'static,
        C: FnOnce(TaskOutcome<T>) + 'static,
    {
        self.target = Some(Box::new(target));
        self.callback = callback.map(|c| Box::new(c) as Callback<T>);
    }

    /// Starts the task
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::NotConfigured`] when no target was bound; nothing
    /// is scheduled in that case.
    pub fn start(self) -> Result<(), TaskError> {
        let Some(target) = self.target else {
            return Err(TaskError::NotConfigured);
        };

        let slot: Arc<Mutex<Option<T>>> = Arc::new(Mutex::new(None));
        let job_slot = Arc::clone(&slot);
        let job: Job = Box::new(move || {
            let value = target();
            *job_slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
        });

        let callback = self.callback;
        let kind = self.kind;
        let done: Completion = Box::new(move |result| {
            let outcome = result.and_then(|()| {
                slot.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take()
                    .ok_or(TaskError::MissingResult)
            });
            if let Err(e) = &outcome {
                tracing::error!(kind = %kind, error = %e, "Background task failed");
            }
            if let Some(callback) = callback {
                callback(outcome);
            }
        });

        tracing::debug!(kind = %self.kind, "Starting background task");
        self.executor.execute(job, done);
        Ok(())
    }
}

/// Produces background tasks of either variant
#[derive(Clone)]
pub struct TaskFactory {
    worker: Rc<dyn Executor>,
    native: Rc<dyn Executor>,
}

impl TaskFactory {
    /// Creates a factory from the two executor variants
    #[must_use]
    pub fn new(worker: Rc<dyn Executor>, native: Rc<dyn Executor>) -> Self {
        Self { worker, native }
    }

    /// Creates a factory that uses one executor for both variants
    #[must_use]
    pub fn single(executor: Rc<dyn Executor>) -> Self {
        Self {
            worker: Rc::clone(&executor),
            native: executor,
        }
    }

    /// Returns a task of the requested variant
    #[must_use]
    pub fn factory<T: Send + 'static>(&self, kind: TaskKind) -> BackgroundProcess<T> {
        let executor = match kind {
            TaskKind::Worker => Rc::clone(&self.worker),
            TaskKind::Native => Rc::clone(&self.native),
        };
        BackgroundProcess::new(kind, executor)
    }

    /// Returns a task for a string key such as `"gtask"`
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::UnknownKind`] for unrecognised keys.
    pub fn factory_for_key<T: Send + 'static>(
        &self,
        key: &str,
    ) -> Result<BackgroundProcess<T>, TaskError> {
        Ok(self.factory(key.parse()?))
    }

    /// Shorthand: set up and start a task in one call
    ///
    /// # Errors
    ///
    /// Never fails in practice because the target is always bound; the
    /// signature mirrors [`BackgroundProcess::start`].
    pub fn spawn<T, F, C>(&self, kind: TaskKind, target: F, callback: C) -> Result<(), TaskError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
        C: FnOnce(TaskOutcome<T>) + 'static,
    {
        let mut process = self.factory(kind);
        process.setup(target, Some(callback));
        process.start()
    }
}

/// Extracts a readable message from a panic payload
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
