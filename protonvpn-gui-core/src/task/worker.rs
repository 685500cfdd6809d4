//! Generic one-shot worker thread executor
//!
//! Each job runs on its own named thread. Completions travel back over an
//! `mpsc` channel and are only delivered when the owner of the UI loop calls
//! [`ThreadWorker::dispatch_completions`], so callbacks always run on the
//! thread that owns the worker.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use super::{Completion, Executor, Job, TaskError, panic_message};

/// Prefix of the names given to worker threads
pub const WORKER_THREAD_NAME: &str = "pvpn-worker";

struct Finished {
    id: u64,
    result: Result<(), TaskError>,
}

/// Thread-per-job executor with UI-thread completion delivery
pub struct ThreadWorker {
    sender: Sender<Finished>,
    receiver: Receiver<Finished>,
    pending: RefCell<HashMap<u64, Completion>>,
    next_id: Cell<u64>,
}

impl Default for ThreadWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadWorker {
    /// Creates a worker with no pending jobs
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            pending: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    /// Returns true while some job has not had its completion delivered
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    /// Number of jobs whose completion is still outstanding
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Delivers every finished job's completion on the calling thread
    ///
    /// Returns the number of completions invoked. Completions may start new
    /// jobs on this worker.
    pub fn dispatch_completions(&self) -> usize {
        let mut delivered = 0;
        loop {
            let finished = match self.receiver.try_recv() {
                Ok(finished) => finished,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            let done = self.pending.borrow_mut().remove(&finished.id);
            if let Some(done) = done {
                done(finished.result);
                delivered += 1;
            } else {
                tracing::warn!(task_id = finished.id, "Completion for unknown background task");
            }
        }
        delivered
    }
}

impl Executor for ThreadWorker {
    fn execute(&self, job: Job, done: Completion) {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        self.pending.borrow_mut().insert(id, done);

        let sender = self.sender.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("{WORKER_THREAD_NAME}-{id}"))
            .spawn(move || {
                let result = catch_unwind(AssertUnwindSafe(job))
                    .map_err(|payload| TaskError::Panicked(panic_message(payload.as_ref())));
                // The receiver lives as long as the worker; a send error means
                // the application is shutting down.
                let _ = sender.send(Finished { id, result });
            });

        if let Err(e) = spawned {
            tracing::error!(task_id = id, error = %e, "Failed to spawn worker thread");
            let done = self.pending.borrow_mut().remove(&id);
            if let Some(done) = done {
                done(Err(TaskError::Spawn(e.to_string())));
            }
        }
    }
}
