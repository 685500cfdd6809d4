//! GLib-backed task executors
//!
//! [`TaskKind::Worker`](protonvpn_gui_core::TaskKind::Worker) jobs run on a
//! [`ThreadWorker`] whose completions are pumped from a main loop timeout;
//! [`TaskKind::Native`](protonvpn_gui_core::TaskKind::Native) jobs go through
//! `gio::spawn_blocking` and are awaited on the default main context.

use std::rc::Rc;
use std::time::Duration;

use gtk4::{gio, glib};
use protonvpn_gui_core::task::{Completion, Executor, Job, TaskError, ThreadWorker, panic_message};
use protonvpn_gui_core::TaskFactory;

/// How often finished worker jobs are delivered to their callbacks
const COMPLETION_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Creates a thread worker whose completions are delivered by the main loop
///
/// The timeout source stops once the worker is dropped.
pub fn thread_worker() -> Rc<ThreadWorker> {
    let worker = Rc::new(ThreadWorker::new());
    let weak = Rc::downgrade(&worker);
    glib::timeout_add_local(COMPLETION_POLL_INTERVAL, move || {
        let Some(worker) = weak.upgrade() else {
            return glib::ControlFlow::Break;
        };
        if worker.has_pending() {
            worker.dispatch_completions();
        }
        glib::ControlFlow::Continue
    });
    worker
}

/// Executor built on GIO's blocking thread pool
#[derive(Debug, Default, Clone, Copy)]
pub struct GioExecutor;

impl Executor for GioExecutor {
    fn execute(&self, job: Job, done: Completion) {
        let handle = gio::spawn_blocking(job);
        glib::MainContext::default().spawn_local(async move {
            let result = handle
                .await
                .map_err(|payload| TaskError::Panicked(panic_message(payload.as_ref())));
            done(result);
        });
    }
}

/// Task factory wired to the GTK main loop
pub fn main_loop_factory() -> TaskFactory {
    TaskFactory::new(thread_worker(), Rc::new(GioExecutor))
}
