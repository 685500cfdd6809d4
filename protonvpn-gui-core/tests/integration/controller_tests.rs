//! Integration tests for the application controller
//!
//! Covers startup, activation, quit, logout and log generation against the
//! fake shell and backend.

use std::cell::RefCell;
use std::rc::Rc;

use protonvpn_gui_core::AppAction;
use protonvpn_gui_core::app::{
    AppPhase, Confirmation, GENERATING_LOGS_BODY, GENERATING_LOGS_TITLE, LOGGING_OUT_BODY,
    LOGOUT_FAILED_BODY, LOGOUT_FAILED_TITLE, LOGOUT_PENDING_BODY, LOGOUT_TITLE, LOGS_FAILED_BODY,
    LOGS_FAILED_TITLE, LOGS_FOLDER_FAILED_BODY, StartupOutcome,
};
use protonvpn_gui_core::privilege::{ELEVATED_PROMPT, Privilege};

use super::support::{FAKE_LOGS_DIR, FakeBackend, FakeWindow, Harness, ShellEvent};

// ========== Startup ==========

#[test]
fn elevated_launch_declined_quits_before_any_window() {
    let h = Harness::new(FakeBackend::with_session());
    let mut output = Vec::new();

    let outcome = h
        .controller
        .startup(Privilege::Elevated, "n\n".as_bytes(), &mut output);

    assert_eq!(outcome, StartupOutcome::Abort);
    assert_eq!(h.shell.events(), vec![ShellEvent::Quit]);
    assert_eq!(h.controller.phase(), AppPhase::Quitting);
    assert!(String::from_utf8(output).unwrap().contains(ELEVATED_PROMPT));
    // No backend work before the process exits
    assert!(h.backend.calls().is_empty());
}

#[test]
fn elevated_launch_defaults_to_no_on_empty_answer() {
    let h = Harness::new(FakeBackend::new());
    let outcome = h
        .controller
        .startup(Privilege::Elevated, "\n".as_bytes(), Vec::new());
    assert_eq!(outcome, StartupOutcome::Abort);
}

#[test]
fn elevated_launch_confirmed_continues() {
    let h = Harness::new(FakeBackend::new());
    let outcome = h
        .controller
        .startup(Privilege::Elevated, "y\n".as_bytes(), Vec::new());

    assert_eq!(outcome, StartupOutcome::Ready);
    assert!(h.shell.events().is_empty());
}

#[test]
fn user_launch_does_not_prompt() {
    let h = Harness::new(FakeBackend::new());
    let mut output = Vec::new();
    let outcome = h
        .controller
        .startup(Privilege::User, "".as_bytes(), &mut output);

    assert_eq!(outcome, StartupOutcome::Ready);
    assert!(output.is_empty());
}

// ========== Activate ==========

#[test]
fn activate_with_session_presents_dashboard() {
    let h = Harness::new(FakeBackend::with_session());
    h.controller.activate();

    assert_eq!(
        h.shell.events(),
        vec![ShellEvent::IndicatorCreated, ShellEvent::Dashboard]
    );
    assert_eq!(h.controller.phase(), AppPhase::Dashboard);
}

#[test]
fn activate_without_session_presents_login() {
    let h = Harness::new(FakeBackend::new());
    h.controller.activate();

    assert_eq!(
        h.shell.events(),
        vec![ShellEvent::IndicatorCreated, ShellEvent::Login]
    );
    assert_eq!(h.controller.phase(), AppPhase::Login);
}

#[test]
fn activate_with_existing_window_only_presents_it() {
    let h = Harness::new(FakeBackend::new());
    h.controller.activate();
    h.controller.activate();

    assert_eq!(h.shell.count(|e| *e == ShellEvent::Login), 1);
    assert_eq!(h.shell.count(|e| *e == ShellEvent::PresentedExisting), 1);
    assert_eq!(h.backend.count("session_exists"), 1);
}

#[test]
fn indicator_is_created_once() {
    let h = Harness::new(FakeBackend::new());
    h.controller.activate();
    h.controller.activate();

    assert!(h.controller.has_indicator());
    assert_eq!(h.shell.count(|e| *e == ShellEvent::IndicatorCreated), 1);
}

#[test]
fn unavailable_indicator_is_retried_on_next_activation() {
    let h = Harness::new(FakeBackend::new());
    h.shell.state.indicator_available.set(false);
    h.controller.activate();
    assert!(!h.controller.has_indicator());

    h.shell.state.indicator_available.set(true);
    h.controller.activate();
    assert!(h.controller.has_indicator());
}

#[test]
fn successful_login_switches_to_dashboard() {
    let h = Harness::new(FakeBackend::new());
    h.controller.activate();

    let on_authenticated = h.shell.state.on_authenticated.borrow().clone().unwrap();
    on_authenticated();

    assert_eq!(h.shell.events().last(), Some(&ShellEvent::Dashboard));
    assert_eq!(h.controller.phase(), AppPhase::Dashboard);
}

// ========== Quit ==========

#[test]
fn quit_without_connection_quits_immediately() {
    let h = Harness::new(FakeBackend::with_session());
    h.controller.activate_action(AppAction::Quit);

    assert_eq!(h.shell.events(), vec![ShellEvent::Quit]);
    // The disconnect attempt hit "connection not found" and was absorbed
    assert_eq!(h.backend.count("disconnect"), 1);
    assert!(h.shell.messages().is_empty());
    assert_eq!(h.controller.phase(), AppPhase::Quitting);
}

#[test]
fn quit_with_connection_asks_first() {
    let h = Harness::new(FakeBackend::with_session());
    h.backend.connect_to("ProtonVPN CH#1");

    h.controller.request_quit();
    assert_eq!(
        h.shell.events(),
        vec![ShellEvent::Confirm(Confirmation::Quit)]
    );
    assert_eq!(h.backend.count("disconnect"), 0);

    h.shell.answer_pending(true);
    assert_eq!(h.shell.events().last(), Some(&ShellEvent::Quit));
    assert_eq!(h.backend.count("disconnect"), 1);
    assert!(h.backend.state.lock().unwrap().active.is_none());
}

#[test]
fn declined_quit_keeps_running() {
    let h = Harness::new(FakeBackend::with_session());
    h.backend.connect_to("ProtonVPN CH#1");
    h.shell.state.answer.set(Some(false));

    h.controller.request_quit();

    assert_eq!(h.shell.count(|e| *e == ShellEvent::Quit), 0);
    assert!(h.backend.state.lock().unwrap().active.is_some());
}

// ========== Logout ==========

#[test]
fn second_logout_shows_wait_notice_without_second_task() {
    let h = Harness::new(FakeBackend::with_session());

    h.controller.request_logout();
    assert!(h.controller.is_logging_out());
    assert_eq!(h.native.queued(), 1);

    h.controller.request_logout();
    assert_eq!(h.native.queued(), 1);
    assert_eq!(h.worker.queued(), 0);
    assert_eq!(
        h.shell.messages(),
        vec![
            (LOGOUT_TITLE.to_string(), LOGGING_OUT_BODY.to_string()),
            (LOGOUT_TITLE.to_string(), LOGOUT_PENDING_BODY.to_string()),
        ]
    );

    h.native.run_all();
    assert_eq!(h.backend.count("logout"), 1);
}

#[test]
fn logout_prepares_and_closes_windows_then_shows_login() {
    let h = Harness::new(FakeBackend::with_session());
    let log = Rc::new(RefCell::new(Vec::new()));
    h.shell.add_window(FakeWindow::new("dashboard", true, true, &log));
    h.shell.add_window(FakeWindow::new("plain", false, false, &log));

    h.controller.request_logout();
    // Shutdown preparation happens before the backend call
    assert_eq!(*log.borrow(), vec!["dashboard:prepare".to_string()]);
    assert_eq!(h.backend.count("logout"), 0);
    assert_eq!(h.controller.phase(), AppPhase::LoggingOut);

    h.native.run_all();

    assert_eq!(
        *log.borrow(),
        vec![
            "dashboard:prepare".to_string(),
            "dashboard:close".to_string(),
            "plain:destroy".to_string(),
        ]
    );
    assert!(!h.controller.is_logging_out());
    assert!(h.shell.notice(0).closed.get());
    assert_eq!(h.shell.events().last(), Some(&ShellEvent::Login));
    assert_eq!(h.controller.phase(), AppPhase::Login);
    assert!(!h.backend.state.lock().unwrap().session);
}

#[test]
fn logout_with_connection_closes_progress_and_asks() {
    let h = Harness::new(FakeBackend::with_session());
    h.backend.connect_to("ProtonVPN SE#4");

    h.controller.request_logout();

    assert!(h.shell.notice(0).closed.get());
    assert!(h.shell.events().contains(&ShellEvent::Confirm(Confirmation::Logout)));
    assert_eq!(h.native.queued(), 0);

    h.shell.answer_pending(true);
    assert_eq!(h.native.queued(), 1);
    h.native.run_all();
    assert!(h.backend.state.lock().unwrap().active.is_none());
    assert!(!h.controller.is_logging_out());
}

#[test]
fn declined_logout_releases_guard() {
    let h = Harness::new(FakeBackend::with_session());
    h.backend.connect_to("ProtonVPN SE#4");
    h.shell.state.answer.set(Some(false));

    h.controller.request_logout();

    assert!(!h.controller.is_logging_out());
    assert_eq!(h.native.queued(), 0);
    assert_eq!(h.backend.count("logout"), 0);

    // A new request starts a fresh logout
    h.shell.state.answer.set(Some(true));
    h.controller.request_logout();
    assert_eq!(h.native.queued(), 1);
}

#[test]
fn failed_logout_is_reported_and_returns_to_login() {
    let h = Harness::new(FakeBackend::with_session());
    h.backend.set(|s| s.fail_logout = true);

    h.controller.request_logout();
    h.native.run_all();

    assert!(!h.controller.is_logging_out());
    assert!(h.shell.events().contains(&ShellEvent::Login));
    let (title, body) = h.shell.messages().last().cloned().unwrap();
    assert_eq!(title, LOGOUT_FAILED_TITLE);
    assert!(body.starts_with("Unable to log out: "));
    assert!(body.contains("session locked"));
    // Catalog lookups use the template, not the formatted text
    let failure = h.shell.notice(1);
    assert_eq!(failure.template.get(), LOGOUT_FAILED_BODY);
}

#[test]
fn logout_that_cannot_spawn_does_not_stay_logging_out() {
    let h = Harness::new(FakeBackend::with_session());
    h.native.refuse.set(true);

    h.controller.request_logout();

    assert!(!h.controller.is_logging_out());
    assert_ne!(h.controller.phase(), AppPhase::LoggingOut);
    assert!(h.shell.notice(0).closed.get());
    let (title, body) = h.shell.messages().last().cloned().unwrap();
    assert_eq!(title, LOGOUT_FAILED_TITLE);
    assert!(body.contains("thread limit reached"));
    assert_eq!(h.backend.count("logout"), 0);

    // The guard is free again
    h.native.refuse.set(false);
    h.controller.request_logout();
    assert_eq!(h.native.queued(), 1);
}

// ========== Get logs ==========

#[test]
fn get_logs_success_closes_dialog() {
    let h = Harness::new(FakeBackend::with_session());
    h.controller.activate_action(AppAction::GetLogs);

    assert_eq!(
        h.shell.messages(),
        vec![(
            GENERATING_LOGS_TITLE.to_string(),
            GENERATING_LOGS_BODY.to_string()
        )]
    );
    assert_eq!(h.worker.queued(), 1);
    assert_eq!(h.native.queued(), 0);

    h.worker.run_all();
    assert!(h.shell.notice(0).closed.get());
}

#[test]
fn log_generation_failure_rewrites_dialog_and_keeps_it_open() {
    let h = Harness::new(FakeBackend::with_session());
    h.backend.set(|s| s.fail_generate = true);

    h.controller.get_logs();
    h.worker.run_all();

    let notice = h.shell.notice(0);
    assert!(!notice.closed.get());
    assert_eq!(*notice.title.borrow(), LOGS_FAILED_TITLE);
    assert!(
        notice
            .description
            .borrow()
            .starts_with("\nUnable to generate logs: ")
    );
    assert!(notice.description.borrow().contains("read-only"));
    assert_eq!(notice.template.get(), LOGS_FAILED_BODY);
}

#[test]
fn folder_failure_points_at_logs_dir() {
    let h = Harness::new(FakeBackend::with_session());
    h.backend.set(|s| s.fail_open_folder = true);

    h.controller.get_logs();
    h.worker.run_all();

    let notice = h.shell.notice(0);
    assert!(!notice.closed.get());
    assert_eq!(*notice.title.borrow(), LOGS_FAILED_TITLE);
    assert!(notice.description.borrow().contains(FAKE_LOGS_DIR));
    assert_eq!(notice.template.get(), LOGS_FOLDER_FAILED_BODY);
}

// ========== About ==========

#[test]
fn about_action_shows_dialog() {
    let h = Harness::new(FakeBackend::new());
    h.controller.activate_action(AppAction::About);
    assert_eq!(h.shell.events(), vec![ShellEvent::About]);
}
