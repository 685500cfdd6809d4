//! Integration tests for the login and dashboard view models

use std::sync::Arc;

use protonvpn_gui_core::VpnBackend;
use protonvpn_gui_core::models::ConnectionStatus;
use protonvpn_gui_core::task::TaskError;
use protonvpn_gui_core::view_model::{DashboardViewModel, LoginState, LoginViewModel};
use secrecy::SecretString;
use uuid::Uuid;

use super::support::{FakeBackend, server};

fn as_backend(backend: &Arc<FakeBackend>) -> Arc<dyn VpnBackend> {
    backend.clone()
}

// ========== Login ==========

#[test]
fn login_requires_both_fields() {
    let backend = FakeBackend::new();
    let mut vm = LoginViewModel::new(as_backend(&backend));
    assert!(!vm.can_submit());
    assert!(vm.begin_login().is_none());

    vm.set_username("alice");
    assert!(!vm.can_submit());
    vm.set_password(SecretString::from("secret".to_string()));
    assert!(vm.can_submit());
}

#[test]
fn login_round_trip_establishes_session() {
    let backend = FakeBackend::new();
    let mut vm = LoginViewModel::new(as_backend(&backend));
    vm.set_username(" alice ");
    vm.set_password(SecretString::from("secret".to_string()));

    let job = vm.begin_login().unwrap();
    assert_eq!(vm.state(), &LoginState::Authenticating);
    // A second submit while in flight is refused
    assert!(vm.begin_login().is_none());

    assert!(vm.finish_login(Ok(job())));
    assert_eq!(vm.state(), &LoginState::Authenticated);
    assert!(backend.session_exists());
}

#[test]
fn rejected_login_shows_error_and_allows_retry() {
    let backend = FakeBackend::new();
    let mut vm = LoginViewModel::new(as_backend(&backend));
    vm.set_username("alice");
    vm.set_password(SecretString::from("wrong".to_string()));

    let job = vm.begin_login().unwrap();
    assert!(!vm.finish_login(Ok(job())));
    assert_eq!(vm.error_message(), Some("Invalid credentials: rejected"));
    assert!(vm.can_submit());
}

#[test]
fn crashed_login_task_is_reported() {
    let backend = FakeBackend::new();
    let mut vm = LoginViewModel::new(as_backend(&backend));
    vm.set_username("alice");
    vm.set_password(SecretString::from("secret".to_string()));
    let _job = vm.begin_login().unwrap();

    assert!(!vm.finish_login(Err(TaskError::Panicked("boom".to_string()))));
    assert!(matches!(vm.state(), LoginState::Failed(m) if m.contains("boom")));
}

// ========== Dashboard ==========

#[test]
fn refresh_groups_servers_and_reads_status() {
    let backend = FakeBackend::with_session();
    backend.set(|s| {
        s.servers = vec![
            server("ProtonVPN SE#2"),
            server("ProtonVPN CH#1"),
            server("ProtonVPN custom"),
        ];
    });
    backend.connect_to("ProtonVPN CH#1");

    let mut vm = DashboardViewModel::new(as_backend(&backend));
    let job = vm.refresh_job();
    vm.apply_snapshot(Ok(job()));

    let labels: Vec<&str> = vm.servers().countries().iter().map(|c| c.label()).collect();
    assert_eq!(labels, vec!["CH", "SE", "Other"]);
    assert_eq!(vm.status().to_string(), "Connected to ProtonVPN CH#1");
    assert_eq!(vm.quick_connect_target().unwrap().name, "ProtonVPN CH#1");
    assert!(vm.last_error().is_none());
}

#[test]
fn connect_to_listed_server() {
    let backend = FakeBackend::with_session();
    let target = server("ProtonVPN NL#7");
    let id = target.id;
    backend.set(|s| s.servers = vec![target]);

    let mut vm = DashboardViewModel::new(as_backend(&backend));
    let job = vm.refresh_job();
    vm.apply_snapshot(Ok(job()));

    let job = vm.connect_job(id).unwrap();
    assert_eq!(
        vm.status(),
        &ConnectionStatus::Connecting("ProtonVPN NL#7".to_string())
    );
    vm.finish_connect(Ok(job()));
    assert!(matches!(vm.status(), ConnectionStatus::Connected(c) if c.id == id));
}

#[test]
fn connect_to_unknown_server_is_rejected() {
    let backend = FakeBackend::with_session();
    let mut vm = DashboardViewModel::new(as_backend(&backend));
    assert!(vm.connect_job(Uuid::new_v4()).is_err());
    assert_eq!(vm.status(), &ConnectionStatus::Disconnected);
}

#[test]
fn disconnect_without_connection_is_not_an_error() {
    let backend = FakeBackend::with_session();
    let mut vm = DashboardViewModel::new(as_backend(&backend));

    let job = vm.disconnect_job();
    vm.finish_disconnect(Ok(job()));

    assert_eq!(backend.count("disconnect"), 1);
    assert!(vm.last_error().is_none());
    assert_eq!(vm.status(), &ConnectionStatus::Disconnected);
}

#[test]
fn failed_refresh_keeps_previous_list() {
    let backend = FakeBackend::with_session();
    backend.set(|s| s.servers = vec![server("ProtonVPN CH#1")]);
    let mut vm = DashboardViewModel::new(as_backend(&backend));
    let job = vm.refresh_job();
    vm.apply_snapshot(Ok(job()));

    vm.apply_snapshot(Err(TaskError::MissingResult));

    assert_eq!(vm.servers().len(), 1);
    assert!(vm.last_error().is_some());
}
