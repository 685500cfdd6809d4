//! Login window state

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::backend::VpnBackend;
use crate::error::VpnResult;
use crate::task::TaskOutcome;

/// Progress of a login attempt
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoginState {
    /// Waiting for input
    #[default]
    Idle,
    /// Request in flight
    Authenticating,
    /// Last attempt failed with the given message
    Failed(String),
    /// Session established
    Authenticated,
}

/// State behind the login form
pub struct LoginViewModel {
    backend: Arc<dyn VpnBackend>,
    username: String,
    password: SecretString,
    state: LoginState,
}

impl LoginViewModel {
    /// Creates an empty form
    #[must_use]
    pub fn new(backend: Arc<dyn VpnBackend>) -> Self {
        Self {
            backend,
            username: String::new(),
            password: SecretString::from(String::new()),
            state: LoginState::Idle,
        }
    }

    /// Current username
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Updates the username
    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    /// Updates the password
    pub fn set_password(&mut self, password: SecretString) {
        self.password = password;
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &LoginState {
        &self.state
    }

    /// Returns true when the form can be submitted
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.username.trim().is_empty()
            && !self.password.expose_secret().is_empty()
            && self.state != LoginState::Authenticating
    }

    /// Marks the attempt as started and returns the blocking login call
    ///
    /// Returns `None` when the form is incomplete or a request is in flight.
    pub fn begin_login(&mut self) -> Option<impl FnOnce() -> VpnResult<()> + Send + use<>> {
        if !self.can_submit() {
            return None;
        }
        self.state = LoginState::Authenticating;

        let backend = Arc::clone(&self.backend);
        let username = self.username.trim().to_string();
        let password = SecretString::from(self.password.expose_secret().to_string());
        Some(move || backend.login(&username, &password))
    }

    /// Applies the login outcome, returning true on success
    pub fn finish_login(&mut self, outcome: TaskOutcome<VpnResult<()>>) -> bool {
        match super::flatten(outcome) {
            Ok(()) => {
                tracing::info!(username = %self.username, "Logged in");
                self.password = SecretString::from(String::new());
                self.state = LoginState::Authenticated;
                true
            }
            Err(message) => {
                tracing::warn!(%message, "Login failed");
                self.state = LoginState::Failed(message);
                false
            }
        }
    }

    /// Error text to display, if the last attempt failed
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            LoginState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl std::fmt::Debug for LoginViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginViewModel")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
