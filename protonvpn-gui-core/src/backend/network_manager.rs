//! NetworkManager backend driven through `nmcli`

use std::path::PathBuf;
use std::process::{Command, Output};

use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::config::{ConfigManager, NetworkSettings};
use crate::error::{VpnError, VpnResult};
use crate::models::{ActiveConnection, Server};
use crate::paths;

use super::bug_report::{LogBundle, default_diagnostics};
use super::nmcli::{ACTIVE_FIELDS, PROFILE_FIELDS, parse_active, parse_profiles};
use super::session::{Session, SessionStore};
use super::{BugReport, VpnBackend, ensure_disconnected};

/// Default `nmcli` program name
pub const NMCLI: &str = "nmcli";

/// VPN backend over NetworkManager profiles
#[derive(Debug, Clone)]
pub struct NetworkManagerBackend {
    program: String,
    prefix: String,
    sessions: SessionStore,
    logs_dir: PathBuf,
}

impl NetworkManagerBackend {
    /// Creates a backend
    ///
    /// * `program` - `nmcli` executable
    /// * `prefix` - profile name prefix to manage (empty = all VPN profiles)
    /// * `sessions` - session marker storage
    /// * `logs_dir` - bug report destination
    #[must_use]
    pub fn new(
        program: impl Into<String>,
        prefix: impl Into<String>,
        sessions: SessionStore,
        logs_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            prefix: prefix.into(),
            sessions,
            logs_dir: logs_dir.into(),
        }
    }

    /// Creates a backend from settings and the config directory
    #[must_use]
    pub fn from_settings(config: &ConfigManager, network: &NetworkSettings) -> Self {
        Self::new(
            NMCLI,
            network.connection_prefix.clone(),
            SessionStore::new(config.session_path()),
            paths::log_dir(),
        )
    }

    /// Session storage
    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    fn run(&self, args: &[&str]) -> VpnResult<Output> {
        tracing::debug!(program = %self.program, ?args, "Running nmcli");
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| VpnError::CommandUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(output)
        } else {
            Err(VpnError::CommandFailed {
                command: format!("{} {}", self.program, args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    fn run_stdout(&self, args: &[&str]) -> VpnResult<String> {
        let output = self.run(args)?;
        String::from_utf8(output.stdout).map_err(|e| VpnError::Parse(e.to_string()))
    }

    fn require_session(&self) -> VpnResult<()> {
        if self.session_exists() {
            Ok(())
        } else {
            Err(VpnError::NoSession)
        }
    }
}

impl VpnBackend for NetworkManagerBackend {
    fn session_exists(&self) -> bool {
        self.sessions.exists()
    }

    // Records a local session marker only; no account service is contacted
    fn login(&self, username: &str, password: &SecretString) -> VpnResult<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(VpnError::InvalidCredentials("username is empty".to_string()));
        }
        if password.expose_secret().is_empty() {
            return Err(VpnError::InvalidCredentials("password is empty".to_string()));
        }

        self.sessions.save(&Session::new(username))?;
        tracing::info!("Session started");
        Ok(())
    }

    fn logout(&self) -> VpnResult<()> {
        if let Err(e) = ensure_disconnected(self) {
            tracing::warn!(%e, "Failed to disconnect during logout");
        }
        self.sessions.clear()?;
        tracing::info!("Session removed");
        Ok(())
    }

    fn active_connection(&self) -> VpnResult<Option<ActiveConnection>> {
        let stdout =
            self.run_stdout(&["-t", "-f", ACTIVE_FIELDS, "connection", "show", "--active"])?;
        Ok(parse_active(&stdout, &self.prefix))
    }

    fn servers(&self) -> VpnResult<Vec<Server>> {
        let stdout = self.run_stdout(&["-t", "-f", PROFILE_FIELDS, "connection", "show"])?;
        Ok(parse_profiles(&stdout, &self.prefix))
    }

    fn connect(&self, server: Uuid) -> VpnResult<ActiveConnection> {
        self.require_session()?;
        let known = self.servers()?;
        let target = known
            .iter()
            .find(|s| s.id == server)
            .ok_or_else(|| VpnError::ServerNotFound(server.to_string()))?;

        // Only one tunnel at a time
        ensure_disconnected(self)?;

        tracing::info!(server = %target.name, "Connecting");
        let id = server.to_string();
        self.run(&["connection", "up", "uuid", &id])?;

        self.active_connection()?.ok_or_else(|| {
            VpnError::Parse(format!("{} did not become active", target.name))
        })
    }

    fn disconnect(&self) -> VpnResult<()> {
        let Some(active) = self.active_connection()? else {
            return Err(VpnError::ConnectionNotFound);
        };
        tracing::info!(server = %active.name, "Disconnecting");
        let id = active.id.to_string();
        self.run(&["connection", "down", "uuid", &id])?;
        Ok(())
    }

    fn bug_report(&self) -> Box<dyn BugReport> {
        Box::new(LogBundle::new(
            self.logs_dir.clone(),
            default_diagnostics(&self.program),
        ))
    }
}
