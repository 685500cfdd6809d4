//! Dashboard window state

use std::sync::Arc;

use uuid::Uuid;

use crate::backend::{VpnBackend, ensure_disconnected};
use crate::error::{VpnError, VpnResult};
use crate::models::{ActiveConnection, ConnectionStatus, Server, ServerList};
use crate::task::TaskOutcome;

/// Result of one background refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    /// Known server profiles
    pub servers: Vec<Server>,
    /// Active connection, if any
    pub active: Option<ActiveConnection>,
}

/// State behind the dashboard window
pub struct DashboardViewModel {
    backend: Arc<dyn VpnBackend>,
    servers: ServerList,
    status: ConnectionStatus,
    last_error: Option<String>,
}

impl DashboardViewModel {
    /// Creates an empty dashboard
    #[must_use]
    pub fn new(backend: Arc<dyn VpnBackend>) -> Self {
        Self {
            backend,
            servers: ServerList::default(),
            status: ConnectionStatus::Disconnected,
            last_error: None,
        }
    }

    /// Servers grouped by country
    #[must_use]
    pub const fn servers(&self) -> &ServerList {
        &self.servers
    }

    /// Connection status
    #[must_use]
    pub const fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    /// Error from the last operation, cleared by the next success
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns the blocking call that reads servers and connection state
    #[must_use]
    pub fn refresh_job(&self) -> impl FnOnce() -> VpnResult<DashboardSnapshot> + Send + use<> {
        let backend = Arc::clone(&self.backend);
        move || {
            let servers = backend.servers()?;
            let active = backend.active_connection()?;
            Ok(DashboardSnapshot { servers, active })
        }
    }

    /// Applies a refresh outcome
    ///
    /// A failed refresh keeps the previous list and records the error.
    pub fn apply_snapshot(&mut self, outcome: TaskOutcome<VpnResult<DashboardSnapshot>>) {
        match super::flatten(outcome) {
            Ok(snapshot) => {
                self.servers = ServerList::from_servers(snapshot.servers);
                self.status = ConnectionStatus::from(snapshot.active);
                self.last_error = None;
            }
            Err(message) => {
                tracing::warn!(%message, "Dashboard refresh failed");
                self.last_error = Some(message);
            }
        }
    }

    /// Marks a connection attempt and returns the blocking connect call
    ///
    /// # Errors
    ///
    /// Returns [`VpnError::ServerNotFound`] if `server` is not in the list.
    pub fn connect_job(
        &mut self,
        server: Uuid,
    ) -> VpnResult<impl FnOnce() -> VpnResult<ActiveConnection> + Send + use<>> {
        let target = self
            .servers
            .find(server)
            .ok_or_else(|| VpnError::ServerNotFound(server.to_string()))?;
        self.status = ConnectionStatus::Connecting(target.name.clone());
        self.last_error = None;

        let backend = Arc::clone(&self.backend);
        Ok(move || backend.connect(server))
    }

    /// Applies a connect outcome
    pub fn finish_connect(&mut self, outcome: TaskOutcome<VpnResult<ActiveConnection>>) {
        match super::flatten(outcome) {
            Ok(active) => {
                tracing::info!(server = %active.name, "Connected");
                self.status = ConnectionStatus::from(Some(active));
            }
            Err(message) => {
                tracing::error!(%message, "Connection failed");
                self.status = ConnectionStatus::Disconnected;
                self.last_error = Some(message);
            }
        }
    }

    /// Marks a disconnect and returns the blocking disconnect call
    ///
    /// Having nothing to disconnect is not an error.
    pub fn disconnect_job(&mut self) -> impl FnOnce() -> VpnResult<()> + Send + use<> {
        self.status = ConnectionStatus::Disconnecting;
        self.last_error = None;
        let backend = Arc::clone(&self.backend);
        move || ensure_disconnected(backend.as_ref())
    }

    /// Applies a disconnect outcome
    pub fn finish_disconnect(&mut self, outcome: TaskOutcome<VpnResult<()>>) {
        match super::flatten(outcome) {
            Ok(()) => self.status = ConnectionStatus::Disconnected,
            Err(message) => {
                tracing::error!(%message, "Disconnect failed");
                self.last_error = Some(message);
            }
        }
    }

    /// Server used by the quick connect button
    #[must_use]
    pub fn quick_connect_target(&self) -> Option<&Server> {
        self.servers
            .countries()
            .iter()
            .find(|c| c.code.is_some())
            .or_else(|| self.servers.countries().first())
            .and_then(|c| c.servers.first())
    }
}

impl std::fmt::Debug for DashboardViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardViewModel")
            .field("servers", &self.servers.len())
            .field("status", &self.status)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}
