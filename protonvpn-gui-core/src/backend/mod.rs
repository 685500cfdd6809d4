//! VPN backend call surface
//!
//! The front-end never implements VPN logic itself. Everything that talks to
//! the network stack goes through [`VpnBackend`]; the shipped implementation
//! is [`NetworkManagerBackend`], which drives `nmcli`.
//!
//! All methods block. Callers on the UI thread run them through
//! [`crate::task`] except for quick state queries.

mod bug_report;
pub mod nmcli;
mod network_manager;
mod session;

pub use bug_report::{DiagnosticCommand, LogBundle, default_diagnostics};
pub use network_manager::NetworkManagerBackend;
pub use session::{Session, SessionStore};

use std::path::PathBuf;

use secrecy::SecretString;
use uuid::Uuid;

use crate::error::{BugReportResult, VpnResult};
use crate::models::{ActiveConnection, Server};

/// Operations the front-end consumes from the VPN library
pub trait VpnBackend: Send + Sync {
    /// Returns true when a valid session exists
    fn session_exists(&self) -> bool;

    /// Starts a session for the given account
    ///
    /// Whether credentials are checked against the Proton account service is
    /// up to the implementation. [`NetworkManagerBackend`] does not contact
    /// any service: it only rejects empty fields and records a local session
    /// marker, leaving authentication to the imported VPN profiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the session cannot
    /// be stored.
    fn login(&self, username: &str, password: &SecretString) -> VpnResult<()>;

    /// Ends the session, disconnecting any active connection first
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be removed.
    fn logout(&self) -> VpnResult<()>;

    /// Returns the active VPN connection, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the connection state cannot be queried.
    fn active_connection(&self) -> VpnResult<Option<ActiveConnection>>;

    /// Lists the servers available for connection
    ///
    /// # Errors
    ///
    /// Returns an error if the profile list cannot be queried.
    fn servers(&self) -> VpnResult<Vec<Server>>;

    /// Connects to a server
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::VpnError::ServerNotFound`] for unknown servers
    /// and [`crate::error::VpnError::NoSession`] without a session.
    fn connect(&self, server: Uuid) -> VpnResult<ActiveConnection>;

    /// Disconnects the active connection
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::VpnError::ConnectionNotFound`] when nothing is
    /// connected; callers treat that as success.
    fn disconnect(&self) -> VpnResult<()>;

    /// Creates a bug report handle
    fn bug_report(&self) -> Box<dyn BugReport>;
}

/// Log bundle generation
pub trait BugReport: Send {
    /// Collects logs and diagnostics into the logs directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or any bundle file cannot be written.
    fn generate_logs(&self) -> BugReportResult<PathBuf>;

    /// Opens the logs directory in the desktop file manager
    ///
    /// # Errors
    ///
    /// Returns an error if no handler could be launched.
    fn open_folder_with_logs(&self) -> BugReportResult<()>;

    /// Directory the bundle is written to
    fn logs_dir(&self) -> PathBuf;
}

/// Disconnects, treating "no connection" as already done
///
/// # Errors
///
/// Returns any backend failure other than
/// [`crate::error::VpnError::ConnectionNotFound`].
pub fn ensure_disconnected(backend: &dyn VpnBackend) -> VpnResult<()> {
    match backend.disconnect() {
        Err(e) if e.is_connection_not_found() => {
            tracing::debug!("No active connection to disconnect");
            Ok(())
        }
        other => other,
    }
}
