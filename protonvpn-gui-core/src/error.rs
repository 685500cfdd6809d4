//! Error types for the ProtonVPN front-end core
//!
//! Each concern has its own typed error with a matching `Result` alias.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by a [`crate::backend::VpnBackend`]
#[derive(Debug, Error)]
pub enum VpnError {
    /// No active VPN connection exists
    #[error("No active VPN connection found")]
    ConnectionNotFound,

    /// The requested server profile does not exist
    #[error("Server not found: {0}")]
    ServerNotFound(String),

    /// An operation needed a session but none exists
    #[error("No active session, please log in")]
    NoSession,

    /// Credentials were rejected before reaching the backend
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// An external program could not be started
    #[error("Failed to run {program}: {source}")]
    CommandUnavailable {
        /// Program that could not be spawned
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An external program exited with a failure status
    #[error("{command} failed: {stderr}")]
    CommandFailed {
        /// Command line that failed
        command: String,
        /// Captured standard error
        stderr: String,
    },

    /// Backend output could not be understood
    #[error("Unexpected backend output: {0}")]
    Parse(String),

    /// Session persistence failed
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl VpnError {
    /// Returns true for the benign "nothing to disconnect" condition
    #[must_use]
    pub const fn is_connection_not_found(&self) -> bool {
        matches!(self, Self::ConnectionNotFound)
    }
}

/// Result type for backend operations
pub type VpnResult<T> = Result<T, VpnError>;

/// Errors raised while reading or writing the session marker
#[derive(Debug, Error)]
pub enum SessionError {
    /// File system failure
    #[error("Session file {path}: {source}")]
    Io {
        /// Session file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The session file exists but is not valid TOML
    #[error("Corrupted session file {path}: {reason}")]
    Corrupted {
        /// Session file path
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Serialization failed
    #[error("Failed to serialize session: {0}")]
    Serialize(String),
}

/// Result type for session persistence
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors raised while building or showing a bug report
#[derive(Debug, Error)]
pub enum BugReportError {
    /// The logs directory could not be prepared or written
    #[error("Unable to write logs to {path}: {source}")]
    Write {
        /// Path being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Report metadata could not be serialized
    #[error("Unable to serialize report metadata: {0}")]
    Serialize(String),

    /// The file manager could not be launched
    #[error("Unable to open {path}: {reason}")]
    OpenFolder {
        /// Folder that was to be opened
        path: PathBuf,
        /// Reason reported by the desktop handler
        reason: String,
    },
}

/// Result type for bug report operations
pub type BugReportResult<T> = Result<T, BugReportError>;

/// Errors for configuration loading and saving
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration directory could be determined
    #[error("Unable to determine the configuration directory")]
    NoConfigDir,

    /// File system failure
    #[error("Config file {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML or schema mismatch
    #[error("Invalid settings in {path}: {reason}")]
    Parse {
        /// Config path
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Serialization failed
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
