//! Session marker persistence
//!
//! A session is the record that the user logged in. It holds no secrets:
//! NetworkManager's own secret agent supplies VPN credentials at connect time.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// Persisted session data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Account name
    pub username: String,
    /// Login time
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session starting now
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            created_at: Utc::now(),
        }
    }
}

/// Reads and writes the session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store backed by `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Session file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the session, `None` when logged out
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> SessionResult<Option<Session>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| SessionError::Corrupted {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }

    /// Returns true when a readable session exists
    #[must_use]
    pub fn exists(&self) -> bool {
        match self.load() {
            Ok(session) => session.is_some(),
            Err(e) => {
                tracing::warn!(%e, "Ignoring unreadable session");
                false
            }
        }
    }

    /// Writes the session, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, session: &Session) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SessionError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content =
            toml::to_string(session).map_err(|e| SessionError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Removes the session; removing a missing session succeeds
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> SessionResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
