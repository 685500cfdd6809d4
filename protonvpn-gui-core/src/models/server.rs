//! Server profiles and connection status

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Country code pattern: `CH#12`, `US-FREE#3`, secure core `IS-DE#1`
static COUNTRY_CODE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]{2})(?:-[A-Z]{2,4})?#\d+\b")
        .map_err(|e| tracing::error!(%e, "Invalid country code pattern"))
        .ok()
});

/// Tunnel technology of a server profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VpnKind {
    /// OpenVPN through the NetworkManager VPN plugin
    OpenVpn,
    /// Native WireGuard device
    WireGuard,
}

impl VpnKind {
    /// Maps a NetworkManager connection type to a VPN kind
    #[must_use]
    pub fn from_nm_type(nm_type: &str) -> Option<Self> {
        match nm_type {
            "vpn" => Some(Self::OpenVpn),
            "wireguard" => Some(Self::WireGuard),
            _ => None,
        }
    }

    /// Short label for the UI
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OpenVpn => "OpenVPN",
            Self::WireGuard => "WireGuard",
        }
    }
}

/// A VPN profile the user can connect to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// Profile UUID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Tunnel technology
    pub kind: VpnKind,
    /// ISO country code parsed from the name, if any
    pub country: Option<String>,
}

impl Server {
    /// Creates a server and derives its country from the name
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>, kind: VpnKind) -> Self {
        let name = name.into();
        let country = country_code(&name);
        Self {
            id,
            name,
            kind,
            country,
        }
    }
}

/// Extracts the exit country code from a server name
///
/// Returns `None` when the name carries no `CC#n` style tag.
#[must_use]
pub fn country_code(name: &str) -> Option<String> {
    let re = COUNTRY_CODE.as_ref()?;
    re.captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Activation state reported for the active connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationState {
    /// Tunnel is being established
    Activating,
    /// Tunnel is up
    Activated,
    /// Tunnel is being torn down
    Deactivating,
}

impl ActivationState {
    /// Parses NetworkManager's `GENERAL.STATE` / `STATE` field
    #[must_use]
    pub fn from_nm_state(state: &str) -> Self {
        match state {
            "activating" => Self::Activating,
            "deactivating" => Self::Deactivating,
            _ => Self::Activated,
        }
    }
}

/// The currently active VPN connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveConnection {
    /// Profile UUID
    pub id: Uuid,
    /// Profile name
    pub name: String,
    /// Network device carrying the tunnel
    pub device: Option<String>,
    /// Activation state
    pub state: ActivationState,
}

/// Presentation-level connection status
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Not connected
    #[default]
    Disconnected,
    /// Connecting to the named server
    Connecting(String),
    /// Connected
    Connected(ActiveConnection),
    /// Disconnecting
    Disconnecting,
}

impl ConnectionStatus {
    /// Returns true when a tunnel is up or coming up
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Connected(_) | Self::Connecting(_))
    }
}

impl From<Option<ActiveConnection>> for ConnectionStatus {
    fn from(active: Option<ActiveConnection>) -> Self {
        match active {
            Some(conn) if conn.state == ActivationState::Activating => {
                Self::Connecting(conn.name)
            }
            Some(conn) if conn.state == ActivationState::Deactivating => Self::Disconnecting,
            Some(conn) => Self::Connected(conn),
            None => Self::Disconnected,
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting(name) => write!(f, "Connecting to {name}..."),
            Self::Connected(conn) => write!(f, "Connected to {}", conn.name),
            Self::Disconnecting => write!(f, "Disconnecting..."),
        }
    }
}
