//! Parsing of `nmcli --terse` output
//!
//! In terse mode every record is one line, fields are separated by `:`, and
//! literal `:` and `\` inside a field are escaped as `\:` and `\\`.

use uuid::Uuid;

use crate::models::{ActivationState, ActiveConnection, Server, VpnKind};

/// Fields requested for the profile list
pub const PROFILE_FIELDS: &str = "NAME,UUID,TYPE";

/// Fields requested for the active connection list
pub const ACTIVE_FIELDS: &str = "NAME,UUID,TYPE,DEVICE,STATE";

/// Splits one terse line into unescaped fields
#[must_use]
pub fn split_terse(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            ':' => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);
    fields
}

/// Escapes a value the way `nmcli --terse` does
#[must_use]
pub fn escape_terse(field: &str) -> String {
    let mut escaped = String::with_capacity(field.len());
    for c in field.chars() {
        if matches!(c, '\\' | ':') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn matches_prefix(name: &str, prefix: &str) -> bool {
    prefix.is_empty() || name.starts_with(prefix)
}

/// Parses `nmcli -t -f NAME,UUID,TYPE connection show`
///
/// Keeps VPN and WireGuard profiles whose name starts with `prefix`; an empty
/// prefix keeps every VPN profile. Malformed lines are skipped.
#[must_use]
pub fn parse_profiles(output: &str, prefix: &str) -> Vec<Server> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let fields = split_terse(line);
            let [name, uuid, nm_type] = fields.as_slice() else {
                tracing::debug!(line, "Skipping malformed nmcli profile line");
                return None;
            };
            let kind = VpnKind::from_nm_type(nm_type)?;
            if !matches_prefix(name, prefix) {
                return None;
            }
            let id = Uuid::parse_str(uuid).ok()?;
            Some(Server::new(id, name.clone(), kind))
        })
        .collect()
}

/// Parses `nmcli -t -f NAME,UUID,TYPE,DEVICE,STATE connection show --active`
///
/// Returns the first VPN connection matching `prefix`.
#[must_use]
pub fn parse_active(output: &str, prefix: &str) -> Option<ActiveConnection> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .find_map(|line| {
            let fields = split_terse(line);
            let [name, uuid, nm_type, device, state] = fields.as_slice() else {
                tracing::debug!(line, "Skipping malformed nmcli active line");
                return None;
            };
            VpnKind::from_nm_type(nm_type)?;
            if !matches_prefix(name, prefix) {
                return None;
            }
            let id = Uuid::parse_str(uuid).ok()?;
            let device = match device.as_str() {
                "" | "--" => None,
                other => Some(other.to_string()),
            };
            Some(ActiveConnection {
                id,
                name: name.clone(),
                device,
                state: ActivationState::from_nm_state(state),
            })
        })
}
