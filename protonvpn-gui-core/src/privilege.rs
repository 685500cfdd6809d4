//! Elevated-privilege launch detection
//!
//! Running the GUI through `sudo` or `pkexec` is unsupported. The launch is
//! only allowed to continue when the operator explicitly answers `y` on the
//! terminal.

use std::ffi::OsString;
use std::io::{self, BufRead, Write};

/// Environment variables set by privilege-escalation tools
pub const ELEVATION_VARS: [&str; 2] = ["SUDO_UID", "PKEXEC_UID"];

/// Warning printed before the confirmation prompt
pub const ELEVATED_WARNING: &str = "Running ProtonVPN as root is not supported and is highly \
discouraged, as it might introduce undesirable side-effects.";

/// Confirmation prompt
pub const ELEVATED_PROMPT: &str = "Are you sure that you want to proceed (y/N): ";

/// How the process was launched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// Normal user launch
    User,
    /// Launched through sudo/pkexec
    Elevated,
}

impl Privilege {
    /// Detects elevation from the process environment
    #[must_use]
    pub fn detect() -> Self {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Detects elevation through a variable lookup function
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if ELEVATION_VARS.iter().any(|var| lookup(var).is_some()) {
            Self::Elevated
        } else {
            Self::User
        }
    }

    /// Returns true for an elevated launch
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::Elevated)
    }
}

/// Prints the warning and reads a yes/no answer; only `y`/`Y` confirms
///
/// End of input counts as "no".
///
/// # Errors
///
/// Returns an error if writing the prompt or reading the answer fails.
pub fn confirm_elevated_launch<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<bool> {
    writeln!(output, "\n{ELEVATED_WARNING}")?;
    write!(output, "{ELEVATED_PROMPT}")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim_end_matches(['\n', '\r']);
    Ok(answer.eq_ignore_ascii_case("y"))
}
