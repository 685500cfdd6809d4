//! Log bundle for bug reports
//!
//! The bundle is written into the logs directory, next to the GUI's own log
//! file: a `system-info.json` manifest plus one text file per diagnostic
//! command. A diagnostic that cannot run is recorded in its file; only I/O
//! failures on the bundle itself fail the report.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Utc;
use serde::Serialize;

use crate::error::{BugReportError, BugReportResult};

use super::BugReport;

/// Manifest file name
pub const SYSTEM_INFO_FILE: &str = "system-info.json";

/// A command whose output is captured into the bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticCommand {
    /// Output file name inside the logs directory
    pub file_name: String,
    /// Program to run
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
}

impl DiagnosticCommand {
    /// Creates a diagnostic command
    #[must_use]
    pub fn new(file_name: &str, program: &str, args: &[&str]) -> Self {
        Self {
            file_name: file_name.to_string(),
            program: program.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the command and renders its result as text
    fn capture(&self) -> String {
        let header = format!("$ {}\n", self.command_line());
        match Command::new(&self.program).args(&self.args).output() {
            Ok(output) => {
                let mut text = header;
                text.push_str(&String::from_utf8_lossy(&output.stdout));
                if !output.stderr.is_empty() {
                    text.push_str("\n--- stderr ---\n");
                    text.push_str(&String::from_utf8_lossy(&output.stderr));
                }
                if !output.status.success() {
                    text.push_str(&format!("\n--- exit status: {} ---\n", output.status));
                }
                text
            }
            Err(e) => format!("{header}unavailable: {e}\n"),
        }
    }
}

/// NetworkManager diagnostics collected by default
#[must_use]
pub fn default_diagnostics(nmcli: &str) -> Vec<DiagnosticCommand> {
    vec![
        DiagnosticCommand::new("nmcli-general.txt", nmcli, &["general", "status"]),
        DiagnosticCommand::new("nmcli-connections.txt", nmcli, &["connection", "show"]),
        DiagnosticCommand::new(
            "networkmanager-journal.txt",
            "journalctl",
            &["-u", "NetworkManager", "-n", "300", "--no-pager"],
        ),
    ]
}

#[derive(Serialize)]
struct SystemInfo<'a> {
    app_version: &'a str,
    os: &'a str,
    arch: &'a str,
    generated_at: String,
    diagnostics: Vec<&'a str>,
}

/// Bug report writing into a fixed logs directory
#[derive(Debug, Clone)]
pub struct LogBundle {
    logs_dir: PathBuf,
    diagnostics: Vec<DiagnosticCommand>,
}

impl LogBundle {
    /// Creates a bundle for `logs_dir`
    #[must_use]
    pub fn new(logs_dir: impl Into<PathBuf>, diagnostics: Vec<DiagnosticCommand>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            diagnostics,
        }
    }

    fn write(path: &Path, content: &str) -> BugReportResult<()> {
        std::fs::write(path, content).map_err(|source| BugReportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl BugReport for LogBundle {
    fn generate_logs(&self) -> BugReportResult<PathBuf> {
        std::fs::create_dir_all(&self.logs_dir).map_err(|source| BugReportError::Write {
            path: self.logs_dir.clone(),
            source,
        })?;

        let info = SystemInfo {
            app_version: env!("CARGO_PKG_VERSION"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            generated_at: Utc::now().to_rfc3339(),
            diagnostics: self.diagnostics.iter().map(|d| d.file_name.as_str()).collect(),
        };
        let manifest = serde_json::to_string_pretty(&info)
            .map_err(|e| BugReportError::Serialize(e.to_string()))?;
        Self::write(&self.logs_dir.join(SYSTEM_INFO_FILE), &manifest)?;

        for diagnostic in &self.diagnostics {
            let text = diagnostic.capture();
            Self::write(&self.logs_dir.join(&diagnostic.file_name), &text)?;
        }

        tracing::info!(
            logs_dir = %self.logs_dir.display(),
            diagnostics = self.diagnostics.len(),
            "Generated log bundle"
        );
        Ok(self.logs_dir.clone())
    }

    fn open_folder_with_logs(&self) -> BugReportResult<()> {
        open::that_detached(&self.logs_dir).map_err(|e| BugReportError::OpenFolder {
            path: self.logs_dir.clone(),
            reason: e.to_string(),
        })
    }

    fn logs_dir(&self) -> PathBuf {
        self.logs_dir.clone()
    }
}
