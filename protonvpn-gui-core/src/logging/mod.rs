//! Logging setup built on `tracing`
//!
//! The GUI logs to stderr and to `protonvpn-gui.log` in the logs directory, so
//! every bug report bundle carries the application log next to the
//! NetworkManager diagnostics.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Global flag indicating whether logging has been initialized
static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Crates whose events pass the default filter
const LOG_TARGETS: [&str; 2] = ["protonvpn_gui", "protonvpn_gui_core"];

/// Errors that can occur during logging initialization
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to install the subscriber
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// Logging was already initialized
    #[error("Logging has already been initialized")]
    AlreadyInitialized,

    /// The log file could not be opened
    #[error("Failed to open log file {path}: {source}")]
    FileCreationFailed {
        /// Log file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result type for logging operations
pub type LoggingResult<T> = Result<T, LoggingError>;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Errors and warnings
    Warn,
    /// Errors, warnings, and info (default)
    #[default]
    Info,
    /// All above plus debug messages
    Debug,
    /// Everything
    Trace,
}

impl std::str::FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Output destination for log events
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogOutput {
    /// Standard output
    Stdout,
    /// Standard error
    #[default]
    Stderr,
    /// A file (appended to)
    File(PathBuf),
    /// Standard error and a file
    StderrAndFile(PathBuf),
}

/// Configuration for logging initialization
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Minimum level
    pub level: LogLevel,
    /// Destination
    pub output: LogOutput,
    /// Custom filter directives (override `level` when set)
    pub filter: Option<String>,
}

impl LoggingConfig {
    /// Creates a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log level
    #[must_use]
    pub const fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the output destination
    #[must_use]
    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Sets custom filter directives
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Filter directives derived from this configuration
    #[must_use]
    pub fn directives(&self) -> String {
        self.filter.clone().unwrap_or_else(|| {
            LOG_TARGETS
                .iter()
                .map(|target| format!("{target}={}", self.level))
                .collect::<Vec<_>>()
                .join(",")
        })
    }
}

fn open_log_file(path: &Path) -> LoggingResult<File> {
    let creation_failed = |source| LoggingError::FileCreationFailed {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(creation_failed)?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(creation_failed)
}

/// Writers a [`LogOutput`] resolves to
///
/// A log file that cannot be opened degrades to stderr, with the reason kept
/// in `file_error` so it can be logged once the subscriber is up.
#[derive(Debug)]
struct Sinks {
    stdout: bool,
    stderr: bool,
    file: Option<File>,
    file_error: Option<LoggingError>,
}

impl Sinks {
    fn open(output: &LogOutput) -> Self {
        let (stdout, stderr, path) = match output {
            LogOutput::Stdout => (true, false, None),
            LogOutput::Stderr => (false, true, None),
            LogOutput::File(path) => (false, false, Some(path)),
            LogOutput::StderrAndFile(path) => (false, true, Some(path)),
        };
        let mut sinks = Self {
            stdout,
            stderr,
            file: None,
            file_error: None,
        };
        if let Some(path) = path {
            match open_log_file(path) {
                Ok(file) => sinks.file = Some(file),
                Err(e) => {
                    sinks.stderr = true;
                    sinks.file_error = Some(e);
                }
            }
        }
        sinks
    }
}

/// Installs the global subscriber
///
/// `RUST_LOG`, when set, takes precedence over the configured directives. If
/// the log file cannot be opened, events still go to stderr and a warning
/// names the file.
///
/// # Errors
///
/// Returns an error if logging was already initialized, the filter is
/// invalid, or the subscriber fails to install.
pub fn init_logging(config: &LoggingConfig) -> LoggingResult<()> {
    if LOGGING_INITIALIZED.load(Ordering::SeqCst) {
        return Err(LoggingError::AlreadyInitialized);
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.directives())
            .map_err(|e| LoggingError::InitializationFailed(e.to_string()))?,
    };

    let sinks = Sinks::open(&config.output);
    let stdout_layer = sinks.stdout.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stdout)
    });
    let stderr_layer = sinks.stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
    });
    let file_layer = sinks.file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_ansi(false)
            .with_writer(Arc::new(file))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::InitializationFailed(e.to_string()))?;
    LOGGING_INITIALIZED.store(true, Ordering::SeqCst);

    if let Some(e) = sinks.file_error {
        tracing::warn!(error = %e, "Log file unavailable, logging to stderr only");
    }
    tracing::debug!(level = %config.level, output = ?config.output, "Logging initialized");
    Ok(())
}
