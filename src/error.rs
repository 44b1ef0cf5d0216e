//! Error handling module for switcheroo
//!
//! Provides centralized error types using thiserror. Only fatal conditions
//! live here: everything the compatibility pipeline can recover from is turned
//! into an "unknown" classification long before it reaches these types.

use thiserror::Error;

/// Main error type for switcheroo
#[derive(Error, Debug)]
pub enum SwitcherooError {
    /// IO errors (config files, report files, sysfs)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Hardware probe errors that the caller asked to see
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// No hardware query strategy works on this host
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Report rendering or persistence errors
    #[error("Report error: {0}")]
    Report(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General errors (catch-all for edge cases)
    #[error("{0}")]
    General(String),
}

/// Result type alias for switcheroo operations
pub type Result<T> = std::result::Result<T, SwitcherooError>;

impl SwitcherooError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unsupported platform error
    pub fn unsupported_platform(msg: impl Into<String>) -> Self {
        Self::UnsupportedPlatform(msg.into())
    }

    /// Create a report error
    pub fn report(msg: impl Into<String>) -> Self {
        Self::Report(msg.into())
    }

    /// Create a general error
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }
}

/// Failure while enumerating a single device category.
///
/// Never crosses the probe boundary: the probe logs it and the category
/// contributes zero components.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The query command could not be spawned or exited non-zero
    #[error("command `{command}` failed: {message}")]
    Command { command: String, message: String },

    /// Reading a sysfs/procfs file failed
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The query output could not be parsed
    #[error("unparseable output: {0}")]
    Parse(String),
}

impl ProbeError {
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            message: message.into(),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
