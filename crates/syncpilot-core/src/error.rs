//! Error types module
//!
//! Every failure in a run is fatal. `SyncError` classifies them so that the
//! binary can log a stable error code before exiting with a non-zero status.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Warning level - for problems in user-supplied input
    Warn,
    /// Error level - for failures reported by the remote service or the host
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid remote reference: {0}")]
    InvalidReference(String),

    #[error("Remote service error during {operation}: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },

    #[error("Timed out after {waited_secs}s waiting for {stage}")]
    Timeout { stage: &'static str, waited_secs: u64 },

    #[error("Hook failed: {0}")]
    Hook(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for run operations
pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        SyncError::Configuration(message.into())
    }

    /// Machine-readable error code (e.g., "CONFIGURATION_ERROR")
    pub fn error_code(&self) -> &'static str {
        match self {
            SyncError::Configuration(_) => "CONFIGURATION_ERROR",
            SyncError::InvalidReference(_) => "INVALID_REFERENCE",
            SyncError::Remote { .. } => "REMOTE_ERROR",
            SyncError::Timeout { .. } => "TIMEOUT",
            SyncError::Hook(_) => "HOOK_ERROR",
            SyncError::Template(_) => "TEMPLATE_ERROR",
            SyncError::Io(_) => "IO_ERROR",
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            SyncError::Configuration(_) | SyncError::Template(_) => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }

    /// Whether the error was raised before anything was sent to the service
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            SyncError::Configuration(_) | SyncError::Template(_) | SyncError::Io(_)
        )
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Configuration(format!("JSON parsing error: {}", err))
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::Configuration(format!("TOML parsing error: {}", err))
    }
}

impl From<envy::Error> for SyncError {
    fn from(err: envy::Error) -> Self {
        SyncError::Configuration(format!("Environment settings error: {}", err))
    }
}
