use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Library-wide error type for k6-runner operations.
///
/// Inside a run every variant is converted into an error-status
/// [`ExecutionResult`](crate::domain::ExecutionResult); only the CLI surface
/// lets these escape as process failures.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// The staging root does not exist.
    #[error("data directory {} not found", .0.display())]
    DataDirMissing(PathBuf),

    /// Resolved content is absent or unreadable.
    #[error("test content {} not found: {details}", path.display())]
    ContentNotFound { path: PathBuf, details: String },

    /// Directory content was requested without a trailing script token.
    #[error("k6 test script argument not found")]
    ScriptArgumentMissing,

    /// The trailing script token does not name a file in the working directory.
    #[error("k6 test script {} not found", .0.display())]
    ScriptNotFound(PathBuf),

    /// Repository descriptor is malformed.
    #[error("Invalid repository '{uri}': {reason}")]
    InvalidRepository { uri: String, reason: String },

    /// Git operation failed.
    #[error("Git error running '{operation}': {details}")]
    Git { operation: String, details: String },

    /// External tool could not be started.
    #[error("failed to start {tool}: {details}")]
    ToolStart { tool: String, details: String },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn git<O: Into<String>>(operation: O, err: git2::Error) -> Self {
        AppError::Git { operation: operation.into(), details: err.message().to_string() }
    }
}
