//! Error types for the harness
//!
//! Only harness-level problems are errors. A pattern that is not found in
//! the captured output is an outcome, never an `Error`.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Launch Errors ===
    #[error("Program '{program}' not found. Check the path or that it is on PATH")]
    ProgramNotFound { program: String },

    #[error("Program '{program}' is not executable: {reason}")]
    ProgramNotExecutable { program: String, reason: String },

    #[error("Failed to launch '{program}': {reason}")]
    LaunchFailed { program: String, reason: String },

    #[error("Failed to open {0} pipe to the program")]
    PipeUnavailable(&'static str),

    // === Execution Errors ===
    #[error("Program did not exit within {0} seconds and was killed")]
    ProcessTimeout(u64),

    // === Pattern Errors ===
    #[error("Invalid pattern /{pattern}/: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Invalid scenario file '{path}': {message}")]
    ScenarioParse { path: String, message: String },

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Aggregate Errors ===
    #[error("{failed} of {total} scenarios failed")]
    ScenariosFailed { failed: usize, total: usize },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Classify a spawn failure for `program`
    pub fn launch(program: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::ProgramNotFound {
                program: program.to_string(),
            },
            io::ErrorKind::PermissionDenied => Self::ProgramNotExecutable {
                program: program.to_string(),
                reason: err.to_string(),
            },
            _ => Self::LaunchFailed {
                program: program.to_string(),
                reason: err.to_string(),
            },
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: &str, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    }

    /// Create a scenario parse error
    pub fn scenario_parse(path: &std::path::Path, message: impl ToString) -> Self {
        Self::ScenarioParse {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Whether this error comes from starting the program
    pub fn is_launch_failure(&self) -> bool {
        matches!(
            self,
            Self::ProgramNotFound { .. }
                | Self::ProgramNotExecutable { .. }
                | Self::LaunchFailed { .. }
        )
    }
}
