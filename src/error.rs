//! Error types for taskman
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad field values, duplicate or unknown task names, bad config)
//! - 4: Operation failed (file I/O, corrupt task file, lock contention)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskman CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskman operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid task: {0}")]
    Validation(String),

    #[error("Task already exists: {0}")]
    DuplicateName(String),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Operation failures (exit code 4)
    #[error("Task file {path} is corrupt: {message}")]
    CorruptStore { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::DuplicateName(_)
            | Error::NotFound(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_) => exit_codes::USER_ERROR,

            Error::CorruptStore { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Short machine-readable name for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::DuplicateName(_) => "duplicate_name",
            Error::NotFound(_) => "not_found",
            Error::InvalidConfig(_) => "invalid_config",
            Error::InvalidArgument(_) => "invalid_argument",
            Error::CorruptStore { .. } => "corrupt_store",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::TomlParse(_) | Error::TomlSerialize(_) => "toml",
            Error::LockFailed(_) => "lock_failed",
        }
    }

    /// Structured details for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::DuplicateName(name) | Error::NotFound(name) => {
                Some(serde_json::json!({ "name": name }))
            }
            Error::Validation(message)
            | Error::InvalidConfig(message)
            | Error::InvalidArgument(message) => Some(serde_json::json!({ "message": message })),
            Error::CorruptStore { path, message } => Some(serde_json::json!({
                "path": path.display().to_string(),
                "message": message,
            })),
            Error::LockFailed(path) => {
                Some(serde_json::json!({ "path": path.display().to_string() }))
            }
            _ => None,
        }
    }
}

/// Result type alias for taskman operations
pub type Result<T> = std::result::Result<T, Error>;
