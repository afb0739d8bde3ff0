//! Error types for tt
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown task id, bad config)
//! - 3: Blocked (task tracking is disabled)
//! - 4: Operation failed (I/O, serialization, lock timeout)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tt CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const DISABLED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tt operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Task not found: {0}")]
    TaskNotFound(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not determine a data directory for this user")]
    NoDataDir,

    // Blocked (exit code 3)
    #[error("Task tracking is disabled{}", reason_suffix(.0))]
    Disabled(Option<String>),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(" ({reason})"),
        None => String::new(),
    }
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidArgument(_)
            | Error::TaskNotFound(_)
            | Error::InvalidConfig(_)
            | Error::NoDataDir => exit_codes::USER_ERROR,

            // Blocked
            Error::Disabled(_) => exit_codes::DISABLED,

            // Operation failures
            Error::Io(_) | Error::Json(_) | Error::LockFailed(_) | Error::OperationFailed(_) => {
                exit_codes::OPERATION_FAILED
            }
        }
    }

    /// Structured details for the JSON error envelope
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::TaskNotFound(id) => Some(serde_json::json!({ "id": id })),
            Error::Disabled(Some(reason)) => Some(serde_json::json!({ "reason": reason })),
            _ => None,
        }
    }
}

/// Result type alias for tt operations
pub type Result<T> = std::result::Result<T, Error>;
