//! Error types for task lifecycle operations and persistence.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for task store and lifecycle operations.
pub type TaskResult<T> = Result<T, TaskError>;

/// Result type for persistence adapters.
pub type StorageResult<T> = Result<T, StorageError>;

/// Outcome of a task operation that did not go through.
///
/// None of these are fatal: callers report them and carry on.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A required field was empty or a value is outside its enumeration.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The requested task, or any task eligible for the operation, does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Another task already satisfies the operation's precondition.
    #[error("{0}")]
    Conflict(String),

    /// Reading or writing persisted tasks failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TaskError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Informational outcomes are reported to the user rather than treated as failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Conflict(_))
    }
}

/// Errors raised by persistence adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed task data in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }
}
