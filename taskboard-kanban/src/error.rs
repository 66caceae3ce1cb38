//! Error types for the board engine

use std::path::PathBuf;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, KanbanError>;

/// A single position write the storage collaborator rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub task_id: String,
    pub message: String,
}

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum KanbanError {
    /// The moved (or edited) task is not in the collection
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// Board not found
    #[error("board not found: {id}")]
    BoardNotFound { id: String },

    /// The acting user has no access to the board
    #[error("user '{user}' does not have access to board {board}")]
    NotAuthorized { user: String, board: String },

    /// One or more position writes were rejected; local state was already applied
    #[error("failed to persist {} of {attempted} position writes", .failed.len())]
    Persistence {
        attempted: usize,
        failed: Vec<WriteFailure>,
    },

    /// Missing required field
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// The storage collaborator failed for a reason of its own
    #[error("storage error: {message}")]
    Storage { message: String },

    /// Store directory not initialized
    #[error("board store not initialized at {path}")]
    NotInitialized { path: PathBuf },

    /// Store directory already exists
    #[error("board store already exists at {path}")]
    AlreadyExists { path: PathBuf },

    /// Lock is held by another process
    #[error("lock busy - another operation in progress")]
    LockBusy,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KanbanError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Check if retrying the same request can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy | Self::Persistence { .. })
    }
}
