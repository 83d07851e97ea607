//! Storage error types.

use thiserror::Error;

/// Storage-specific errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Table not found.
    #[error("table not found: {table}")]
    TableNotFound { table: String },

    /// Table already exists.
    #[error("table already exists: {table}")]
    TableAlreadyExists { table: String },

    /// Connection to the table service failed.
    #[error("storage connection error: {message}")]
    ConnectionError { message: String },

    /// The table service rejected the request because of request rate.
    #[error("storage request throttled: {message}")]
    Throttled { message: String },

    /// The request did not complete in time.
    #[error("storage request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Filter expression rejected (too long, malformed).
    #[error("invalid filter: {message}")]
    InvalidFilter { message: String },

    /// Invalid input error.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Query failed on the service side.
    #[error("storage query error: {message}")]
    QueryError { message: String },

    /// Internal error.
    #[error("internal storage error: {message}")]
    InternalError { message: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
