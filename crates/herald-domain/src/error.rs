//! Domain error types.

use herald_storage::StorageError;
use thiserror::Error;

/// Domain-specific errors for lookup and authorization operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The underlying table store failed; propagated unchanged.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository or authorizer constructed with an unusable configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The token provider failed to produce a delegated token.
    #[error("token acquisition failed: {message}")]
    TokenAcquisition { message: String },

    /// The directory service failed to return group memberships.
    #[error("directory error: {message}")]
    Directory { message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
