//! Error types for calla.

use thiserror::Error;

/// Result type alias for calla operations.
pub type Result<T> = std::result::Result<T, CallaError>;

/// Main error type for calla.
#[derive(Error, Debug)]
pub enum CallaError {
    /// Vector dimension mismatch. Fatal to the single call; the caller
    /// must fix the input shape, nothing is retried automatically.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// A record with the same id is already present in the index.
    #[error("duplicate record id: {0}")]
    DuplicateId(String),

    /// Record not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A search request failed validation. No partial work is performed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The external embedding provider failed (transport, auth, quota).
    /// Propagated with context; retry policy belongs to the adapter.
    #[error("embedding provider error: {cause}")]
    EmbeddingProvider {
        /// Provider-reported cause.
        cause: String,
    },

    /// An operation exceeded its caller-supplied deadline. The index
    /// state is unchanged.
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CallaError {
    /// Create an invalid query error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        CallaError::InvalidQuery(msg.into())
    }

    /// Create a not-found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        CallaError::NotFound(msg.into())
    }

    /// Create an embedding provider error.
    pub fn provider(cause: impl Into<String>) -> Self {
        CallaError::EmbeddingProvider {
            cause: cause.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        CallaError::Internal(msg.into())
    }
}
