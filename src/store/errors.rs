//! # Node Store Errors
//!
//! Failures raised by a node store. The resolver layer never catches,
//! retries or wraps these beyond carrying them to the caller.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Node store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Filter tree could not be evaluated
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Record is not a well-formed node
    #[error("Invalid node: {0}")]
    InvalidNode(String),

    /// Two nodes share an identifier
    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    /// Reading a node dump failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Backend-specific failure
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Stable error code for logs and CLI output
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidFilter(_) => "NODELINK_INVALID_FILTER",
            StoreError::InvalidNode(_) => "NODELINK_INVALID_NODE",
            StoreError::DuplicateNode(_) => "NODELINK_DUPLICATE_NODE",
            StoreError::Io(_) => "NODELINK_STORE_IO",
            StoreError::Backend(_) => "NODELINK_STORE_BACKEND",
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidNode(err.to_string())
    }
}
