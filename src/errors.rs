//! # Resolution Errors
//!
//! Store failures pass through unchanged. The resolver layer itself raises
//! schema inconsistencies found while reading `group` / `distinct`
//! selections, and serialization failures when a structured result is read
//! back as a field value.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for resolver operations
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Resolver errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Failure reported by the node store
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A `field:` argument named a value the connection's field enum does
    /// not declare
    #[error("Unknown value `{value}` for field enum of `{field}`")]
    UnknownEnumValue { field: String, value: String },

    /// The connection declares no field enum for a `group`/`distinct`
    /// sub-selection
    #[error("No field enum declared for `{0}`")]
    MissingFieldEnum(String),

    /// A resolved result could not be converted to JSON
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl ResolveError {
    /// Stable error code for logs and CLI output
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::Store(err) => err.code(),
            ResolveError::UnknownEnumValue { .. } => "NODELINK_UNKNOWN_ENUM_VALUE",
            ResolveError::MissingFieldEnum(_) => "NODELINK_MISSING_FIELD_ENUM",
            ResolveError::Serialization(_) => "NODELINK_SERIALIZATION",
        }
    }
}

impl From<serde_json::Error> for ResolveError {
    fn from(err: serde_json::Error) -> Self {
        ResolveError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_are_transparent() {
        let err: ResolveError = StoreError::Backend("connection reset".into()).into();
        assert_eq!(err.to_string(), "Store backend error: connection reset");
        assert_eq!(err.code(), "NODELINK_STORE_BACKEND");
    }

    #[test]
    fn test_enum_errors() {
        let err = ResolveError::UnknownEnumValue {
            field: "group".into(),
            value: "frontmatter___color".into(),
        };
        assert_eq!(err.code(), "NODELINK_UNKNOWN_ENUM_VALUE");
        assert!(err.to_string().contains("frontmatter___color"));
    }

    #[test]
    fn test_serialization_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ResolveError = json_err.into();
        assert_eq!(err.code(), "NODELINK_SERIALIZATION");
        assert!(err.to_string().starts_with("Serialization failed"));
    }
}
