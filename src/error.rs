//! Error types for resource conversion and versioning

use thiserror::Error;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;

/// Conversion errors
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Malformed conversion remainder under annotation {key}: {source}")]
    MalformedRemainder {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid parameter {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Duplicate key {key} in {field}")]
    DuplicateKey { field: String, key: String },

    #[error("Cannot represent trigger in {field}: {reason}")]
    UnrepresentableTrigger { field: String, reason: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unsupported API version: {0}")]
    UnsupportedVersion(String),

    #[error("Kind {kind} is not served at version {version}")]
    UnsupportedKind { kind: String, version: String },

    #[error("Kind mismatch: expected {expected}, got {actual}")]
    KindMismatch { expected: String, actual: String },

    #[error("Invalid object: {0}")]
    InvalidObject(String),

    #[error("Invalid conversion scheme: {0}")]
    InvalidScheme(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConversionError {
    /// Whether the error stems from the caller's request rather than from
    /// converting a well-formed object.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            ConversionError::UnsupportedVersion(_)
                | ConversionError::UnsupportedKind { .. }
                | ConversionError::KindMismatch { .. }
                | ConversionError::InvalidObject(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_classification() {
        assert!(ConversionError::UnsupportedVersion("v2".into()).is_bad_request());
        assert!(ConversionError::KindMismatch {
            expected: "Pipeline".into(),
            actual: "Run".into(),
        }
        .is_bad_request());
        assert!(!ConversionError::MissingField("spec.tfxComponents".into()).is_bad_request());
        assert!(!ConversionError::DuplicateKey {
            field: "spec.env".into(),
            key: "a".into(),
        }
        .is_bad_request());
    }
}
