//! Error types for the object-mapping layer.
//!
//! Decode failures abort the whole record. The caller sees either a fully
//! populated value or one of these variants, never a partial record.

use thiserror::Error;

/// Errors that can occur while decoding a JSON document into a record.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The service answered with an `{"error": ...}` payload.
    #[error("Site Error: {message}")]
    RemoteReported {
        /// Message supplied by the service.
        message: String,
    },

    /// A required member was absent from the object.
    #[error("No Member: member '{key}' was not found!")]
    MissingField {
        /// Wire key of the missing member.
        key: String,
    },

    /// A member (or one element of an array member) had the wrong JSON kind.
    #[error("Wrong Type: {}", describe_mismatch(.key, .index, .expected))]
    TypeMismatch {
        /// Wire key of the offending member.
        key: String,
        /// Index of the offending element when the member is an array.
        index: Option<usize>,
        /// Name of the kind that was expected.
        expected: &'static str,
    },

    /// The payload was not parseable JSON at all.
    #[error("malformed JSON document: {source}")]
    Malformed {
        /// The underlying parser error.
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Creates a remote-reported error.
    pub fn remote_reported(message: impl Into<String>) -> Self {
        Self::RemoteReported {
            message: message.into(),
        }
    }

    /// Creates a missing-field error.
    pub fn missing_field(key: impl Into<String>) -> Self {
        Self::MissingField { key: key.into() }
    }

    /// Creates a type-mismatch error for a whole member.
    pub fn type_mismatch(key: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            index: None,
            expected,
        }
    }

    /// Creates a type-mismatch error for one element of an array member.
    pub fn element_mismatch(key: impl Into<String>, index: usize, expected: &'static str) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            index: Some(index),
            expected,
        }
    }

    /// Wraps a JSON parser error.
    #[must_use]
    pub fn malformed(source: serde_json::Error) -> Self {
        Self::Malformed { source }
    }

    /// Returns the wire key this error refers to, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingField { key } | Self::TypeMismatch { key, .. } => Some(key),
            Self::RemoteReported { .. } | Self::Malformed { .. } => None,
        }
    }
}

#[allow(clippy::ref_option)]
fn describe_mismatch(key: &str, index: &Option<usize>, expected: &str) -> String {
    match index {
        Some(index) => format!(
            "array '{key}' item at index {index} was the wrong type! (expected {expected})"
        ),
        None => format!("member '{key}' was the wrong type! (expected {expected})"),
    }
}
