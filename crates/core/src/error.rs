//! Error taxonomy for document transformation.
//!
//! Two tiers exist:
//! - [`TransformError`]: fatal. The whole document transform is aborted and no
//!   output is produced.
//! - [`ResolveError`]: non-fatal. The affected sub-expression degrades to
//!   `unknown` and a [`TransformWarning`] is recorded.

use std::fmt;

use thiserror::Error;

/// A fatal error that aborts the transform of a whole document.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The document does not match the OpenAPI object model (wrong shape at `path`).
    #[error("Invalid OpenAPI document at `{path}`: {source}")]
    InvalidDocument {
        /// serde path of the offending value
        path: String,
        /// Underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// A schema-bearing value has the wrong shape.
    #[error("{path}: {message}")]
    InvalidSchema {
        /// JSON pointer of the schema
        path: String,
        /// What is wrong with it
        message: String,
    },

    /// A `$ref` that cannot name a type at all.
    #[error("{path}: invalid $ref `{reference}`")]
    InvalidRef {
        /// JSON pointer of the referencing node
        path: String,
        /// The `$ref` value as written
        reference: String,
    },
}

impl TransformError {
    pub(crate) fn invalid_schema(path: &str, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Reasons a `$ref` could not be resolved. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Points into another document.
    #[error("external $ref `{0}` is not supported (bundle the document first)")]
    External(String),

    /// Nothing at the pointer.
    #[error("could not resolve $ref `{0}`")]
    NotFound(String),

    /// The chain of `$ref`s loops back on itself.
    #[error("circular $ref `{0}`")]
    Circular(String),

    /// The target has the wrong shape for where it is used.
    #[error("$ref `{reference}` does not point at the expected object: {message}")]
    Deserialize {
        /// The `$ref` value as written
        reference: String,
        /// Deserialization error text
        message: String,
    },
}

/// A non-fatal problem recorded during a transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformWarning {
    /// Document location (JSON pointer) where the problem surfaced.
    pub path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for TransformWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
