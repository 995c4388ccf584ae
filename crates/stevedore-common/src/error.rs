//! Unified error types for the Stevedore workspace.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum StevedoreError {
    /// A specification field with no default was absent or empty.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A specification field is present but cannot be rendered safely.
    #[error("invalid value for {field}: {message}")]
    InvalidField {
        /// Name of the offending field.
        field: String,
        /// Description of what is wrong with the value.
        message: String,
    },

    /// A block registry was built with two entries for the same block.
    #[error("duplicate block name: {block}")]
    DuplicateBlock {
        /// Name of the block that appeared twice.
        block: String,
    },

    /// A textual block name matched none of the known blocks.
    #[error("unknown block name: {name}")]
    UnknownBlock {
        /// The unrecognised name.
        name: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// YAML deserialization failed.
    #[error("yaml error: {source}")]
    Yaml {
        /// Underlying YAML error.
        #[from]
        source: serde_yaml::Error,
    },
}

impl StevedoreError {
    /// Builds an [`StevedoreError::InvalidField`] from any field label.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, StevedoreError>;
