//! Error types for configuration merging, metadata resolution and loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A tree was merged against a scalar or sequence (or the reverse).
    #[error("config type conflict at '{path}': cannot merge {overlay_kind} over {base_kind}")]
    TypeConflict {
        /// Dotted key path of the offending entry, e.g. `output.path`
        path: String,
        base_kind: &'static str,
        overlay_kind: &'static str,
    },

    /// An environment-derived option failed validation.
    #[error("invalid value for metadata option {option}: {value:?} (expected {expected})")]
    MetadataValidation {
        option: &'static str,
        /// Raw value exactly as it was supplied
        value: String,
        expected: &'static str,
    },

    // Config parsing/loading errors
    #[error("config not found")]
    NotFound,

    #[error("config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("unknown environment profile: {0}")]
    UnknownProfile(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl ToString) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.to_string(),
        }
    }
}
