//! Error types for pipeline assembly and execution.

use thiserror::Error;
use weave_config::ConfigError;

/// Error reported by a step while executing.
///
/// Boxed so host-registered steps can return any error type.
pub type StepError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The pipeline declares a step no implementation is registered for.
    ///
    /// Raised during assembly, before any step runs.
    #[error("unknown pipeline step '{name}' at position {index}")]
    UnknownPluginStep { name: String, index: usize },

    /// A step failed while executing. The pipeline stops at this step and
    /// mutations it already made to the build context are kept.
    #[error("pipeline step '{step}' failed: {source}")]
    PluginStepFailure {
        step: String,
        #[source]
        source: StepError,
    },

    #[error("invalid options for pipeline step '{step}': {message}")]
    InvalidStepOptions { step: String, message: String },

    #[error("invalid pipeline entry at position {index}: {message}")]
    InvalidDeclaration { index: usize, message: String },

    #[error("invalid module replacement pattern '{pattern}': {source}")]
    InvalidReplacementPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
