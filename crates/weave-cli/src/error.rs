//! Error handling for the weave CLI.
//!
//! Library errors convert into [`CliError`] through `#[from]`; `main` renders
//! them as miette diagnostics with a hint where one helps.

use std::path::PathBuf;

use miette::Report;
use thiserror::Error;
use weave_bundler::PipelineError;
use weave_config::ConfigError;

pub type Result<T> = std::result::Result<T, CliError>;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Merging, metadata or config file errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Pipeline assembly or execution errors
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Command-line or `WEAVE_*` options that could not be read
    #[error("Invalid options: {0}")]
    Options(String),

    #[error("Config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Nothing at '{0}' in the effective configuration")]
    MissingPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        CliError::Options(err.to_string())
    }
}

/// Convert a CliError to a miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Pipeline(e) => pipeline_error_to_miette(e),
        CliError::FileNotFound(path) => miette::miette!(
            help = "Pass an existing file to --config, or drop the flag to find weave.toml",
            "Config file not found: {}",
            path.display()
        ),
        _ => miette::miette!("{}", err),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match &err {
        ConfigError::TypeConflict { path, .. } => miette::miette!(
            help = format!("One layer sets '{path}' to a table and another to a plain value"),
            "{}",
            err
        ),
        ConfigError::MetadataValidation { option, .. } => miette::miette!(
            help = format!("Check the {option} environment variable and the metadata section"),
            "{}",
            err
        ),
        ConfigError::UnknownProfile(name) => miette::miette!(
            help = format!(
                "Built-in environments are production and development. \
                 Add [profiles.{name}] to weave.toml for others"
            ),
            "{}",
            err
        ),
        _ => miette::miette!("Configuration error: {}", err),
    }
}

fn pipeline_error_to_miette(err: PipelineError) -> Report {
    match &err {
        PipelineError::UnknownPluginStep { .. } => miette::miette!(
            help = format!("Known steps: {}", weave_bundler::BuiltinStep::NAMES.join(", ")),
            "{}",
            err
        ),
        _ => miette::miette!("Pipeline error: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_errors_keep_the_option_name() {
        let err = CliError::from(ConfigError::MetadataValidation {
            option: "PORT",
            value: "not-a-number".to_string(),
            expected: "a TCP port (0-65535)",
        });
        let report = cli_error_to_miette(err);
        let rendered = format!("{report:?}");
        assert!(rendered.contains("PORT"), "{rendered}");
        assert!(rendered.contains("not-a-number"), "{rendered}");
    }

    #[test]
    fn unknown_step_lists_known_steps() {
        let err = CliError::from(PipelineError::UnknownPluginStep {
            name: "uglify".to_string(),
            index: 2,
        });
        let rendered = format!("{:?}", cli_error_to_miette(err));
        assert!(rendered.contains("uglify"));
        assert!(rendered.contains("minify"));
    }
}
