use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::enums::OutputFormat;

/// Available weave subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the effective configuration
    ///
    /// Merges presets, the config file and the environment profile, resolves
    /// metadata from the process environment and prints the result.
    Config(ConfigArgs),

    /// Show the build pipeline
    ///
    /// Assembles the pipeline declared by the effective configuration and
    /// lists the steps in the order they will run.
    Plan(PlanArgs),
}

/// Selects the environment and config file.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Environment profile to build for
    ///
    /// Falls back to WEAVE_ENV, then "development".
    #[arg(short, long, value_name = "ENV")]
    pub env: Option<String>,

    /// Path to a config file
    ///
    /// Without this flag weave.toml, weave.json or the "weave" field of
    /// package.json in the working directory is used, if present.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory to search for a config file
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print only the value at a dotted path, e.g. output.filename
    #[arg(long, value_name = "PATH")]
    pub get: Option<String>,
}

/// Arguments for the plan command
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}
