//! Command-line interface definition for weave.
//!
//! # Command Structure
//!
//! - `weave config` - print the effective configuration for an environment
//! - `weave plan` - assemble the build pipeline and list its steps in order

mod commands;
pub mod enums;
mod tests;

use clap::Parser;

pub use commands::{Command, ConfigArgs, PlanArgs, TargetArgs};
pub use enums::*;

/// weave - layered build configuration for JavaScript bundles
#[derive(Parser, Debug)]
#[command(
    name = "weave",
    version,
    about = "Layered build configuration and plugin pipelines",
    long_about = "weave merges built-in presets, a project config file and environment\n\
                  profiles into one effective configuration, resolves build metadata from\n\
                  the environment, and assembles the ordered plugin pipeline it declares."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
