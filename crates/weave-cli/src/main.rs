//! weave CLI entry point: argument parsing, logging and command dispatch.

use clap::Parser;
use miette::Result;
use weave_cli::{cli, commands, error, logger, ui};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Config(config_args) => commands::config_execute(config_args),
        cli::Command::Plan(plan_args) => commands::plan_execute(plan_args),
    };

    result.map_err(error::cli_error_to_miette)
}
