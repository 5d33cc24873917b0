#![cfg(test)]

use clap::Parser;

use super::*;

#[test]
fn config_command_parses_target_and_format() {
    let cli = Cli::try_parse_from([
        "weave", "config", "--env", "production", "--config", "weave.toml", "--format", "toml",
    ])
    .unwrap();

    match cli.command {
        Command::Config(args) => {
            assert_eq!(args.target.env.as_deref(), Some("production"));
            assert_eq!(args.target.config.unwrap().to_str(), Some("weave.toml"));
            assert_eq!(args.format, Some(OutputFormat::Toml));
            assert!(args.get.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn global_flags_work_after_subcommand() {
    let cli =
        Cli::try_parse_from(["weave", "plan", "-e", "development", "--no-color", "-v"]).unwrap();
    assert!(cli.verbose);
    assert!(cli.no_color);
    assert!(matches!(cli.command, Command::Plan(_)));
}

#[test]
fn verbose_conflicts_with_quiet() {
    assert!(Cli::try_parse_from(["weave", "-v", "-q", "plan"]).is_err());
}

#[test]
fn env_is_optional() {
    let cli = Cli::try_parse_from(["weave", "config"]).unwrap();
    match cli.command {
        Command::Config(args) => assert!(args.target.env.is_none()),
        other => panic!("unexpected command: {other:?}"),
    }
}
