//! Logging infrastructure for the weave CLI.
//!
//! Library crates emit `tracing` events; this module installs the subscriber
//! that prints them.
//!
//! - `--verbose` enables debug output for the weave crates
//! - `--quiet` limits output to errors
//! - `RUST_LOG` overrides the default filter otherwise
//!
//! # Example
//!
//! ```rust,no_run
//! use weave_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("resolving configuration");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "weave=debug,weave_cli=debug,weave_config=debug,weave_bundler=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "weave=info,weave_cli=info,weave_config=info,weave_bundler=info";

/// Filter directive for the given flags. `verbose` wins over `quiet`.
pub fn filter_directives(verbose: bool, quiet: bool) -> Option<&'static str> {
    if verbose {
        Some(VERBOSE_FILTER)
    } else if quiet {
        Some(QUIET_FILTER)
    } else {
        None
    }
}

/// Initialize the tracing subscriber.
///
/// Call once at startup, before any logging occurs. Logs go to stderr so
/// command output on stdout stays machine-readable.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = match filter_directives(verbose, quiet) {
        Some(directives) => EnvFilter::new(directives),
        None => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
    };
    init_logger_with_filter(filter, no_color);
}

/// Initialize the logger with a custom filter.
///
/// ```rust,no_run
/// use weave_cli::logger::init_logger_with_filter;
/// use tracing_subscriber::EnvFilter;
///
/// init_logger_with_filter(EnvFilter::new("weave_bundler=trace"), true);
/// ```
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
