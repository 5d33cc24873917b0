//! weave CLI - layered build configuration from the command line.
//!
//! - [`invoke`] - resolve the effective configuration for an environment
//! - [`error`] - CLI error type and miette rendering
//! - [`logger`] - tracing subscriber setup
//! - `commands` - `weave config` and `weave plan`
//!
//! # Example
//!
//! ```rust,no_run
//! let config = weave_cli::invoke("production", None).unwrap();
//! println!("{}", config.tree().to_json());
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod options;
pub mod ui;

use std::collections::HashMap;
use std::ffi::OsString;
use std::hash::BuildHasher;
use std::path::Path;

use tracing::debug;
use weave_config::{ConfigDiscovery, EffectiveConfig, LayeredConfig, load_file};

pub use error::{CliError, Result};

/// Resolve the effective configuration for `env`.
///
/// Reads the process environment once. `config_path` selects a config file;
/// without it the working directory is searched.
pub fn invoke(env: &str, config_path: Option<&Path>) -> Result<EffectiveConfig> {
    let cwd = std::env::current_dir()?;
    invoke_with(env, config_path, &cwd, &process_env())
}

/// Like [`invoke`] with an explicit search root and environment mapping.
pub fn invoke_with<S: BuildHasher>(
    env: &str,
    config_path: Option<&Path>,
    root: &Path,
    env_vars: &HashMap<String, String, S>,
) -> Result<EffectiveConfig> {
    let file = match config_path {
        Some(path) => {
            let path = if path.is_absolute() { path.to_path_buf() } else { root.join(path) };
            if !path.exists() {
                return Err(CliError::FileNotFound(path));
            }
            Some(load_file(&path)?)
        }
        None => ConfigDiscovery::new(root).load_optional()?,
    };

    let mut layers = LayeredConfig::new(env);
    if let Some(file) = &file {
        debug!(path = %file.path.display(), profiles = file.profiles.len(), "using config file");
        layers = layers.with_file(file);
    }

    Ok(layers.resolve(env_vars)?)
}

/// Snapshot of the process environment. Non-UTF-8 entries are skipped.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars_os()
        .filter_map(|(key, value): (OsString, OsString)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        })
        .collect()
}
