//! Command implementations.

pub mod config;
pub mod plan;

use std::path::PathBuf;

use weave_config::EffectiveConfig;

use crate::error::Result;
use crate::options::Options;
use crate::{invoke_with, process_env};

pub use config::execute as config_execute;
pub use plan::execute as plan_execute;

/// Resolve the effective configuration selected by `options`.
pub(crate) fn resolve(options: &Options) -> Result<EffectiveConfig> {
    let root: PathBuf = match &options.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    invoke_with(&options.env, options.config.as_deref(), &root, &process_env())
}
