//! Built-in pipeline steps.
//!
//! Each step parses its options into a typed struct when the pipeline is
//! assembled, so bad options fail before anything runs.

mod dedupe;
mod define;
mod hash;
mod hashed_ids;
mod loader_options;
mod replacement;
mod transform;

use serde::de::DeserializeOwned;
use thiserror::Error;
use weave_config::{ConfigError, ConfigTree};

use crate::context::BuildContext;
use crate::error::{PipelineError, Result, StepError};

pub use dedupe::DedupeStep;
pub use define::DefineStep;
pub use hash::HashStep;
pub use hashed_ids::HashedModuleIdsStep;
pub use loader_options::LoaderOptionsStep;
pub use replacement::ModuleReplacementStep;
pub use transform::{MinifyStep, OptimizeJsStep};

/// Failures raised by built-in steps while executing.
#[derive(Debug, Error)]
pub enum BuiltinStepError {
    #[error("step '{step}' needs a content transformer but none is configured")]
    MissingTransformer { step: &'static str },

    #[error("cannot assign a unique id to module '{module}'")]
    ModuleIdCollision { module: String },
}

#[derive(Debug, Clone)]
pub enum BuiltinStep {
    OptimizeJs(OptimizeJsStep),
    Define(DefineStep),
    Minify(MinifyStep),
    ModuleReplacement(ModuleReplacementStep),
    HashedModuleIds(HashedModuleIdsStep),
    Dedupe(DedupeStep),
    LoaderOptions(LoaderOptionsStep),
    Hash(HashStep),
}

impl BuiltinStep {
    pub const NAMES: &'static [&'static str] = &[
        OptimizeJsStep::NAME,
        DefineStep::NAME,
        MinifyStep::NAME,
        ModuleReplacementStep::NAME,
        HashedModuleIdsStep::NAME,
        DedupeStep::NAME,
        LoaderOptionsStep::NAME,
        HashStep::NAME,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::OptimizeJs(_) => OptimizeJsStep::NAME,
            Self::Define(_) => DefineStep::NAME,
            Self::Minify(_) => MinifyStep::NAME,
            Self::ModuleReplacement(_) => ModuleReplacementStep::NAME,
            Self::HashedModuleIds(_) => HashedModuleIdsStep::NAME,
            Self::Dedupe(_) => DedupeStep::NAME,
            Self::LoaderOptions(_) => LoaderOptionsStep::NAME,
            Self::Hash(_) => HashStep::NAME,
        }
    }

    pub fn execute(&self, ctx: &mut BuildContext) -> std::result::Result<(), StepError> {
        match self {
            Self::OptimizeJs(step) => step.execute(ctx),
            Self::Define(step) => step.execute(ctx),
            Self::Minify(step) => step.execute(ctx),
            Self::ModuleReplacement(step) => step.execute(ctx),
            Self::HashedModuleIds(step) => step.execute(ctx),
            Self::Dedupe(step) => step.execute(ctx),
            Self::LoaderOptions(step) => step.execute(ctx),
            Self::Hash(step) => step.execute(ctx),
        }
    }
}

/// Build the built-in step called `name`, or `None` if there is none.
pub(crate) fn from_declaration(name: &str, options: &ConfigTree) -> Result<Option<BuiltinStep>> {
    let step = match name {
        OptimizeJsStep::NAME => BuiltinStep::OptimizeJs(OptimizeJsStep::from_options(options)?),
        DefineStep::NAME => BuiltinStep::Define(parse_options(name, options)?),
        MinifyStep::NAME => BuiltinStep::Minify(MinifyStep::from_options(options)),
        ModuleReplacementStep::NAME => {
            BuiltinStep::ModuleReplacement(ModuleReplacementStep::from_options(options)?)
        }
        HashedModuleIdsStep::NAME => BuiltinStep::HashedModuleIds(parse_options(name, options)?),
        DedupeStep::NAME => BuiltinStep::Dedupe(parse_options(name, options)?),
        LoaderOptionsStep::NAME => BuiltinStep::LoaderOptions(parse_options(name, options)?),
        HashStep::NAME => BuiltinStep::Hash(parse_options(name, options)?),
        _ => return Ok(None),
    };
    Ok(Some(step))
}

/// Deserialize a step's options, reporting failures against the step.
pub(crate) fn parse_options<T: DeserializeOwned>(step: &str, options: &ConfigTree) -> Result<T> {
    options.extract().map_err(|e| PipelineError::InvalidStepOptions {
        step: step.to_string(),
        message: match e {
            ConfigError::InvalidValue { message, .. } => message,
            other => other.to_string(),
        },
    })
}
