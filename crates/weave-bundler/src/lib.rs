//! # weave-bundler
//!
//! Build pipeline for weave. Takes an [`EffectiveConfig`](weave_config::EffectiveConfig),
//! assembles the steps it declares and runs them in declaration order over a
//! [`BuildContext`].
//!
//! ```
//! use std::collections::HashMap;
//! use weave_bundler::{Artifact, BuildContext, StepRegistry, assemble};
//! use weave_config::LayeredConfig;
//!
//! let env: HashMap<String, String> = HashMap::new();
//! let config = LayeredConfig::new("development").resolve(&env).unwrap();
//!
//! let pipeline = assemble(config.tree(), &StepRegistry::new()).unwrap();
//! assert_eq!(pipeline.step_names(), ["define", "loader-options", "hash"]);
//!
//! let mut ctx = BuildContext::for_config(&config)
//!     .with_artifact(Artifact::entry("main", "console.log(ENV)"));
//! pipeline.execute(&mut ctx).unwrap();
//!
//! assert_eq!(ctx.defines["ENV"], "\"development\"");
//! assert_eq!(ctx.artifact("main").unwrap().file_name.as_deref(), Some("main.bundle.js"));
//! ```

pub mod context;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod plugins;
pub mod replacement;

pub use context::{
    Artifact, ArtifactKind, BuildContext, ContentTransformer, LoaderOptions, Module, ModuleGraph,
    TransformRequest,
};
pub use error::{PipelineError, Result, StepError};
pub use output::{OutputNamer, content_hash};
pub use pipeline::{ExecutionReport, PIPELINE_SECTION, Pipeline, StepTiming, assemble};
pub use plugins::{BuiltinStep, PipelineStep, PluginStep, StepFactory, StepKind, StepRegistry};
pub use replacement::{ModuleReplacementRegistry, ReplacementRule, ReplacementRuleSpec};
