//! Pipeline steps: the built-in set plus host-registered custom steps.

pub mod builtins;
pub mod registry;

use std::fmt;
use std::sync::Arc;

use crate::context::BuildContext;
use crate::error::StepError;

pub use builtins::BuiltinStep;
pub use registry::{StepFactory, StepRegistry};

/// A step supplied by the host rather than built in.
pub trait PipelineStep: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn execute(&self, ctx: &mut BuildContext) -> Result<(), StepError>;
}

/// How an assembled step runs.
#[derive(Debug, Clone)]
pub enum StepKind {
    Builtin(BuiltinStep),
    Custom(Arc<dyn PipelineStep>),
}

/// One assembled entry of a pipeline.
#[derive(Debug, Clone)]
pub struct PluginStep {
    name: String,
    kind: StepKind,
}

impl PluginStep {
    pub fn new(name: impl Into<String>, kind: StepKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Name as declared in the pipeline section.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &StepKind {
        &self.kind
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, StepKind::Builtin(_))
    }

    pub(crate) fn execute(&self, ctx: &mut BuildContext) -> Result<(), StepError> {
        match &self.kind {
            StepKind::Builtin(step) => step.execute(ctx),
            StepKind::Custom(step) => step.execute(ctx),
        }
    }
}
