//! Step registry.
//!
//! Maps step names to implementations. Built-in steps are always available;
//! hosts register additional steps by name. Registration order has no effect
//! on execution order, which comes only from the pipeline declaration.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use weave_config::ConfigTree;

use super::builtins::{self, BuiltinStep};
use super::{PipelineStep, PluginStep, StepKind};
use crate::error::{PipelineError, Result, StepError};

/// Builds a custom step from its declared options.
pub type StepFactory =
    Arc<dyn Fn(&ConfigTree) -> std::result::Result<Arc<dyn PipelineStep>, StepError> + Send + Sync>;

/// Name to implementation lookup used when assembling a pipeline.
#[derive(Clone, Default)]
pub struct StepRegistry {
    custom: IndexMap<String, StepFactory>,
}

impl StepRegistry {
    /// Registry with only the built-in steps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom step factory under `name`.
    ///
    /// A custom registration shadows a built-in step of the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&ConfigTree) -> std::result::Result<Arc<dyn PipelineStep>, StepError>
            + Send
            + Sync
            + 'static,
    {
        self.custom.insert(name.into(), Arc::new(factory));
    }

    /// Register a ready-made step that ignores its options.
    pub fn register_step(&mut self, step: Arc<dyn PipelineStep>) {
        let name = step.name().to_string();
        self.register(name, move |_| Ok(Arc::clone(&step)));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.custom.contains_key(name) || BuiltinStep::NAMES.contains(&name)
    }

    /// Every resolvable name: built-ins first, then custom registrations.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = BuiltinStep::NAMES
            .iter()
            .copied()
            .filter(|name| !self.custom.contains_key(*name))
            .collect();
        names.extend(self.custom.keys().map(String::as_str));
        names
    }

    /// Instantiate the step declared as `name` at `index`.
    pub(crate) fn instantiate(
        &self,
        name: &str,
        index: usize,
        options: &ConfigTree,
    ) -> Result<PluginStep> {
        if let Some(factory) = self.custom.get(name) {
            let step = factory(options).map_err(|e| PipelineError::InvalidStepOptions {
                step: name.to_string(),
                message: e.to_string(),
            })?;
            return Ok(PluginStep::new(name, StepKind::Custom(step)));
        }

        match builtins::from_declaration(name, options)? {
            Some(step) => Ok(PluginStep::new(name, StepKind::Builtin(step))),
            None => Err(PipelineError::UnknownPluginStep {
                name: name.to_string(),
                index,
            }),
        }
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistry")
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}
