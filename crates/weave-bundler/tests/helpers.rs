//! Shared test utilities for weave-bundler tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use weave_bundler::{
    BuildContext, ContentTransformer, PipelineStep, StepError, StepRegistry, TransformRequest,
};
use weave_config::{ConfigTree, EffectiveConfig, LayeredConfig, Metadata};

/// Shared log of step names, in the order they ran.
pub type RunLog = Arc<Mutex<Vec<String>>>;

/// Custom step that appends its name to a shared log.
#[derive(Debug)]
pub struct Recorder {
    pub name: String,
    pub log: RunLog,
}

impl PipelineStep for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, ctx: &mut BuildContext) -> Result<(), StepError> {
        self.log.lock().push(self.name.clone());
        ctx.defines.insert(self.name.clone(), "true".to_string());
        Ok(())
    }
}

/// Custom step that always fails.
#[derive(Debug)]
pub struct Failing {
    pub name: String,
    pub log: RunLog,
}

impl PipelineStep for Failing {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, ctx: &mut BuildContext) -> Result<(), StepError> {
        self.log.lock().push(self.name.clone());
        ctx.defines.insert("partial".to_string(), "true".to_string());
        Err(format!("{} exploded", self.name).into())
    }
}

/// Transformer that collapses whitespace and tags the output with the step.
#[derive(Debug, Default)]
pub struct Squash;

impl ContentTransformer for Squash {
    fn transform(&self, request: &TransformRequest<'_>) -> Result<Vec<u8>, StepError> {
        let text = std::str::from_utf8(request.content)?;
        let squashed: String = text.split_whitespace().collect();
        Ok(format!("/*{}*/{squashed}", request.step).into_bytes())
    }
}

/// Registry with recorders named `names`, all writing into one log.
pub fn recording_registry(names: &[&str]) -> (StepRegistry, RunLog) {
    let log: RunLog = Arc::default();
    let mut registry = StepRegistry::new();
    for name in names {
        registry.register_step(Arc::new(Recorder {
            name: name.to_string(),
            log: Arc::clone(&log),
        }));
    }
    (registry, log)
}

pub fn empty_context() -> BuildContext {
    BuildContext::new(ConfigTree::new(), Arc::new(Metadata::default()))
}

pub fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn tree(value: serde_json::Value) -> ConfigTree {
    ConfigTree::from_json(value).expect("object")
}

pub fn production(env: &[(&str, &str)]) -> EffectiveConfig {
    LayeredConfig::new("production")
        .resolve(&vars(env))
        .expect("production presets resolve")
}
