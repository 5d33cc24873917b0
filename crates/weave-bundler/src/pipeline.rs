//! Pipeline assembly and execution.
//!
//! The `pipeline` section of the effective configuration is an ordered list.
//! Each entry is either a step name or a table:
//!
//! ```toml
//! pipeline = [
//!     "define",
//!     { name = "minify", options = { beautify = false } },
//!     { name = "dedupe", enabled = false },
//! ]
//! ```
//!
//! Steps run exactly in that order. There are no phases or priorities.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, info_span};
use weave_config::{ConfigError, ConfigTree, ConfigValue};

use crate::context::BuildContext;
use crate::error::{PipelineError, Result};
use crate::plugins::{BuiltinStep, PluginStep, StepKind, StepRegistry};
use crate::replacement::ModuleReplacementRegistry;

/// Section of the effective configuration declaring the steps.
pub const PIPELINE_SECTION: &str = "pipeline";

/// An ordered, validated list of steps ready to run.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    steps: Vec<PluginStep>,
    skipped: Vec<String>,
}

/// Timing for one executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTiming {
    pub name: String,
    pub duration: Duration,
}

/// What a successful run executed, in order.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    pub steps: Vec<StepTiming>,
    pub total: Duration,
}

impl ExecutionReport {
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }
}

/// A pipeline entry after normalizing the string and table forms.
struct Declaration {
    name: String,
    enabled: bool,
    options: ConfigTree,
}

/// Build the pipeline declared in `config`.
///
/// Every entry is validated before anything runs: unknown names fail with
/// [`PipelineError::UnknownPluginStep`] and bad options with
/// [`PipelineError::InvalidStepOptions`]. Disabled entries are dropped.
/// A missing section yields an empty pipeline.
pub fn assemble(config: &ConfigTree, registry: &StepRegistry) -> Result<Pipeline> {
    let Some(section) = config.get(PIPELINE_SECTION) else {
        debug!("no pipeline section, nothing to assemble");
        return Ok(Pipeline::default());
    };
    let entries = section.as_sequence().ok_or_else(|| {
        PipelineError::Config(ConfigError::InvalidValue {
            field: PIPELINE_SECTION.to_string(),
            message: format!("expected a list of steps, found {}", section.kind()),
        })
    })?;

    let mut pipeline = Pipeline::default();
    for (index, entry) in entries.iter().enumerate() {
        let declaration = parse_declaration(index, entry)?;
        if !declaration.enabled {
            debug!(step = %declaration.name, index, "step disabled, skipping");
            pipeline.skipped.push(declaration.name);
            continue;
        }
        let step = registry.instantiate(&declaration.name, index, &declaration.options)?;
        pipeline.steps.push(step);
    }

    debug!(steps = ?pipeline.step_names(), "pipeline assembled");
    Ok(pipeline)
}

fn parse_declaration(index: usize, entry: &ConfigValue) -> Result<Declaration> {
    let invalid = |message: String| PipelineError::InvalidDeclaration { index, message };

    if let Some(name) = entry.as_str() {
        return Ok(Declaration {
            name: name.to_string(),
            enabled: true,
            options: ConfigTree::new(),
        });
    }

    let Some(table) = entry.as_tree() else {
        return Err(invalid(format!(
            "expected a step name or table, found {}",
            entry.kind()
        )));
    };

    let mut declaration = Declaration {
        name: String::new(),
        enabled: true,
        options: ConfigTree::new(),
    };
    let mut named = false;
    for (key, value) in table.iter() {
        match key {
            "name" => {
                let name = value.as_str().ok_or_else(|| {
                    invalid(format!("'name' must be a string, found {}", value.kind()))
                })?;
                declaration.name = name.to_string();
                named = true;
            }
            "enabled" => {
                declaration.enabled = value.as_bool().ok_or_else(|| {
                    invalid(format!("'enabled' must be a boolean, found {}", value.kind()))
                })?;
            }
            "options" if value.is_null() => {}
            "options" => {
                declaration.options = value.as_tree().cloned().ok_or_else(|| {
                    invalid(format!("'options' must be a table, found {}", value.kind()))
                })?;
            }
            other => return Err(invalid(format!("unexpected key '{other}'"))),
        }
    }

    if !named {
        return Err(invalid("missing 'name'".to_string()));
    }
    Ok(declaration)
}

impl Pipeline {
    pub fn steps(&self) -> &[PluginStep] {
        &self.steps
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(PluginStep::name).collect()
    }

    /// Names of entries dropped because they were disabled.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Replacement rules of the first `module-replacement` step, if any.
    pub fn module_replacements(&self) -> Option<&Arc<ModuleReplacementRegistry>> {
        self.steps.iter().find_map(|step| match step.kind() {
            StepKind::Builtin(BuiltinStep::ModuleReplacement(step)) => Some(step.registry()),
            _ => None,
        })
    }

    /// Run every step in order against `ctx`.
    ///
    /// # Errors
    ///
    /// The first failing step aborts the run with
    /// [`PipelineError::PluginStepFailure`]. Later steps do not run, and
    /// changes already made to `ctx` are kept.
    pub fn execute(&self, ctx: &mut BuildContext) -> Result<ExecutionReport> {
        let started = Instant::now();
        let mut report = ExecutionReport::default();

        for step in &self.steps {
            let span = info_span!("step", name = step.name());
            let _guard = span.enter();

            let step_started = Instant::now();
            step.execute(ctx)
                .map_err(|source| PipelineError::PluginStepFailure {
                    step: step.name().to_string(),
                    source,
                })?;
            let duration = step_started.elapsed();
            debug!(?duration, "step finished");

            report.steps.push(StepTiming {
                name: step.name().to_string(),
                duration,
            });
        }

        report.total = started.elapsed();
        info!(steps = report.steps.len(), total = ?report.total, "pipeline finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: serde_json::Value) -> ConfigTree {
        ConfigTree::from_json(value).unwrap()
    }

    #[test]
    fn string_and_table_entries_keep_order() {
        let pipeline = assemble(
            &config(json!({
                "pipeline": [
                    "define",
                    { "name": "minify", "options": { "beautify": false } },
                    { "name": "hash" }
                ]
            })),
            &StepRegistry::new(),
        )
        .unwrap();

        assert_eq!(pipeline.step_names(), ["define", "minify", "hash"]);
    }

    #[test]
    fn missing_section_is_empty() {
        let pipeline = assemble(&ConfigTree::new(), &StepRegistry::new()).unwrap();
        assert!(pipeline.is_empty());
    }

    #[test]
    fn section_must_be_a_list() {
        let err = assemble(&config(json!({"pipeline": "hash"})), &StepRegistry::new()).unwrap_err();
        assert!(matches!(err, PipelineError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn disabled_entries_are_recorded_not_assembled() {
        let pipeline = assemble(
            &config(json!({
                "pipeline": [{ "name": "dedupe", "enabled": false }, "hash"]
            })),
            &StepRegistry::new(),
        )
        .unwrap();

        assert_eq!(pipeline.step_names(), ["hash"]);
        assert_eq!(pipeline.skipped(), ["dedupe"]);
    }

    #[test]
    fn disabled_unknown_step_is_not_validated() {
        let pipeline = assemble(
            &config(json!({
                "pipeline": [{ "name": "not-a-step", "enabled": false }]
            })),
            &StepRegistry::new(),
        )
        .unwrap();
        assert!(pipeline.is_empty());
    }

    #[test]
    fn malformed_entries_report_their_position() {
        for entry in [json!(42), json!({"enabled": true}), json!({"name": "hash", "priority": 1})] {
            let err = assemble(
                &config(json!({ "pipeline": ["define", entry] })),
                &StepRegistry::new(),
            )
            .unwrap_err();
            assert!(
                matches!(err, PipelineError::InvalidDeclaration { index: 1, .. }),
                "unexpected error: {err}"
            );
        }
    }

    #[test]
    fn module_replacements_are_exposed() {
        let pipeline = assemble(
            &config(json!({
                "pipeline": [{
                    "name": "module-replacement",
                    "options": {
                        "rules": [{ "pattern": "angular2-hmr", "target": "config/empty.js" }]
                    }
                }]
            })),
            &StepRegistry::new(),
        )
        .unwrap();

        let registry = pipeline.module_replacements().unwrap();
        assert_eq!(registry.resolve("angular2-hmr"), Some("config/empty.js"));
    }
}
