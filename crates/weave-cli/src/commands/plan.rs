//! `weave plan`: list the steps the build pipeline will run.

use std::fmt::Write as _;

use serde_json::json;
use weave_bundler::{Pipeline, StepRegistry, assemble};
use weave_config::EffectiveConfig;

use crate::cli::PlanArgs;
use crate::error::Result;
use crate::options::Options;
use crate::ui;

pub fn execute(args: PlanArgs) -> Result<()> {
    let options = Options::load(&args.target, None)?;
    let config = super::resolve(&options)?;
    let pipeline = assemble(config.tree(), &StepRegistry::new())?;

    println!("{}", render(&config, &pipeline, args.json)?);
    if !pipeline.skipped().is_empty() {
        ui::warning(&format!("disabled steps skipped: {}", pipeline.skipped().join(", ")));
    }
    if !args.json {
        ui::success(&format!("{} steps ready for {}", pipeline.len(), config.environment()));
    }
    Ok(())
}

pub fn render(config: &EffectiveConfig, pipeline: &Pipeline, as_json: bool) -> Result<String> {
    if as_json {
        let replacements: Vec<_> = pipeline
            .module_replacements()
            .map(|registry| {
                registry
                    .rules()
                    .iter()
                    .map(|rule| json!({ "pattern": rule.pattern(), "target": rule.target() }))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let plan = json!({
            "environment": config.environment(),
            "steps": pipeline.step_names(),
            "skipped": pipeline.skipped(),
            "replacements": replacements,
        });
        return Ok(serde_json::to_string_pretty(&plan)?);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} pipeline ({} steps):", config.environment(), pipeline.len());
    for (index, name) in pipeline.step_names().iter().enumerate() {
        let _ = writeln!(out, "  {}. {name}", index + 1);
    }
    for name in pipeline.skipped() {
        let _ = writeln!(out, "  - {name} (disabled)");
    }
    Ok(out.trim_end().to_string())
}
