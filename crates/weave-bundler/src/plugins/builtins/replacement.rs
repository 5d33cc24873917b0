use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;
use weave_config::ConfigTree;

use crate::context::BuildContext;
use crate::error::{Result, StepError};
use crate::replacement::{ModuleReplacementRegistry, ReplacementRuleSpec};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ReplacementOptions {
    rules: Vec<ReplacementRuleSpec>,
}

/// Rewrites dependency requests that match a replacement rule.
#[derive(Debug, Clone, Default)]
pub struct ModuleReplacementStep {
    registry: Arc<ModuleReplacementRegistry>,
}

impl ModuleReplacementStep {
    pub const NAME: &'static str = "module-replacement";

    pub fn new(registry: Arc<ModuleReplacementRegistry>) -> Self {
        Self { registry }
    }

    pub(super) fn from_options(options: &ConfigTree) -> Result<Self> {
        let options: ReplacementOptions = super::parse_options(Self::NAME, options)?;
        let registry = ModuleReplacementRegistry::from_specs(&options.rules)?;
        Ok(Self::new(Arc::new(registry)))
    }

    pub fn registry(&self) -> &Arc<ModuleReplacementRegistry> {
        &self.registry
    }

    pub(super) fn execute(&self, ctx: &mut BuildContext) -> std::result::Result<(), StepError> {
        let mut replaced = 0usize;
        for module in ctx.graph.iter_mut() {
            for request in &mut module.dependencies {
                if let Some(target) = self.registry.resolve(request) {
                    *request = target.to_string();
                    replaced += 1;
                }
            }
        }
        debug!(rules = self.registry.len(), replaced, "module requests rewritten");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Module;
    use crate::error::PipelineError;
    use serde_json::json;
    use weave_config::Metadata;

    fn options(value: serde_json::Value) -> ConfigTree {
        ConfigTree::from_json(value).unwrap()
    }

    #[test]
    fn rewrites_matching_requests_in_order() {
        let step = ModuleReplacementStep::from_options(&options(json!({
            "rules": [
                { "pattern": "angular2-hmr", "target": "config/empty.js" },
                { "pattern": "hmr", "target": "config/never.js" }
            ]
        })))
        .unwrap();

        let module = Module::new("src/main.ts", "")
            .with_dependency("angular2-hmr")
            .with_dependency("@angular/core");
        let mut ctx = BuildContext::new(ConfigTree::new(), Arc::new(Metadata::default()))
            .with_module(module);
        step.execute(&mut ctx).unwrap();

        let deps = &ctx.graph.get("src/main.ts").unwrap().dependencies;
        assert_eq!(deps, &["config/empty.js", "@angular/core"]);
    }

    #[test]
    fn invalid_rule_pattern_fails_assembly() {
        let err = ModuleReplacementStep::from_options(&options(json!({
            "rules": [{ "pattern": "[", "target": "x.js" }]
        })))
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidReplacementPattern { .. }));
    }
}
