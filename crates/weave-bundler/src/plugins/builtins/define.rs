use serde::Deserialize;
use tracing::debug;
use weave_config::ConfigTree;
use weave_config::metadata::{API_URL, ENV, HMR};

use crate::context::BuildContext;
use crate::error::StepError;

/// Injects compile-time constants derived from the build metadata.
///
/// Strings become JSON string literals and booleans stay bare, so the
/// bundler can substitute them directly into source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefineStep {
    /// Additional constants; values are emitted as JSON.
    pub extra: ConfigTree,
}

impl DefineStep {
    pub const NAME: &'static str = "define";

    pub(super) fn execute(&self, ctx: &mut BuildContext) -> Result<(), StepError> {
        let metadata = ctx.metadata();
        let env = serde_json::to_string(metadata.env())?;
        let hmr = metadata.hmr().to_string();
        let api_url = serde_json::to_string(metadata.api_url())?;

        let constants = [
            (ENV.to_string(), env.clone()),
            (HMR.to_string(), hmr.clone()),
            (API_URL.to_string(), api_url),
            (format!("process.env.{ENV}"), env.clone()),
            ("process.env.NODE_ENV".to_string(), env),
            (format!("process.env.{HMR}"), hmr),
        ];
        ctx.defines.extend(constants);

        for (key, value) in self.extra.iter() {
            let expression = serde_json::to_string(&value.to_json())?;
            ctx.defines.insert(key.to_string(), expression);
        }

        debug!(count = ctx.defines.len(), "define constants recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use weave_config::resolve_metadata;

    fn context(env: &[(&str, &str)]) -> BuildContext {
        let vars: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let metadata = resolve_metadata(&vars, &ConfigTree::new()).unwrap();
        BuildContext::new(ConfigTree::new(), Arc::new(metadata))
    }

    #[test]
    fn metadata_constants_are_quoted() {
        let mut ctx = context(&[("ENV", "production"), ("API_URL", "https://api.test")]);
        DefineStep::default().execute(&mut ctx).unwrap();

        assert_eq!(ctx.defines["ENV"], "\"production\"");
        assert_eq!(ctx.defines["process.env.NODE_ENV"], "\"production\"");
        assert_eq!(ctx.defines["HMR"], "false");
        assert_eq!(ctx.defines["process.env.HMR"], "false");
        assert_eq!(ctx.defines["API_URL"], "\"https://api.test\"");
    }

    #[test]
    fn extra_constants_follow_metadata() {
        let mut ctx = context(&[]);
        let step = DefineStep {
            extra: ConfigTree::new().with("VERSION", "1.2.0").with("DEBUG", true),
        };
        step.execute(&mut ctx).unwrap();

        assert_eq!(ctx.defines["VERSION"], "\"1.2.0\"");
        assert_eq!(ctx.defines["DEBUG"], "true");
        assert_eq!(ctx.defines.keys().last().map(String::as_str), Some("DEBUG"));
    }
}
