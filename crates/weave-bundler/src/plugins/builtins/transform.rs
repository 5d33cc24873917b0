//! Steps that rewrite emitted scripts through the host's content transformer.

use serde::Deserialize;
use tracing::debug;
use weave_config::ConfigTree;

use super::BuiltinStepError;
use crate::context::{BuildContext, TransformRequest};
use crate::error::{Result, StepError};

/// Wraps eligible function expressions for faster startup parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizeJsStep {
    pub source_map: bool,
    #[serde(skip)]
    options: ConfigTree,
}

impl OptimizeJsStep {
    pub const NAME: &'static str = "optimize-js";

    pub(super) fn from_options(options: &ConfigTree) -> Result<Self> {
        let mut step: Self = super::parse_options(Self::NAME, options)?;
        step.options = options.clone();
        Ok(step)
    }

    pub(super) fn execute(&self, ctx: &mut BuildContext) -> std::result::Result<(), StepError> {
        transform_scripts(ctx, Self::NAME, &self.options)
    }
}

/// Minifies scripts. Options are passed to the transformer untouched.
#[derive(Debug, Clone, Default)]
pub struct MinifyStep {
    pub options: ConfigTree,
}

impl MinifyStep {
    pub const NAME: &'static str = "minify";

    pub(super) fn from_options(options: &ConfigTree) -> Self {
        Self {
            options: options.clone(),
        }
    }

    pub(super) fn execute(&self, ctx: &mut BuildContext) -> std::result::Result<(), StepError> {
        transform_scripts(ctx, Self::NAME, &self.options)
    }
}

fn transform_scripts(
    ctx: &mut BuildContext,
    step: &'static str,
    options: &ConfigTree,
) -> std::result::Result<(), StepError> {
    if !ctx.artifacts.iter().any(|a| a.kind.is_script()) {
        debug!(step, "no scripts to transform");
        return Ok(());
    }

    let transformer = ctx
        .transformer()
        .cloned()
        .ok_or(BuiltinStepError::MissingTransformer { step })?;

    let mut transformed = 0usize;
    for artifact in ctx.artifacts.iter_mut().filter(|a| a.kind.is_script()) {
        let request = TransformRequest {
            step,
            artifact: &artifact.logical_name,
            content: &artifact.content,
            options,
        };
        let output = transformer.transform(&request)?;
        artifact.content = output;
        transformed += 1;
    }

    debug!(step, transformed, "scripts transformed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::{Artifact, ContentTransformer};
    use weave_config::Metadata;

    #[derive(Debug)]
    struct Uppercase;

    impl ContentTransformer for Uppercase {
        fn transform(
            &self,
            request: &TransformRequest<'_>,
        ) -> std::result::Result<Vec<u8>, StepError> {
            assert_eq!(request.step, "minify");
            assert_eq!(request.options.get_bool("beautify"), Some(false));
            Ok(request.content.to_ascii_uppercase())
        }
    }

    fn context() -> BuildContext {
        BuildContext::new(ConfigTree::new(), Arc::new(Metadata::default()))
            .with_artifact(Artifact::entry("main", "var a = 1;"))
            .with_artifact(Artifact::new("logo", crate::context::ArtifactKind::Asset, "png"))
    }

    #[test]
    fn minify_rewrites_scripts_only() {
        let mut ctx = context().with_transformer(Arc::new(Uppercase));
        let step = MinifyStep::from_options(&ConfigTree::new().with("beautify", false));
        step.execute(&mut ctx).unwrap();

        assert_eq!(ctx.artifact("main").unwrap().content, b"VAR A = 1;");
        assert_eq!(ctx.artifact("logo").unwrap().content, b"png");
    }

    #[test]
    fn missing_transformer_fails() {
        let mut ctx = context();
        let err = MinifyStep::default().execute(&mut ctx).unwrap_err();
        assert!(err.to_string().contains("content transformer"));
    }

    #[test]
    fn nothing_to_do_without_scripts() {
        let mut ctx = BuildContext::new(ConfigTree::new(), Arc::new(Metadata::default()));
        OptimizeJsStep::default().execute(&mut ctx).unwrap();
    }

    #[test]
    fn optimize_js_validates_options() {
        let step =
            OptimizeJsStep::from_options(&ConfigTree::new().with("source_map", true)).unwrap();
        assert!(step.source_map);
        assert!(OptimizeJsStep::from_options(&ConfigTree::new().with("sourceMap", true)).is_err());
    }
}
