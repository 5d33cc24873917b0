use serde::Deserialize;
use tracing::{debug, trace};

use crate::context::{ArtifactKind, BuildContext};
use crate::error::StepError;
use crate::output::{DEFAULT_HASH_LENGTH, OutputNamer};

const DEFAULT_FILENAME: &str = "[name].[chunkhash].bundle.js";
const DEFAULT_CHUNK_FILENAME: &str = "[name].[chunkhash].chunk.js";
const DEFAULT_SOURCE_MAP_FILENAME: &str = "[file].map";

/// Gives every artifact its final, content-addressed file name.
///
/// Templates not set on the step come from the effective `output` section
/// and then from the built-in defaults. Assets keep their logical name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HashStep {
    pub filename: Option<String>,
    pub chunk_filename: Option<String>,
    pub source_map_filename: Option<String>,
    pub hash_length: Option<usize>,
}

impl HashStep {
    pub const NAME: &'static str = "hash";

    pub(super) fn execute(&self, ctx: &mut BuildContext) -> Result<(), StepError> {
        let config = ctx.config();
        let template = |own: &Option<String>, key: &str, fallback: &str| {
            own.clone()
                .or_else(|| config.get_str(key).map(str::to_string))
                .unwrap_or_else(|| fallback.to_string())
        };
        let filename = template(&self.filename, "output.filename", DEFAULT_FILENAME);
        let chunk_filename = template(
            &self.chunk_filename,
            "output.chunkFilename",
            DEFAULT_CHUNK_FILENAME,
        );
        let source_map_filename = template(
            &self.source_map_filename,
            "output.sourceMapFilename",
            DEFAULT_SOURCE_MAP_FILENAME,
        );

        let namer = OutputNamer::with_hash_length(self.hash_length.unwrap_or(DEFAULT_HASH_LENGTH));

        for artifact in &mut ctx.artifacts {
            let file_name = match artifact.kind {
                ArtifactKind::Entry => {
                    namer.name(&artifact.logical_name, &artifact.content, &filename)
                }
                ArtifactKind::Chunk => {
                    namer.name(&artifact.logical_name, &artifact.content, &chunk_filename)
                }
                ArtifactKind::Asset => artifact.logical_name.clone(),
            };
            if artifact.source_map.is_some() {
                artifact.source_map_file_name =
                    Some(namer.source_map_name(&file_name, &source_map_filename));
            }
            trace!(artifact = %artifact.logical_name, file = %file_name, "artifact named");
            artifact.file_name = Some(file_name);
        }

        debug!(artifacts = ctx.artifacts.len(), template = %filename, "artifacts named");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::Artifact;
    use crate::output::content_hash;
    use weave_config::{ConfigTree, Metadata};

    fn context(config: ConfigTree) -> BuildContext {
        BuildContext::new(config, Arc::new(Metadata::default()))
            .with_artifact(Artifact::entry("main", "main();").with_source_map("{}"))
            .with_artifact(Artifact::chunk("0", "chunk();"))
            .with_artifact(Artifact::new("logo.png", ArtifactKind::Asset, "png"))
    }

    #[test]
    fn built_in_templates_apply_without_config() {
        let mut ctx = context(ConfigTree::new());
        HashStep::default().execute(&mut ctx).unwrap();

        let main_hash = &content_hash(b"main();")[..DEFAULT_HASH_LENGTH];
        let main = ctx.artifact("main").unwrap();
        assert_eq!(main.file_name.as_deref(), Some(format!("main.{main_hash}.bundle.js").as_str()));
        assert_eq!(
            main.source_map_file_name.as_deref(),
            Some(format!("main.{main_hash}.bundle.js.map").as_str())
        );

        let chunk = ctx.artifact("0").unwrap();
        assert!(chunk.file_name.as_deref().unwrap().ends_with(".chunk.js"));
        assert!(chunk.source_map_file_name.is_none());

        assert_eq!(ctx.artifact("logo.png").unwrap().file_name.as_deref(), Some("logo.png"));
    }

    #[test]
    fn output_section_then_step_options() {
        let config = ConfigTree::new().with(
            "output",
            ConfigTree::new().with("filename", "[name].[chunkhash:8].js"),
        );

        let mut ctx = context(config.clone());
        HashStep::default().execute(&mut ctx).unwrap();
        let name = ctx.artifact("main").unwrap().file_name.clone().unwrap();
        assert_eq!(name.len(), "main..js".len() + 8);

        let mut ctx = context(config);
        let step = HashStep {
            filename: Some("[name].js".into()),
            ..HashStep::default()
        };
        step.execute(&mut ctx).unwrap();
        assert_eq!(ctx.artifact("main").unwrap().file_name.as_deref(), Some("main.js"));
    }
}
