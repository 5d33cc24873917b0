use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::debug;

use crate::context::BuildContext;
use crate::error::StepError;

/// Collapses modules with identical content into their first occurrence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DedupeStep {}

impl DedupeStep {
    pub const NAME: &'static str = "dedupe";

    pub(super) fn execute(&self, ctx: &mut BuildContext) -> Result<(), StepError> {
        let mut first_by_content: FxHashMap<&[u8], &str> = FxHashMap::default();
        let mut redirects: FxHashMap<String, String> = FxHashMap::default();

        for module in ctx.graph.iter() {
            match first_by_content.get(module.content.as_slice()) {
                Some(canonical) => {
                    redirects.insert(module.id.clone(), canonical.to_string());
                }
                None => {
                    first_by_content.insert(&module.content, &module.id);
                }
            }
        }
        drop(first_by_content);

        for duplicate in redirects.keys() {
            ctx.graph.remove(duplicate);
        }
        for module in ctx.graph.iter_mut() {
            for request in &mut module.dependencies {
                if let Some(canonical) = redirects.get(request.as_str()) {
                    *request = canonical.clone();
                }
            }
        }

        debug!(removed = redirects.len(), "duplicate modules collapsed");
        Ok(())
    }
}
