use rustc_hash::FxHashSet;
use serde::Deserialize;
use tracing::debug;

use super::BuiltinStepError;
use crate::context::BuildContext;
use crate::error::StepError;
use crate::output::content_hash;

/// Assigns every module a short id derived from the hash of its identifier,
/// so ids survive unrelated changes to the graph.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HashedModuleIdsStep {
    pub hash_digest_length: usize,
}

impl Default for HashedModuleIdsStep {
    fn default() -> Self {
        Self {
            hash_digest_length: 4,
        }
    }
}

impl HashedModuleIdsStep {
    pub const NAME: &'static str = "hashed-module-ids";

    pub(super) fn execute(&self, ctx: &mut BuildContext) -> Result<(), StepError> {
        let start = self.hash_digest_length.clamp(1, 64);
        let mut used = FxHashSet::default();

        for module in ctx.graph.iter_mut() {
            let digest = content_hash(module.id.as_bytes());
            // Collisions extend the prefix until it is unique.
            let id = (start..=digest.len())
                .map(|len| &digest[..len])
                .find(|candidate| !used.contains(*candidate))
                .ok_or_else(|| BuiltinStepError::ModuleIdCollision {
                    module: module.id.clone(),
                })?
                .to_string();

            used.insert(id.clone());
            module.assigned_id = Some(id);
        }

        debug!(modules = used.len(), "module ids assigned");
        Ok(())
    }
}
