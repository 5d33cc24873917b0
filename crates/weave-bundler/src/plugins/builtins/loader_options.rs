use serde::Deserialize;
use tracing::debug;
use weave_config::ConfigTree;

use crate::context::{BuildContext, LoaderOptions};
use crate::error::StepError;

/// Records loader settings for the bundler that consumes the build context.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderOptionsStep {
    pub minimize: bool,
    pub debug: bool,
    pub options: ConfigTree,
}

impl LoaderOptionsStep {
    pub const NAME: &'static str = "loader-options";

    pub(super) fn execute(&self, ctx: &mut BuildContext) -> Result<(), StepError> {
        debug!(minimize = self.minimize, debug = self.debug, "loader options recorded");
        ctx.loader_options = Some(LoaderOptions {
            minimize: self.minimize,
            debug: self.debug,
            options: self.options.clone(),
        });
        Ok(())
    }
}
