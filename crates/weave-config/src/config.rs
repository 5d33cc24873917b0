//! Layered configuration and the effective configuration it produces.
//!
//! Layer order: preset base, file base, preset profile, file profile, and
//! finally the resolved metadata.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::discovery::ConfigFile;
use crate::error::{ConfigError, Result};
use crate::merge::{merge, merge_all};
use crate::metadata::{ENV, METADATA_SECTION, Metadata, resolve_metadata};
use crate::presets;
use crate::tree::{ConfigTree, ConfigValue};

/// Section mapping module identifiers to ambient globals.
pub const EXTERNALS_SECTION: &str = "externals";

/// Base and override layers for one environment.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    environment: String,
    base: Vec<ConfigTree>,
    overrides: Vec<ConfigTree>,
}

impl LayeredConfig {
    /// Start from the built-in presets for `environment`.
    pub fn new(environment: impl Into<String>) -> Self {
        let environment = environment.into();
        let overrides = presets::profile(&environment).into_iter().collect();
        Self {
            environment,
            base: vec![presets::base()],
            overrides,
        }
    }

    /// Start from nothing; every layer is supplied by the caller.
    pub fn empty(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            base: Vec::new(),
            overrides: Vec::new(),
        }
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn with_base(mut self, layer: ConfigTree) -> Self {
        self.base.push(layer);
        self
    }

    pub fn with_override(mut self, layer: ConfigTree) -> Self {
        self.overrides.push(layer);
        self
    }

    /// Add a config file's base layer and its profile for this environment.
    pub fn with_file(mut self, file: &ConfigFile) -> Self {
        self.base.push(file.base.clone());
        if let Some(profile) = file.profile(&self.environment) {
            self.overrides.push(profile.clone());
        }
        self
    }

    /// Merge every layer, resolve metadata and merge it in last.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownProfile`] when no layer overrides this environment
    /// - [`ConfigError::TypeConflict`] from merging
    /// - [`ConfigError::MetadataValidation`] from metadata resolution
    pub fn resolve<S: BuildHasher>(
        &self,
        env_vars: &HashMap<String, String, S>,
    ) -> Result<EffectiveConfig> {
        if self.overrides.is_empty() {
            return Err(ConfigError::UnknownProfile(self.environment.clone()));
        }

        let merged = merge_all(self.base.iter().chain(&self.overrides))?;
        debug!(
            environment = %self.environment,
            layers = self.base.len() + self.overrides.len(),
            "merged configuration layers"
        );

        let mut host_defaults = merged
            .get_tree(METADATA_SECTION)
            .cloned()
            .unwrap_or_default();
        if !host_defaults.contains_key(ENV) {
            host_defaults.insert(ENV, self.environment.as_str());
        }

        let metadata = resolve_metadata(env_vars, &host_defaults)?;
        let tree = merge(&merged, &metadata.to_layer())?;

        info!(
            environment = %self.environment,
            env = metadata.env(),
            "effective configuration ready"
        );
        Ok(EffectiveConfig {
            environment: self.environment.clone(),
            tree,
            metadata: Arc::new(metadata),
        })
    }
}

/// The fully merged configuration driving one build.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    environment: String,
    tree: ConfigTree,
    metadata: Arc<Metadata>,
}

impl EffectiveConfig {
    pub fn new(environment: impl Into<String>, tree: ConfigTree, metadata: Metadata) -> Self {
        Self {
            environment: environment.into(),
            tree,
            metadata: Arc::new(metadata),
        }
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    pub fn into_tree(self) -> ConfigTree {
        self.tree
    }

    /// Shared handle to the metadata; safe to hand to concurrent builds.
    pub fn metadata(&self) -> &Arc<Metadata> {
        &self.metadata
    }

    /// Modules the bundler must leave out and reference as globals.
    pub fn externals(&self) -> Result<IndexMap<String, String>> {
        let Some(section) = self.tree.get_path(EXTERNALS_SECTION) else {
            return Ok(IndexMap::new());
        };
        let ConfigValue::Tree(section) = section else {
            return Err(ConfigError::invalid(
                EXTERNALS_SECTION,
                format!("expected a table, found {}", section.kind()),
            ));
        };

        section
            .iter()
            .map(|(module, global)| match global.as_str() {
                Some(global) => Ok((module.to_string(), global.to_string())),
                None => Err(ConfigError::invalid(
                    format!("{EXTERNALS_SECTION}.{module}"),
                    "external globals must be strings",
                )),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> ConfigTree {
        ConfigTree::from_json(value).unwrap()
    }

    #[test]
    fn production_presets_resolve() {
        let config = LayeredConfig::new("production")
            .resolve(&HashMap::<String, String>::new())
            .unwrap();

        assert_eq!(config.metadata().env(), "production");
        assert_eq!(
            config.tree().get_str("output.filename"),
            Some("[name].[chunkhash].bundle.js")
        );
        assert_eq!(config.tree().get_str("metadata.title"), Some("weave app"));
        assert_eq!(config.externals().unwrap()["webtorrent"], "WebTorrent");
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let err = LayeredConfig::new("staging")
            .resolve(&HashMap::<String, String>::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile(name) if name == "staging"));
    }

    #[test]
    fn file_profile_names_environment_by_default() {
        let file = ConfigFile::from_tree(
            "weave.json",
            tree(json!({"profiles": {"staging": {"devtool": "eval"}}})),
        )
        .unwrap();

        let config = LayeredConfig::new("staging")
            .with_file(&file)
            .resolve(&HashMap::<String, String>::new())
            .unwrap();
        assert_eq!(config.metadata().env(), "staging");
        assert_eq!(config.tree().get_str("devtool"), Some("eval"));
    }

    #[test]
    fn non_string_external_is_rejected() {
        let config = EffectiveConfig::new(
            "production",
            tree(json!({"externals": {"webtorrent": 1}})),
            Metadata::default(),
        );
        assert!(config.externals().is_err());
    }
}
