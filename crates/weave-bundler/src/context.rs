//! Per-build mutable state shared by every pipeline step.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use weave_config::{ConfigTree, EffectiveConfig, Metadata};

use crate::error::StepError;

/// A module in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Stable identifier, usually the resolved path.
    pub id: String,
    pub content: Vec<u8>,
    /// Requests as written in the module's import statements.
    pub dependencies: Vec<String>,
    /// Short id assigned by `hashed-module-ids`.
    pub assigned_id: Option<String>,
}

impl Module {
    pub fn new(id: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            dependencies: Vec::new(),
            assigned_id: None,
        }
    }

    pub fn with_dependency(mut self, request: impl Into<String>) -> Self {
        self.dependencies.push(request.into());
        self
    }
}

/// Modules keyed by id, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: IndexMap<String, Module>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a module, replacing any module with the same id.
    pub fn add(&mut self, module: Module) {
        self.modules.insert(module.id.clone(), module);
    }

    pub fn get(&self, id: &str) -> Option<&Module> {
        self.modules.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Module> {
        self.modules.get_mut(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Module> {
        self.modules.shift_remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Module> {
        self.modules.values_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Entry,
    Chunk,
    Asset,
}

impl ArtifactKind {
    /// Entries and chunks hold JavaScript; assets are opaque.
    pub fn is_script(self) -> bool {
        matches!(self, Self::Entry | Self::Chunk)
    }
}

/// An emitted output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub logical_name: String,
    pub kind: ArtifactKind,
    pub content: Vec<u8>,
    /// Final file name, set by the `hash` step.
    pub file_name: Option<String>,
    pub source_map: Option<Vec<u8>>,
    pub source_map_file_name: Option<String>,
}

impl Artifact {
    pub fn new(
        logical_name: impl Into<String>,
        kind: ArtifactKind,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            logical_name: logical_name.into(),
            kind,
            content: content.into(),
            file_name: None,
            source_map: None,
            source_map_file_name: None,
        }
    }

    pub fn entry(logical_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self::new(logical_name, ArtifactKind::Entry, content)
    }

    pub fn chunk(logical_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self::new(logical_name, ArtifactKind::Chunk, content)
    }

    pub fn with_source_map(mut self, source_map: impl Into<Vec<u8>>) -> Self {
        self.source_map = Some(source_map.into());
        self
    }
}

/// Input handed to a [`ContentTransformer`].
#[derive(Debug)]
pub struct TransformRequest<'a> {
    /// Name of the step asking for the transform, e.g. `minify`.
    pub step: &'a str,
    pub artifact: &'a str,
    pub content: &'a [u8],
    pub options: &'a ConfigTree,
}

/// Host hook performing JavaScript rewrites (minification, IIFE wrapping).
///
/// The pipeline never parses JavaScript itself; `minify` and `optimize-js`
/// delegate here.
pub trait ContentTransformer: Send + Sync {
    fn transform(&self, request: &TransformRequest<'_>) -> Result<Vec<u8>, StepError>;
}

/// Loader settings recorded by the `loader-options` step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoaderOptions {
    pub minimize: bool,
    pub debug: bool,
    pub options: ConfigTree,
}

/// State for a single build. Never shared between builds.
pub struct BuildContext {
    pub graph: ModuleGraph,
    pub artifacts: Vec<Artifact>,
    /// Compile-time constants, identifier to JavaScript expression.
    pub defines: IndexMap<String, String>,
    pub loader_options: Option<LoaderOptions>,
    config: ConfigTree,
    metadata: Arc<Metadata>,
    transformer: Option<Arc<dyn ContentTransformer>>,
}

impl BuildContext {
    pub fn new(config: ConfigTree, metadata: Arc<Metadata>) -> Self {
        Self {
            graph: ModuleGraph::new(),
            artifacts: Vec::new(),
            defines: IndexMap::new(),
            loader_options: None,
            config,
            metadata,
            transformer: None,
        }
    }

    /// Context for a build driven by `config`. Metadata is shared, not copied.
    pub fn for_config(config: &EffectiveConfig) -> Self {
        Self::new(config.tree().clone(), Arc::clone(config.metadata()))
    }

    pub fn with_transformer(mut self, transformer: Arc<dyn ContentTransformer>) -> Self {
        self.transformer = Some(transformer);
        self
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.graph.add(module);
        self
    }

    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// The effective configuration this build runs under.
    pub fn config(&self) -> &ConfigTree {
        &self.config
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn transformer(&self) -> Option<&Arc<dyn ContentTransformer>> {
        self.transformer.as_ref()
    }

    pub fn artifact(&self, logical_name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.logical_name == logical_name)
    }
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("modules", &self.graph.len())
            .field("artifacts", &self.artifacts.len())
            .field("defines", &self.defines)
            .field("loader_options", &self.loader_options)
            .field("metadata", &self.metadata)
            .field("transformer", &self.transformer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_keeps_insertion_order_after_removal() {
        let mut graph = ModuleGraph::new();
        graph.add(Module::new("a", "1"));
        graph.add(Module::new("b", "2"));
        graph.add(Module::new("c", "3"));
        graph.remove("b");

        assert_eq!(graph.ids().collect::<Vec<_>>(), ["a", "c"]);
    }

    #[test]
    fn only_entries_and_chunks_are_scripts() {
        assert!(ArtifactKind::Entry.is_script());
        assert!(ArtifactKind::Chunk.is_script());
        assert!(!ArtifactKind::Asset.is_script());
    }

    #[test]
    fn context_shares_metadata() {
        let metadata = Arc::new(Metadata::default());
        let ctx = BuildContext::new(ConfigTree::new(), Arc::clone(&metadata));
        assert_eq!(Arc::strong_count(&metadata), 2);
        assert_eq!(ctx.metadata().env(), "development");
    }
}
