//! Module replacement rules.
//!
//! Each rule pairs a regular expression with a replacement target. Requests
//! are tested against the rules in registration order and the first match
//! wins. The registry is immutable once built and can be shared between
//! concurrent builds.

use regex::Regex;
use serde::Deserialize;
use tracing::trace;

use crate::error::{PipelineError, Result};

/// A single `pattern -> target` rule.
#[derive(Debug, Clone)]
pub struct ReplacementRule {
    pattern: Regex,
    target: String,
}

impl ReplacementRule {
    pub fn new(pattern: &str, target: impl Into<String>) -> Result<Self> {
        let compiled =
            Regex::new(pattern).map_err(|source| PipelineError::InvalidReplacementPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            pattern: compiled,
            target: target.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Unanchored search: the pattern may match anywhere in the request.
    pub fn matches(&self, request: &str) -> bool {
        self.pattern.is_match(request)
    }
}

/// Rule as written in configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplacementRuleSpec {
    pub pattern: String,
    pub target: String,
}

/// Ordered set of replacement rules consulted during module resolution.
#[derive(Debug, Clone, Default)]
pub struct ModuleReplacementRegistry {
    rules: Vec<ReplacementRule>,
}

impl ModuleReplacementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from rule specs, keeping their order.
    pub fn from_specs<'a, I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ReplacementRuleSpec>,
    {
        let mut registry = Self::new();
        for spec in specs {
            registry.register(&spec.pattern, spec.target.as_str())?;
        }
        Ok(registry)
    }

    /// Append a rule. Rules registered earlier take precedence.
    pub fn register(&mut self, pattern: &str, target: impl Into<String>) -> Result<()> {
        self.rules.push(ReplacementRule::new(pattern, target)?);
        Ok(())
    }

    /// Target of the first rule matching `request`, or `None` to fall back
    /// to normal resolution.
    pub fn resolve(&self, request: &str) -> Option<&str> {
        let rule = self.rules.iter().find(|rule| rule.matches(request))?;
        trace!(request, pattern = rule.pattern(), target = rule.target(), "module replaced");
        Some(rule.target())
    }

    pub fn rules(&self) -> &[ReplacementRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_registered_match_wins() {
        let mut registry = ModuleReplacementRegistry::new();
        registry.register("hmr", "config/first.js").unwrap();
        registry.register("angular2-hmr", "config/second.js").unwrap();

        assert_eq!(registry.resolve("angular2-hmr"), Some("config/first.js"));
    }

    #[test]
    fn no_match_defers_to_normal_resolution() {
        let mut registry = ModuleReplacementRegistry::new();
        registry.register("angular2-hmr", "config/empty.js").unwrap();
        assert_eq!(registry.resolve("@angular/core"), None);
        assert_eq!(ModuleReplacementRegistry::new().resolve("anything"), None);
    }

    #[test]
    fn path_separators_match_either_style() {
        let mut registry = ModuleReplacementRegistry::new();
        registry
            .register(r"zone\.js(\\|/)dist(\\|/)long-stack-trace-zone", "config/empty.js")
            .unwrap();

        assert_eq!(
            registry.resolve("zone.js/dist/long-stack-trace-zone"),
            Some("config/empty.js")
        );
        assert_eq!(
            registry.resolve(r"node_modules\zone.js\dist\long-stack-trace-zone.js"),
            Some("config/empty.js")
        );
        assert_eq!(registry.resolve("zone.js/dist/zone"), None);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let mut registry = ModuleReplacementRegistry::new();
        let err = registry.register("(unclosed", "x.js").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidReplacementPattern { ref pattern, .. } if pattern == "(unclosed"
        ));
        assert!(registry.is_empty());
    }
}
