//! Deep merge of configuration trees.
//!
//! Trees merge key by key. Everything else (scalars and sequences) is replaced
//! wholesale by the overlay, so a profile's `pipeline` never interleaves with
//! the base pipeline. A `null` is a scalar like any other, so it replaces
//! scalars and sequences but conflicts with a tree.

use tracing::trace;

use crate::error::{ConfigError, Result};
use crate::tree::{ConfigTree, ConfigValue};

/// Merge `overlay` on top of `base`, returning the combined tree.
///
/// # Errors
///
/// Returns [`ConfigError::TypeConflict`] when one side holds a tree and the
/// other a scalar, sequence or `null` at the same key path.
///
/// # Example
///
/// ```
/// use weave_config::{merge, ConfigTree};
/// use serde_json::json;
///
/// let base = json!({"output": {"path": "dist"}, "pipeline": ["hash"]});
/// let base = ConfigTree::from_json(base).unwrap();
/// let overlay = ConfigTree::from_json(json!({"pipeline": ["hash", "minify"]})).unwrap();
///
/// let merged = merge(&base, &overlay).unwrap();
/// assert_eq!(merged.get_str("output.path"), Some("dist"));
/// assert_eq!(merged.get_sequence("pipeline").unwrap().len(), 2);
/// ```
pub fn merge(base: &ConfigTree, overlay: &ConfigTree) -> Result<ConfigTree> {
    let mut merged = base.clone();
    let mut path = Vec::new();
    merge_into(&mut merged, overlay, &mut path)?;
    Ok(merged)
}

/// Fold several layers left to right: `merge(merge(a, b), c)`.
pub fn merge_all<'a, I>(layers: I) -> Result<ConfigTree>
where
    I: IntoIterator<Item = &'a ConfigTree>,
{
    let mut merged = ConfigTree::new();
    let mut path = Vec::new();
    for (index, layer) in layers.into_iter().enumerate() {
        trace!(layer = index, keys = layer.len(), "merging config layer");
        merge_into(&mut merged, layer, &mut path)?;
    }
    Ok(merged)
}

fn merge_into<'a>(
    target: &mut ConfigTree,
    overlay: &'a ConfigTree,
    path: &mut Vec<&'a str>,
) -> Result<()> {
    for (key, incoming) in overlay {
        if !target.contains_key(key) {
            target.insert(key.clone(), incoming.clone());
            continue;
        }

        path.push(key.as_str());
        if let Some(existing) = target.get_mut(key) {
            match (existing, incoming) {
                (ConfigValue::Tree(existing), ConfigValue::Tree(incoming)) => {
                    merge_into(existing, incoming, path)?;
                }
                (existing, incoming) if existing.is_tree() != incoming.is_tree() => {
                    return Err(ConfigError::TypeConflict {
                        path: path.join("."),
                        base_kind: existing.kind(),
                        overlay_kind: incoming.kind(),
                    });
                }
                (existing, incoming) => *existing = incoming.clone(),
            }
        }
        path.pop();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> ConfigTree {
        ConfigTree::from_json(value).unwrap()
    }

    #[test]
    fn overlay_scalar_replaces_base() {
        let merged = merge(
            &tree(json!({"devtool": "eval"})),
            &tree(json!({"devtool": "source-map"})),
        )
        .unwrap();
        assert_eq!(merged.get_str("devtool"), Some("source-map"));
    }

    #[test]
    fn conflict_reports_full_path() {
        let base = tree(json!({"output": {"path": {"root": "dist"}}}));
        let overlay = tree(json!({"output": {"path": "dist"}}));

        let err = merge(&base, &overlay).unwrap_err();
        match err {
            ConfigError::TypeConflict {
                path,
                base_kind,
                overlay_kind,
            } => {
                assert_eq!(path, "output.path");
                assert_eq!(base_kind, "tree");
                assert_eq!(overlay_kind, "scalar");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sequence_against_tree_conflicts() {
        let base = tree(json!({"pipeline": ["hash"]}));
        let overlay = tree(json!({"pipeline": {"hash": true}}));
        assert!(matches!(
            merge(&base, &overlay),
            Err(ConfigError::TypeConflict { .. })
        ));
    }

    #[test]
    fn null_against_tree_conflicts() {
        let base = tree(json!({"output": {"path": "dist", "filename": "[name].js"}}));
        let cleared = tree(json!({"output": null}));

        match merge(&base, &cleared).unwrap_err() {
            ConfigError::TypeConflict {
                path,
                base_kind,
                overlay_kind,
            } => {
                assert_eq!(path, "output");
                assert_eq!(base_kind, "tree");
                assert_eq!(overlay_kind, "null");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = merge(&cleared, &tree(json!({"output": {"path": "dist"}}))).unwrap_err();
        assert!(matches!(err, ConfigError::TypeConflict { ref path, .. } if path == "output"));
    }

    #[test]
    fn null_and_scalar_replace_each_other() {
        let merged = merge(&tree(json!({"devtool": "eval"})), &tree(json!({"devtool": null})))
            .unwrap();
        assert!(merged.get("devtool").unwrap().is_null());

        let merged = merge(&merged, &tree(json!({"devtool": "source-map"}))).unwrap();
        assert_eq!(merged.get_str("devtool"), Some("source-map"));
    }

    #[test]
    fn scalar_may_replace_sequence() {
        let merged = merge(&tree(json!({"entry": ["a", "b"]})), &tree(json!({"entry": "a"})))
            .unwrap();
        assert_eq!(merged.get_str("entry"), Some("a"));
    }

    #[test]
    fn merge_all_folds_left_to_right() {
        let a = tree(json!({"x": 1, "y": 1}));
        let b = tree(json!({"y": 2, "z": 2}));
        let c = tree(json!({"z": 3}));

        let merged = merge_all([&a, &b, &c]).unwrap();
        assert_eq!(merged.to_json(), json!({"x": 1, "y": 2, "z": 3}));
        assert_eq!(merged, merge(&merge(&a, &b).unwrap(), &c).unwrap());
    }
}
