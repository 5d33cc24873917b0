//! `weave config`: print the effective configuration.

use serde_json::Value;
use weave_config::{ConfigTree, EffectiveConfig};

use crate::cli::{ConfigArgs, OutputFormat};
use crate::error::{CliError, Result};
use crate::options::Options;

pub fn execute(args: ConfigArgs) -> Result<()> {
    let options = Options::load(&args.target, args.format)?;
    let config = super::resolve(&options)?;
    println!("{}", render(&config, options.format, args.get.as_deref())?);
    Ok(())
}

/// Render the whole configuration, or the value at a dotted `path`.
pub fn render(
    config: &EffectiveConfig,
    format: OutputFormat,
    path: Option<&str>,
) -> Result<String> {
    let Some(path) = path else {
        return render_tree(config.tree(), format);
    };

    let value = config
        .tree()
        .get_path(path)
        .ok_or_else(|| CliError::MissingPath(path.to_string()))?;

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&value.to_json())?),
        OutputFormat::Toml => {
            // A TOML document needs a table at the top, so wrap the value
            // under its last path segment.
            let key = path.rsplit('.').next().unwrap_or(path);
            render_tree(&ConfigTree::new().with(key, value.clone()), format)
        }
    }
}

fn render_tree(tree: &ConfigTree, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&tree.to_json())?),
        OutputFormat::Toml => {
            let value =
                strip_nulls(tree.to_json()).unwrap_or_else(|| Value::Object(Default::default()));
            Ok(toml::to_string_pretty(&value)?)
        }
    }
}

/// TOML has no null; drop null entries and items.
fn strip_nulls(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => Some(Value::Object(
            map.into_iter()
                .filter_map(|(k, v)| strip_nulls(v).map(|v| (k, v)))
                .collect(),
        )),
        Value::Array(items) => Some(Value::Array(
            items.into_iter().filter_map(strip_nulls).collect(),
        )),
        other => Some(other),
    }
}
