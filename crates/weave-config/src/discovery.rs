//! File-based config discovery for CLI use
//!
//! Handles finding and loading weave configuration files from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::tree::{ConfigTree, ConfigValue};

/// Key holding per-environment overrides inside a config file.
pub const PROFILES_KEY: &str = "profiles";

/// A loaded configuration file: its base layer plus named profiles.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub base: ConfigTree,
    pub profiles: IndexMap<String, ConfigTree>,
}

impl ConfigFile {
    /// Split a parsed document into base settings and `profiles`.
    pub fn from_tree(path: impl Into<PathBuf>, mut tree: ConfigTree) -> Result<Self> {
        let profiles: IndexMap<String, ConfigTree> = match tree.remove(PROFILES_KEY) {
            None => IndexMap::new(),
            Some(ConfigValue::Tree(profiles)) => profiles
                .iter()
                .map(|(name, value)| match value {
                    ConfigValue::Tree(profile) => Ok((name.to_string(), profile.clone())),
                    other => Err(ConfigError::invalid(
                        format!("{PROFILES_KEY}.{name}"),
                        format!("expected a table, found {}", other.kind()),
                    )),
                })
                .collect::<Result<_>>()?,
            Some(other) => {
                return Err(ConfigError::invalid(
                    PROFILES_KEY,
                    format!("expected a table, found {}", other.kind()),
                ));
            }
        };

        Ok(Self {
            path: path.into(),
            base: tree,
            profiles,
        })
    }

    pub fn profile(&self, name: &str) -> Option<&ConfigTree> {
        self.profiles.get(name)
    }
}

/// File-based configuration discovery
///
/// Searches for weave configuration files in conventional locations and loads them.
///
/// # Example
///
/// ```no_run
/// use weave_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let file = discovery.load().unwrap();
/// println!("{} profiles", file.profiles.len());
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. weave.toml
    /// 2. weave.json
    /// 3. package.json (weave field)
    pub fn find(&self) -> Option<PathBuf> {
        for name in ["weave.toml", "weave.json"] {
            let path = self.root.join(name);
            if path.exists() {
                return Some(path);
            }
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed.get("weave").is_some_and(|v| !v.is_null()) {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load config from the discovered file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<ConfigFile> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        load_file(&path)
    }

    /// Like [`load`](Self::load) but a missing file is not an error.
    pub fn load_optional(&self) -> Result<Option<ConfigFile>> {
        self.find().map(|path| load_file(&path)).transpose()
    }
}

/// Load a specific config file. The format is chosen by extension.
pub fn load_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    debug!(path = %path.display(), "loading config file");

    let content = fs::read_to_string(path)?;
    let is_package_json = path.file_name() == Some(std::ffi::OsStr::new("package.json"));

    let value = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => {
            let toml_val: toml::Table = toml::from_str(&content)
                .map_err(|e| ConfigError::invalid("toml", format!("Invalid TOML syntax: {e}")))?;
            serde_json::to_value(toml_val).map_err(|e| {
                ConfigError::invalid("toml", format!("TOML to JSON conversion failed: {e}"))
            })?
        }
        Some("json") if is_package_json => {
            let parsed: Value = serde_json::from_str(&content)
                .map_err(|e| ConfigError::invalid("package.json", format!("Invalid JSON: {e}")))?;
            match parsed.get("weave") {
                Some(value) if !value.is_null() => value.clone(),
                _ => {
                    return Err(ConfigError::invalid(
                        "weave",
                        "Add a 'weave' field to your package.json",
                    ));
                }
            }
        }
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| ConfigError::invalid("json", format!("Invalid JSON: {e}")))?,
        _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    };

    ConfigFile::from_tree(path, ConfigTree::from_json(value)?)
}
