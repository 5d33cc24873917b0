//! Build metadata resolved once per invocation from environment variables.
//!
//! Lookup order for every option: environment mapping, then host defaults,
//! then the built-in default. Numeric and boolean options are validated and
//! never coerced.

use std::collections::HashMap;
use std::hash::BuildHasher;

use serde::Serialize;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::tree::{ConfigTree, ConfigValue, Scalar};

pub const ENV: &str = "ENV";
pub const NODE_ENV: &str = "NODE_ENV";
pub const HOST: &str = "HOST";
pub const PORT: &str = "PORT";
pub const HMR: &str = "HMR";
pub const API_URL: &str = "API_URL";

/// Section of the effective configuration that holds metadata.
pub const METADATA_SECTION: &str = "metadata";

pub const DEFAULT_ENV: &str = "development";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

/// Immutable environment-derived settings for one build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    env: String,
    host: String,
    port: u16,
    hmr: bool,
    api_url: String,
    #[serde(skip)]
    tree: ConfigTree,
}

impl Metadata {
    fn new(env: String, host: String, port: u16, hmr: bool, api_url: String) -> Self {
        let tree = ConfigTree::new()
            .with(ENV, env.as_str())
            .with(HOST, host.as_str())
            .with(PORT, port)
            .with(HMR, hmr)
            .with(API_URL, api_url.as_str());

        Self {
            env,
            host,
            port,
            hmr,
            api_url,
            tree,
        }
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn hmr(&self) -> bool {
        self.hmr
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn is_production(&self) -> bool {
        self.env == "production"
    }

    /// Flat read-only view: `ENV`, `HOST`, `PORT`, `HMR`, `API_URL`.
    pub fn as_tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// The metadata wrapped under its section, ready to merge as the last
    /// configuration layer.
    pub fn to_layer(&self) -> ConfigTree {
        ConfigTree::new().with(METADATA_SECTION, self.tree.clone())
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new(
            DEFAULT_ENV.to_string(),
            DEFAULT_HOST.to_string(),
            DEFAULT_PORT,
            false,
            String::new(),
        )
    }
}

/// Where an option's raw value came from.
enum Source<'a> {
    Env(&'a str),
    Default(&'a ConfigValue),
    Builtin,
}

/// Resolve metadata from an environment mapping and host defaults.
///
/// # Errors
///
/// Returns [`ConfigError::MetadataValidation`] naming the option and the raw
/// value when `PORT` is not a valid port or `HMR` is not a boolean.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use weave_config::{resolve_metadata, ConfigTree};
///
/// let env = HashMap::from([("PORT".to_string(), "3000".to_string())]);
/// let defaults = ConfigTree::new().with("HOST", "0.0.0.0");
///
/// let metadata = resolve_metadata(&env, &defaults).unwrap();
/// assert_eq!(metadata.port(), 3000);
/// assert_eq!(metadata.host(), "0.0.0.0");
/// assert_eq!(metadata.env(), "development");
/// ```
pub fn resolve_metadata<S: BuildHasher>(
    env_vars: &HashMap<String, String, S>,
    host_defaults: &ConfigTree,
) -> Result<Metadata> {
    let source = |option: &'static str, env_keys: &[&str]| {
        lookup(env_vars, host_defaults, option, env_keys)
    };

    let env = resolve_string(ENV, source(ENV, &[ENV, NODE_ENV]), DEFAULT_ENV)?;
    let host = resolve_string(HOST, source(HOST, &[HOST]), DEFAULT_HOST)?;
    let port = resolve_port(source(PORT, &[PORT]))?;
    let hmr = resolve_flag(HMR, source(HMR, &[HMR]), false)?;
    let api_url = resolve_string(API_URL, source(API_URL, &[API_URL]), "")?;

    debug!(env = %env, host = %host, port, hmr, "resolved build metadata");
    Ok(Metadata::new(env, host, port, hmr, api_url))
}

fn lookup<'a, S: BuildHasher>(
    env_vars: &'a HashMap<String, String, S>,
    host_defaults: &'a ConfigTree,
    option: &str,
    env_keys: &[&str],
) -> Source<'a> {
    env_keys
        .iter()
        .find_map(|key| env_vars.get(*key))
        .map(|raw| Source::Env(raw.as_str()))
        .or_else(|| {
            host_defaults
                .get(option)
                .filter(|value| !value.is_null())
                .map(Source::Default)
        })
        .unwrap_or(Source::Builtin)
}

fn resolve_string(option: &'static str, source: Source<'_>, builtin: &str) -> Result<String> {
    match source {
        Source::Env(raw) => Ok(raw.to_string()),
        Source::Default(ConfigValue::Scalar(scalar)) => Ok(scalar.to_string()),
        Source::Default(other) => Err(rejected(option, other, "a string")),
        Source::Builtin => Ok(builtin.to_string()),
    }
}

fn resolve_port(source: Source<'_>) -> Result<u16> {
    const EXPECTED: &str = "a port number between 0 and 65535";

    match source {
        Source::Env(raw) => parse_port(raw),
        Source::Default(ConfigValue::Scalar(Scalar::Int(value))) => {
            u16::try_from(*value).map_err(|_| ConfigError::MetadataValidation {
                option: PORT,
                value: value.to_string(),
                expected: EXPECTED,
            })
        }
        Source::Default(ConfigValue::Scalar(Scalar::Str(raw))) => parse_port(raw),
        Source::Default(other) => Err(rejected(PORT, other, EXPECTED)),
        Source::Builtin => Ok(DEFAULT_PORT),
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.parse::<u16>()
        .map_err(|_| ConfigError::MetadataValidation {
            option: PORT,
            value: raw.to_string(),
            expected: "a port number between 0 and 65535",
        })
}

fn resolve_flag(option: &'static str, source: Source<'_>, builtin: bool) -> Result<bool> {
    match source {
        Source::Env(raw) => parse_flag(option, raw),
        Source::Default(ConfigValue::Scalar(Scalar::Bool(value))) => Ok(*value),
        Source::Default(ConfigValue::Scalar(Scalar::Str(raw))) => parse_flag(option, raw),
        Source::Default(other) => Err(rejected(option, other, "a boolean")),
        Source::Builtin => Ok(builtin),
    }
}

fn parse_flag(option: &'static str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::MetadataValidation {
            option,
            value: raw.to_string(),
            expected: "a boolean (true/false)",
        }),
    }
}

fn rejected(option: &'static str, value: &ConfigValue, expected: &'static str) -> ConfigError {
    ConfigError::MetadataValidation {
        option,
        value: value.to_json().to_string(),
        expected,
    }
}
