//! Command options merged from defaults, `WEAVE_*` environment variables and
//! command-line flags, in increasing priority.

use std::fmt;
use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::cli::{OutputFormat, TargetArgs};
use crate::error::Result;

/// Environment used when neither `--env` nor `WEAVE_ENV` is given.
pub const DEFAULT_ENV: &str = "development";

/// Prefix for environment variables that configure the CLI itself.
pub const ENV_PREFIX: &str = "WEAVE_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    #[serde(deserialize_with = "environment_name")]
    pub env: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            env: DEFAULT_ENV.to_string(),
            config: None,
            cwd: None,
            format: OutputFormat::default(),
        }
    }
}

/// Only the flags actually passed on the command line.
#[derive(Debug, Default, Serialize)]
struct Overrides<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    env: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<&'a PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cwd: Option<&'a PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<OutputFormat>,
}

impl Options {
    /// Load options. Priority: CLI args > `WEAVE_*` variables > defaults.
    pub fn load(target: &TargetArgs, format: Option<OutputFormat>) -> Result<Self> {
        Self::figment(target, format).extract().map_err(Into::into)
    }

    fn figment(target: &TargetArgs, format: Option<OutputFormat>) -> Figment {
        let overrides = Overrides {
            env: target.env.as_deref(),
            config: target.config.as_ref(),
            cwd: target.cwd.as_ref(),
            format,
        };

        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).only(&["env", "config", "cwd", "format"]))
            .merge(Serialized::defaults(overrides))
    }
}

/// `WEAVE_ENV=2024` arrives from figment as a number; keep it as a name.
fn environment_name<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct EnvironmentName;

    impl Visitor<'_> for EnvironmentName {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an environment name")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_string<E: de::Error>(self, value: String) -> std::result::Result<String, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<String, E> {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(EnvironmentName)
}
