use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How `weave config` prints the effective configuration.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Toml,
}
