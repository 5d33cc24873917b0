//! # weave-config
//!
//! Layered build configuration for the weave bundler toolkit.
//!
//! - [`ConfigTree`] - ordered tree of settings
//! - [`merge`] / [`merge_all`] - deep merge where trees merge and everything
//!   else is replaced wholesale
//! - [`resolve_metadata`] - one pass over environment variables producing
//!   immutable [`Metadata`]
//! - [`LayeredConfig`] - presets, config file and profiles folded into an
//!   [`EffectiveConfig`]
//!
//! ```
//! use std::collections::HashMap;
//! use weave_config::LayeredConfig;
//!
//! let env: HashMap<String, String> = HashMap::new();
//! let config = LayeredConfig::new("production").resolve(&env).unwrap();
//! assert_eq!(config.metadata().env(), "production");
//! assert_eq!(config.tree().get_str("output.path"), Some("dist"));
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod merge;
pub mod metadata;
pub mod presets;
pub mod tree;

pub use config::{EXTERNALS_SECTION, EffectiveConfig, LayeredConfig};
pub use discovery::{ConfigDiscovery, ConfigFile, load_file};
pub use error::{ConfigError, Result};
pub use merge::{merge, merge_all};
pub use metadata::{METADATA_SECTION, Metadata, resolve_metadata};
pub use tree::{ConfigTree, ConfigValue, Scalar};
