//! Built-in configuration presets.
//!
//! `base()` holds the settings every environment shares. Profiles hold the
//! environment-specific overrides merged on top of it.

use serde_json::{Value, json};

use crate::tree::{ConfigTree, ConfigValue};

pub const PRODUCTION: &str = "production";
pub const DEVELOPMENT: &str = "development";

/// Names of the built-in environment profiles.
pub const PROFILES: &[&str] = &[PRODUCTION, DEVELOPMENT];

fn tree(value: Value) -> ConfigTree {
    ConfigValue::from(value).into_tree().unwrap_or_default()
}

/// Environment-agnostic base configuration.
pub fn base() -> ConfigTree {
    tree(json!({
        "metadata": {
            "title": "weave app",
            "baseUrl": "/"
        },
        "output": {
            "path": "dist",
            "filename": "[name].bundle.js",
            "chunkFilename": "[name].chunk.js",
            "sourceMapFilename": "[file].map",
            "publicPath": "/"
        },
        "resolve": {
            "extensions": [".ts", ".js", ".json"]
        },
        "externals": {},
        "pipeline": ["define"]
    }))
}

/// Built-in override for a named environment, if one exists.
pub fn profile(env: &str) -> Option<ConfigTree> {
    match env {
        PRODUCTION => Some(production()),
        DEVELOPMENT => Some(development()),
        _ => None,
    }
}

/// Production build: content-hashed names, minification, module stubs for
/// debug-only runtime helpers, stable hashed module ids.
pub fn production() -> ConfigTree {
    tree(json!({
        "metadata": {
            "ENV": "production",
            "HMR": false,
            "API_URL": ""
        },
        "devtool": "source-map",
        "output": {
            "path": "dist",
            "filename": "[name].[chunkhash].bundle.js",
            "sourceMapFilename": "[file].map",
            "chunkFilename": "[name].[chunkhash].chunk.js",
            "publicPath": "/client/"
        },
        "externals": {
            "webtorrent": "WebTorrent"
        },
        "pipeline": [
            { "name": "optimize-js", "options": { "source_map": false } },
            { "name": "dedupe", "enabled": false },
            "define",
            {
                "name": "minify",
                "options": {
                    "beautify": false,
                    "output": { "comments": false },
                    "mangle": { "screw_ie8": true },
                    "compress": {
                        "screw_ie8": true,
                        "warnings": false,
                        "conditionals": true,
                        "unused": true,
                        "comparisons": true,
                        "sequences": true,
                        "dead_code": true,
                        "evaluate": true,
                        "if_return": true,
                        "join_vars": true,
                        "negate_iife": false
                    }
                }
            },
            {
                "name": "module-replacement",
                "options": {
                    "rules": [
                        { "pattern": "angular2-hmr", "target": "config/empty.js" },
                        {
                            "pattern": r"zone\.js(\\|/)dist(\\|/)long-stack-trace-zone",
                            "target": "config/empty.js"
                        }
                    ]
                }
            },
            "hashed-module-ids",
            {
                "name": "loader-options",
                "options": {
                    "minimize": true,
                    "debug": false,
                    "options": {
                        "tslint": {
                            "emitErrors": true,
                            "failOnHint": true,
                            "resourcePath": "src"
                        },
                        "htmlLoader": {
                            "minimize": true,
                            "removeAttributeQuotes": false,
                            "caseSensitive": true
                        },
                        "output": { "path": "dist" }
                    }
                }
            },
            "hash"
        ],
        "node": {
            "global": true,
            "crypto": "empty",
            "process": false,
            "module": false,
            "clearImmediate": false,
            "setImmediate": false
        }
    }))
}

/// Development build: readable names, hot module replacement enabled.
pub fn development() -> ConfigTree {
    tree(json!({
        "metadata": {
            "ENV": "development",
            "HMR": true
        },
        "devtool": "cheap-module-source-map",
        "pipeline": [
            "define",
            { "name": "loader-options", "options": { "debug": true } },
            "hash"
        ]
    }))
}
