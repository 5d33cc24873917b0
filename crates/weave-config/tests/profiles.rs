//! Tests for layering presets, config files and environment profiles.

use std::collections::HashMap;
use std::fs;

use tempfile::TempDir;
use weave_config::{ConfigDiscovery, ConfigError, ConfigValue, LayeredConfig};

fn no_env() -> HashMap<String, String> {
    HashMap::new()
}

#[test]
fn file_base_overrides_preset_base() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("weave.toml"),
        r#"
[output]
path = "build"

[profiles.development]
devtool = "eval"
"#,
    )
    .expect("write config");

    let file = ConfigDiscovery::new(dir.path()).load().expect("load");
    let config = LayeredConfig::new("development")
        .with_file(&file)
        .resolve(&no_env())
        .expect("resolve");

    assert_eq!(config.tree().get_str("output.path"), Some("build"));
    // preset keys the file does not mention are preserved
    assert_eq!(config.tree().get_str("output.sourceMapFilename"), Some("[file].map"));
    // file profile beats preset profile
    assert_eq!(config.tree().get_str("devtool"), Some("eval"));
    assert!(config.metadata().hmr());
}

#[test]
fn file_profile_pipeline_replaces_preset_pipeline() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("weave.json"),
        r#"{
  "profiles": {
    "production": {
      "pipeline": ["define", "hash"]
    }
  }
}"#,
    )
    .expect("write config");

    let file = ConfigDiscovery::new(dir.path()).load().expect("load");
    let config = LayeredConfig::new("production")
        .with_file(&file)
        .resolve(&no_env())
        .expect("resolve");

    let names: Vec<&str> = config
        .tree()
        .get_sequence("pipeline")
        .expect("pipeline")
        .iter()
        .filter_map(ConfigValue::as_str)
        .collect();
    assert_eq!(names, vec!["define", "hash"]);
    // everything else from the production preset stays
    assert_eq!(config.tree().get_str("devtool"), Some("source-map"));
}

#[test]
fn environment_variables_win_over_profile_metadata() {
    let env = HashMap::from([
        ("HOST".to_string(), "0.0.0.0".to_string()),
        ("API_URL".to_string(), "https://api.example.test".to_string()),
    ]);

    let config = LayeredConfig::new("production").resolve(&env).expect("resolve");

    assert_eq!(config.metadata().host(), "0.0.0.0");
    assert_eq!(config.tree().get_str("metadata.HOST"), Some("0.0.0.0"));
    assert_eq!(
        config.tree().get_str("metadata.API_URL"),
        Some("https://api.example.test")
    );
    assert_eq!(config.tree().get_str("metadata.ENV"), Some("production"));
}

#[test]
fn invalid_port_produces_no_configuration() {
    let env = HashMap::from([("PORT".to_string(), "not-a-number".to_string())]);

    let err = LayeredConfig::new("production").resolve(&env).unwrap_err();
    match err {
        ConfigError::MetadataValidation { option, value, .. } => {
            assert_eq!(option, "PORT");
            assert_eq!(value, "not-a-number");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn conflicting_file_layer_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("weave.toml"), "output = \"dist\"\n").expect("write config");

    let file = ConfigDiscovery::new(dir.path()).load().expect("load");
    let err = LayeredConfig::new("production")
        .with_file(&file)
        .resolve(&no_env())
        .unwrap_err();
    assert!(matches!(err, ConfigError::TypeConflict { ref path, .. } if path == "output"));
}

#[test]
fn package_json_weave_field_is_discovered() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("package.json"),
        r#"{
  "name": "app",
  "weave": {
    "externals": { "lodash": "_" }
  }
}"#,
    )
    .expect("write package.json");

    let file = ConfigDiscovery::new(dir.path()).load().expect("load");
    let config = LayeredConfig::new("production")
        .with_file(&file)
        .resolve(&no_env())
        .expect("resolve");

    let externals = config.externals().expect("externals");
    assert_eq!(externals.get("lodash").map(String::as_str), Some("_"));
    assert_eq!(externals.get("webtorrent").map(String::as_str), Some("WebTorrent"));
}
