//! Semantic configuration tree.
//!
//! A [`ConfigTree`] is an ordered mapping from string keys to [`ConfigValue`]s.
//! Values are scalars, nested trees, or ordered sequences. Keys are unique per
//! level and keep their insertion order, so serialized configurations and
//! pipeline declarations stay stable between runs.

use std::fmt;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{ConfigError, Result};

/// Leaf value of a configuration tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Str(s) => write!(f, "{s}"),
        }
    }
}

/// A value stored under a key of a [`ConfigTree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Scalar(Scalar),
    Sequence(Vec<ConfigValue>),
    Tree(ConfigTree),
}

impl ConfigValue {
    pub const NULL: ConfigValue = ConfigValue::Scalar(Scalar::Null);

    /// Short name of the value kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Scalar(Scalar::Null) => "null",
            ConfigValue::Scalar(_) => "scalar",
            ConfigValue::Sequence(_) => "sequence",
            ConfigValue::Tree(_) => "tree",
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, ConfigValue::Tree(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Scalar(Scalar::Null))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ConfigValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&ConfigTree> {
        match self {
            ConfigValue::Tree(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_tree(self) -> Option<ConfigTree> {
        match self {
            ConfigValue::Tree(t) => Some(t),
            _ => None,
        }
    }

    /// Convert to a JSON value. Non-finite floats become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            ConfigValue::Scalar(Scalar::Null) => Value::Null,
            ConfigValue::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            ConfigValue::Scalar(Scalar::Int(i)) => Value::Number((*i).into()),
            ConfigValue::Scalar(Scalar::Float(x)) => {
                Number::from_f64(*x).map_or(Value::Null, Value::Number)
            }
            ConfigValue::Scalar(Scalar::Str(s)) => Value::String(s.clone()),
            ConfigValue::Sequence(items) => {
                Value::Array(items.iter().map(ConfigValue::to_json).collect())
            }
            ConfigValue::Tree(tree) => tree.to_json(),
        }
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ConfigValue::NULL,
            Value::Bool(b) => b.into(),
            Value::Number(n) => ConfigValue::Scalar(
                n.as_i64()
                    .map(Scalar::Int)
                    .or_else(|| n.as_f64().map(Scalar::Float))
                    .unwrap_or(Scalar::Null),
            ),
            Value::String(s) => s.into(),
            Value::Array(items) => {
                ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            Value::Object(map) => ConfigValue::Tree(map.into()),
        }
    }
}

impl From<Scalar> for ConfigValue {
    fn from(value: Scalar) -> Self {
        ConfigValue::Scalar(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Scalar(Scalar::Str(value.to_string()))
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Scalar(Scalar::Str(value))
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Scalar(Scalar::Int(value))
    }
}

impl From<u16> for ConfigValue {
    fn from(value: u16) -> Self {
        ConfigValue::Scalar(Scalar::Int(i64::from(value)))
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Scalar(Scalar::Float(value))
    }
}

impl From<ConfigTree> for ConfigValue {
    fn from(value: ConfigTree) -> Self {
        ConfigValue::Tree(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(value: Vec<ConfigValue>) -> Self {
        ConfigValue::Sequence(value)
    }
}

/// Ordered mapping of configuration keys to values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigTree {
    entries: IndexMap<String, ConfigValue>,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for assembling small trees in code.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, replacing (and returning) any previous value for `key`.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.entries.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up a value by dotted path (`"output.path"`).
    ///
    /// Only trees are traversed; a path that runs into a scalar or a sequence
    /// before its last segment yields `None`.
    pub fn get_path(&self, path: &str) -> Option<&ConfigValue> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.get(first)?;
        for segment in segments {
            current = current.as_tree()?.get(segment)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get_path(path).and_then(ConfigValue::as_str)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get_path(path).and_then(ConfigValue::as_bool)
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get_path(path).and_then(ConfigValue::as_i64)
    }

    pub fn get_tree(&self, path: &str) -> Option<&ConfigTree> {
        self.get_path(path).and_then(ConfigValue::as_tree)
    }

    pub fn get_sequence(&self, path: &str) -> Option<&[ConfigValue]> {
        self.get_path(path).and_then(ConfigValue::as_sequence)
    }

    /// Create from a JSON value. The value must be an object.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(map.into()),
            other => Err(ConfigError::invalid(
                "config",
                format!("expected an object at the top level, found {}", json_kind(&other)),
            )),
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Build a tree from any serializable value (struct, map, ...).
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value).map_err(|e| ConfigError::invalid("config", e))?;
        Self::from_json(json)
    }

    /// Deserialize the whole tree into a typed structure.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.to_json()).map_err(|e| ConfigError::invalid("config", e))
    }

    /// Deserialize a single section. A missing section deserializes from an
    /// empty tree, so types with `#[serde(default)]` fields still work.
    pub fn extract_section<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = match self.get_path(path) {
            Some(value) => value.to_json(),
            None => Value::Object(Map::new()),
        };
        serde_json::from_value(value).map_err(|e| ConfigError::invalid(path, e))
    }
}

impl From<Map<String, Value>> for ConfigTree {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, ConfigValue::from(v))).collect()
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ConfigTree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ConfigTree {
    type Item = (&'a String, &'a ConfigValue);
    type IntoIter = indexmap::map::Iter<'a, String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
