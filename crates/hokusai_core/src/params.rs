//! Scenario parameters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A typed parameter value.
///
/// Deserializes untagged, so TOML `hp = 10`, `rate = 0.5`, `met = true` and
/// `name = "Ann"` all map naturally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::Display, derive_more::From)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag
    #[display("{}", _0)]
    Bool(bool),
    /// Integer
    #[display("{}", _0)]
    Int(i64),
    /// Floating point number
    #[display("{}", _0)]
    Float(f64),
    /// Text
    #[display("{}", _0)]
    Str(String),
}

impl Value {
    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric value widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

/// Named parameter values read and written by scenario expressions.
///
/// # Examples
///
/// ```
/// use hokusai_core::{ParamStore, Value};
///
/// let mut params = ParamStore::new();
/// params.set("x", 5);
/// assert_eq!(params.get("x"), Some(&Value::Int(5)));
/// assert!(params.get("y").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamStore {
    values: BTreeMap<String, Value>,
}

impl ParamStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Set a parameter, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Remove a parameter.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Whether a parameter is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameter is defined.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, Value)> for ParamStore {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
