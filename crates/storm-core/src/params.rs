//! Builder for operation parameters.
//!
//! Every operation sends its arguments as `{"params": {...}}`. [`Params`]
//! collects the inner mapping from optional values, the same way query
//! strings are usually assembled.

use serde_json::{Map, Value};

/// Key wrapping the parameter object in a request body.
pub const PARAMS_KEY: &str = "params";

/// Parameters for a single operation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params {
    inner: Map<String, Value>,
}

impl Params {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Map::new() }
    }

    /// Set a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.inner.insert(key.into(), value.into());
    }

    /// Set a parameter when the value is present.
    pub fn push_opt<T>(&mut self, key: impl Into<String>, value: Option<T>)
    where
        T: Into<Value>,
    {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Chaining form of [`Params::push`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    /// Chaining form of [`Params::push_opt`].
    #[must_use]
    pub fn with_opt<T>(mut self, key: impl Into<String>, value: Option<T>) -> Self
    where
        T: Into<Value>,
    {
        self.push_opt(key, value);
        self
    }

    /// Fetch a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    /// Returns true if the parameter is set to something other than `null`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.get(key).is_some_and(|value| !value.is_null())
    }

    /// Names from `required` that are not set.
    #[must_use]
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|key| !self.contains(key))
            .collect()
    }

    /// Returns true if no parameters have been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The bare parameter mapping.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.inner
    }

    /// Request body: `{"params": {...}}`.
    #[must_use]
    pub fn into_body(self) -> Value {
        let mut body = Map::new();
        body.insert(PARAMS_KEY.to_string(), Value::Object(self.inner));
        Value::Object(body)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(inner: Map<String, Value>) -> Self {
        Self { inner }
    }
}

impl FromIterator<(String, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
