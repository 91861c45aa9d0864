use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Facts collected over a precheck dialogue; append/overwrite only.
///
/// Accessors are total: a missing or mistyped key yields the documented
/// falsy default instead of an error, so risk predicates can never fail on
/// sparse data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Facts(Map<String, Value>);

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Boolean fact, false when missing or not a boolean.
    pub fn flag(&self, key: &str) -> bool {
        self.flag_or(key, false)
    }

    pub fn flag_or(&self, key: &str, default: bool) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn str_of(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Numeric fact with an explicit default for missing or mistyped keys.
    pub fn num_or(&self, key: &str, default: f64) -> f64 {
        self.0.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    /// True when the fact is a string containing any needle
    /// (case-insensitive).
    pub fn text_contains(&self, key: &str, needles: &[&str]) -> bool {
        match self.str_of(key) {
            Some(text) => {
                let lower = text.to_lowercase();
                needles.iter().any(|needle| lower.contains(needle))
            }
            None => false,
        }
    }

    pub fn inner(&self) -> &Map<String, Value> {
        &self.0
    }
}
