//! Purpose: Define the execution-context property bag and the output sink.
//! Exports: `ExecutionContext`, `Outputs`.
//! Role: Explicit replacements for the driver's ambient script globals.
//! Invariants: Context properties are always text; typing happens in the codec.
//! Invariants: Both types are ephemeral, local to one request/response cycle.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::core::error::{Error, ErrorKind};

/// The flat collection of named string properties describing one
/// orchestration action. The driver hands every value over as text; the
/// codec's coercion rules decide what becomes a boolean or a number.
#[derive(Clone, Debug, Default)]
pub struct ExecutionContext {
    properties: BTreeMap<String, String>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let properties = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self { properties }
    }

    /// Build a context from a JSON object of scalars. Non-string scalars keep
    /// their JSON text form; null entries are treated as absent. Containers
    /// are rejected: a property bag is flat by definition.
    pub fn from_json_object(value: &Value) -> Result<Self, Error> {
        let Some(map) = value.as_object() else {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("execution context must be a JSON object"));
        };

        let mut context = Self::new();
        for (key, entry) in map {
            match entry {
                Value::Null => {}
                Value::String(text) => context.set(key, text),
                Value::Bool(_) | Value::Number(_) => context.set(key, entry.to_string()),
                Value::Array(_) | Value::Object(_) => {
                    return Err(Error::new(ErrorKind::Usage)
                        .with_message("execution context values must be scalars")
                        .with_path(key)
                        .with_hint("Use dotted property names for nested data, e.g. `additionalParams.x`."));
                }
            }
        }
        Ok(context)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Iterate every property in deterministic (lexicographic) order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// View the bag as a JSON object of strings, the shape the guarded
    /// field-copy helper operates on.
    pub fn to_json_object(&self) -> Map<String, Value> {
        self.properties
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// The `(name, value)` sink fed by response parsing. Deterministic key order;
/// consumers treat it as a mapping.
#[derive(Clone, Debug, Default)]
pub struct Outputs {
    entries: BTreeMap<String, Value>,
}

impl Outputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, name: impl Into<String>, value: Value) {
        self.entries.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_json_object(self) -> Map<String, Value> {
        self.entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ExecutionContext;
    use crate::core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn json_object_context_stringifies_scalars() {
        let ctx = ExecutionContext::from_json_object(&json!({
            "flavourId": "gold",
            "count": 3,
            "flag": true,
            "skipped": null
        }))
        .unwrap();
        assert_eq!(ctx.get("flavourId"), Some("gold"));
        assert_eq!(ctx.get("count"), Some("3"));
        assert_eq!(ctx.get("flag"), Some("true"));
        assert_eq!(ctx.get("skipped"), None);
    }

    #[test]
    fn json_object_context_rejects_containers() {
        let err = ExecutionContext::from_json_object(&json!({"nested": {"x": 1}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn properties_iterate_in_stable_order() {
        let ctx = ExecutionContext::from_pairs([("b", "2"), ("a", "1")]);
        let keys: Vec<&str> = ctx.properties().map(|(key, _)| key).collect();
        assert_eq!(keys, ["a", "b"]);
    }
}
