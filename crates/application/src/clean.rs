//! Field cleaners
//!
//! Cleaners mask nondeterministic values (timestamps, ids) before comparison
//! and before a fixture is written back. A cleaner is looked up by field key
//! and called with `(key, value, context)`, where `context` is the object or
//! array holding the field.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// A cleaning function: `(key, value, context) -> cleaned value`.
pub type CleanFn = dyn Fn(&str, &Value, &Value) -> Value + Send + Sync;

/// Registry of cleaners keyed by field name.
#[derive(Clone, Default)]
pub struct CleanRegistry {
    cleaners: HashMap<String, Arc<CleanFn>>,
}

impl CleanRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cleaner for `key`, builder style.
    #[must_use]
    pub fn with<F>(mut self, key: impl Into<String>, cleaner: F) -> Self
    where
        F: Fn(&str, &Value, &Value) -> Value + Send + Sync + 'static,
    {
        self.register(key, cleaner);
        self
    }

    /// Adds or replaces the cleaner for `key`.
    pub fn register<F>(&mut self, key: impl Into<String>, cleaner: F)
    where
        F: Fn(&str, &Value, &Value) -> Value + Send + Sync + 'static,
    {
        self.cleaners.insert(key.into(), Arc::new(cleaner));
    }

    /// Returns true if no cleaners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cleaners.is_empty()
    }

    /// Cleans a single field. Keys without a cleaner pass through unchanged.
    #[must_use]
    pub fn clean_field(&self, key: &str, value: Value, context: &Value) -> Value {
        match self.cleaners.get(key) {
            Some(cleaner) => cleaner(key, &value, context),
            None => value,
        }
    }

    /// Cleans a text body under the `body` key with an empty context.
    #[must_use]
    pub fn clean_text(&self, text: &str) -> String {
        if !self.cleaners.contains_key("body") {
            return text.to_string();
        }
        match self.clean_field("body", Value::String(text.to_string()), &Value::Object(Map::new())) {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }

    /// Cleans every field of a JSON tree, top-down.
    ///
    /// The root is offered under the empty key, then each object member and
    /// array element (keyed by index) is cleaned before its children, so a
    /// cleaner that replaces a subtree also decides what gets visited below it.
    #[must_use]
    pub fn clean_tree(&self, value: Value) -> Value {
        if self.cleaners.is_empty() {
            return value;
        }
        let mut holder = Map::new();
        holder.insert(String::new(), value.clone());
        let root = self.clean_field("", value, &Value::Object(holder));
        self.walk(root)
    }

    fn walk(&self, value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let context = Value::Object(map.clone());
                let cleaned = map
                    .into_iter()
                    .map(|(key, child)| {
                        let child = self.clean_field(&key, child, &context);
                        let child = self.walk(child);
                        (key, child)
                    })
                    .collect();
                Value::Object(cleaned)
            }
            Value::Array(items) => {
                let context = Value::Array(items.clone());
                let cleaned = items
                    .into_iter()
                    .enumerate()
                    .map(|(index, child)| {
                        let child = self.clean_field(&index.to_string(), child, &context);
                        self.walk(child)
                    })
                    .collect();
                Value::Array(cleaned)
            }
            leaf => leaf,
        }
    }
}

impl fmt::Debug for CleanRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.cleaners.keys().collect();
        keys.sort();
        f.debug_struct("CleanRegistry").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn masked(_: &str, _: &Value, _: &Value) -> Value {
        Value::String("<masked>".into())
    }

    #[test]
    fn test_empty_registry_is_identity() {
        let value = json!({"updated": "2026-10-19", "items": [1, 2]});
        assert_eq!(CleanRegistry::new().clean_tree(value.clone()), value);
        assert_eq!(CleanRegistry::new().clean_text("abc"), "abc");
    }

    #[test]
    fn test_clean_tree_masks_nested_fields() {
        let registry = CleanRegistry::new().with("updated", masked);
        let value = json!({
            "updated": "2026-10-19",
            "items": [{"id": 1, "updated": "yesterday"}]
        });

        assert_eq!(
            registry.clean_tree(value),
            json!({
                "updated": "<masked>",
                "items": [{"id": 1, "updated": "<masked>"}]
            })
        );
    }

    #[test]
    fn test_cleaner_receives_holder_context() {
        let registry = CleanRegistry::new().with("value", |_, value, context| {
            if context.get("kind") == Some(&json!("volatile")) {
                Value::Null
            } else {
                value.clone()
            }
        });
        let value = json!([
            {"kind": "volatile", "value": 3},
            {"kind": "stable", "value": 4}
        ]);

        assert_eq!(
            registry.clean_tree(value),
            json!([
                {"kind": "volatile", "value": null},
                {"kind": "stable", "value": 4}
            ])
        );
    }

    #[test]
    fn test_replaced_subtree_is_walked() {
        let registry = CleanRegistry::new()
            .with("meta", |_, _, _| json!({"stamp": "x"}))
            .with("stamp", masked);

        assert_eq!(
            registry.clean_tree(json!({"meta": 1})),
            json!({"meta": {"stamp": "<masked>"}})
        );
    }

    #[test]
    fn test_clean_text_uses_body_key() {
        let registry = CleanRegistry::new().with("body", |_, value, _| {
            Value::String(value.as_str().unwrap_or_default().replace("42ms", "Xms"))
        });
        assert_eq!(registry.clean_text("took 42ms"), "took Xms");
    }
}
