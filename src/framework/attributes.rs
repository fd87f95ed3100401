//! Attribute storage with dirty tracking.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Holds a resource's wire-format attributes and the keys modified since the last load.
///
/// Every key in the modified set is also present in the attribute map:
/// [`set`](Self::set) records the key and writes the value together, and
/// [`load`](Self::load) replaces both at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
    attributes: Map<String, Value>,
    modified: BTreeSet<String>,
}

impl AttributeStore {
    /// A clean store holding `attributes`.
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self {
            attributes,
            modified: BTreeSet::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Writes `value` and marks `key` dirty, even when the value is unchanged.
    pub fn set(&mut self, key: String, value: Value) {
        self.modified.insert(key.clone());
        self.attributes.insert(key, value);
    }

    /// Replaces all attributes with server state and clears the modified set.
    pub fn load(&mut self, attributes: Map<String, Value>) {
        self.attributes = attributes;
        self.modified.clear();
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn modified_keys(&self) -> &BTreeSet<String> {
        &self.modified
    }

    pub fn is_modified(&self) -> bool {
        !self.modified.is_empty()
    }

    /// The attributes restricted to the modified keys.
    pub fn changes(&self) -> Map<String, Value> {
        self.modified
            .iter()
            .filter_map(|k| self.attributes.get(k).map(|v| (k.clone(), v.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded() -> AttributeStore {
        let attrs = json!({"a": 1, "b": 2});
        AttributeStore::new(attrs.as_object().cloned().unwrap())
    }

    #[test]
    fn test_new_store_is_clean() {
        let store = loaded();
        assert!(!store.is_modified());
        assert!(store.changes().is_empty());
    }

    #[test]
    fn test_modified_keys_are_exactly_the_touched_keys() {
        let mut store = loaded();
        store.set("a".into(), json!(9));
        store.set("c".into(), json!("new"));
        store.set("a".into(), json!(10));

        let keys: Vec<&str> = store.modified_keys().iter().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(json!(store.changes()), json!({"a": 10, "c": "new"}));
        assert_eq!(store.get("b"), Some(&json!(2)));
    }

    #[test]
    fn test_setting_equal_value_still_marks_dirty() {
        let mut store = loaded();
        store.set("b".into(), json!(2));
        assert!(store.is_modified());
        assert_eq!(json!(store.changes()), json!({"b": 2}));
    }

    #[test]
    fn test_load_resets_modified_keys() {
        let mut store = loaded();
        store.set("a".into(), json!(9));
        store.load(json!({"a": 9, "b": 2}).as_object().cloned().unwrap());
        assert!(!store.is_modified());
        assert_eq!(store.get("a"), Some(&json!(9)));
    }
}
