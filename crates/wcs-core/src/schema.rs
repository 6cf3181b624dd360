//! Per-widget-type schema metadata.
//!
//! Schemas describe the properties a widget type exposes so dashboards can
//! render suitable editors. They are informational only and never validated
//! against property values.

use indexmap::IndexMap;
use tracing::debug;

/// A schema payload as supplied by the registering client.
pub type Schema = serde_json::Value;

/// Widget type → schema, in the order types were first seen.
pub type SchemaMap = IndexMap<String, Schema>;

/// Stores one schema per widget type.
///
/// The first registration that carries a schema for a type wins; later
/// payloads for the same type are ignored until [`SchemaStore::clear`].
#[derive(Debug, Clone, Default)]
pub struct SchemaStore {
    schemas: SchemaMap,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `schema` under `widget_type` unless the type already has one.
    ///
    /// Returns `true` if the schema was stored.
    pub fn register_if_absent(&mut self, widget_type: &str, schema: Schema) -> bool {
        if self.schemas.contains_key(widget_type) {
            debug!(widget_type, "Schema already registered, keeping the first one");
            return false;
        }

        self.schemas.insert(widget_type.to_string(), schema);
        true
    }

    pub fn get(&self, widget_type: &str) -> Option<&Schema> {
        self.schemas.get(widget_type)
    }

    pub fn clear(&mut self) {
        self.schemas.clear();
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Returns a copy of every stored schema.
    pub fn snapshot(&self) -> SchemaMap {
        self.schemas.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_writer_wins() {
        let mut store = SchemaStore::new();
        let first = json!({"fontSize": {"type": "double"}});
        let second = json!({"color": {"type": "color"}});

        assert!(store.register_if_absent("Text", first.clone()));
        assert!(!store.register_if_absent("Text", second));

        assert_eq!(store.get("Text"), Some(&first));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_types_are_independent() {
        let mut store = SchemaStore::new();
        assert!(store.register_if_absent("Text", json!({"a": 1})));
        assert!(store.register_if_absent("Button", json!({"b": 2})));

        assert_eq!(store.get("Button"), Some(&json!({"b": 2})));
        assert!(store.get("Card").is_none());
    }

    #[test]
    fn test_clear_allows_new_schema() {
        let mut store = SchemaStore::new();
        store.register_if_absent("Text", json!({"a": 1}));
        store.clear();
        assert!(store.is_empty());

        assert!(store.register_if_absent("Text", json!({"b": 2})));
        assert_eq!(store.get("Text"), Some(&json!({"b": 2})));
    }

    #[test]
    fn test_snapshot_keeps_first_seen_order() {
        let mut store = SchemaStore::new();
        store.register_if_absent("Text", json!({}));
        store.register_if_absent("Button", json!({}));
        store.register_if_absent("Card", json!({}));

        let order: Vec<_> = store.snapshot().keys().cloned().collect();
        assert_eq!(order, vec!["Text", "Button", "Card"]);
    }
}
