//! Widget entities and value objects.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// Widget type used when a registration does not name one.
pub const UNKNOWN_WIDGET_TYPE: &str = "unknown";

/// Property name → JSON value.
///
/// Equality is structural and ignores key order, which is exactly what the
/// "modified since baseline" check needs.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Widget id → enriched view, in first-registration order.
pub type WidgetMap = IndexMap<WidgetId, WidgetView>;

// ============================================================================
// Type-Safe Identifiers
// ============================================================================

/// Identifier of a registered widget.
///
/// Supplied by the registering client (typically the widget's source location,
/// e.g. "title (home.dart:42:7)"). Expected but not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    /// Creates a new WidgetId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WidgetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WidgetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for WidgetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Widget Record
// ============================================================================

/// The stored state of one widget: `{id, type, properties}`.
///
/// Used both for the live widget and for its baseline snapshot. Cloning a
/// record deep-copies its properties, so a baseline never shares storage with
/// the live copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetRecord {
    pub id: WidgetId,
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default)]
    pub properties: Properties,
}

impl WidgetRecord {
    pub fn new(id: WidgetId, widget_type: impl Into<String>, properties: Properties) -> Self {
        Self {
            id,
            widget_type: widget_type.into(),
            properties,
        }
    }
}

// ============================================================================
// Widget View
// ============================================================================

/// A widget as sent to observers: the record enriched with its type's schema
/// (when one is known) and the modified flag.
///
/// Serializes as `{id, type, properties, schema?, modified}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetView {
    pub id: WidgetId,
    #[serde(rename = "type")]
    pub widget_type: String,
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    pub modified: bool,
}

impl WidgetView {
    /// Builds a view from a record plus the derived fields.
    pub fn from_record(record: &WidgetRecord, schema: Option<&Schema>, modified: bool) -> Self {
        Self {
            id: record.id.clone(),
            widget_type: record.widget_type.clone(),
            properties: record.properties.clone(),
            schema: schema.cloned(),
            modified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: serde_json::Value) -> Properties {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Properties::new(),
        }
    }

    #[test]
    fn test_widget_id_display() {
        let id = WidgetId::new("title (home.dart:42:7)");
        assert_eq!(id.to_string(), "title (home.dart:42:7)");
        assert_eq!(id.as_str(), "title (home.dart:42:7)");
    }

    #[test]
    fn test_view_serializes_type_field() {
        let record = WidgetRecord::new(WidgetId::new("w1"), "Text", props(json!({"fontSize": 14})));
        let view = WidgetView::from_record(&record, None, false);

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(
            value,
            json!({"id": "w1", "type": "Text", "properties": {"fontSize": 14}, "modified": false})
        );
    }

    #[test]
    fn test_view_includes_schema_when_known() {
        let record = WidgetRecord::new(WidgetId::new("w1"), "Text", Properties::new());
        let schema = json!({"fontSize": {"type": "double"}});
        let view = WidgetView::from_record(&record, Some(&schema), true);

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["schema"], schema);
        assert_eq!(value["modified"], json!(true));
    }

    #[test]
    fn test_record_clone_is_independent() {
        let record = WidgetRecord::new(WidgetId::new("w1"), "Text", props(json!({"style": {"bold": false}})));
        let mut copy = record.clone();
        copy.properties.insert("style".to_string(), json!({"bold": true}));

        assert_eq!(record.properties.get("style"), Some(&json!({"bold": false})));
    }

    #[test]
    fn test_property_equality_ignores_key_order() {
        let a = props(json!({"a": 1, "b": [1, 2], "c": {"x": null, "y": "z"}}));
        let b = props(json!({"c": {"y": "z", "x": null}, "b": [1, 2], "a": 1}));
        assert_eq!(a, b);

        let reordered_list = props(json!({"a": 1, "b": [2, 1], "c": {"x": null, "y": "z"}}));
        assert_ne!(a, reordered_list);
    }
}
