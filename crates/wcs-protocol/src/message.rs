//! Inbound message types and the validating decode step.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wcs_core::{Properties, Schema, WidgetId, UNKNOWN_WIDGET_TYPE};

/// Messages a client (application or dashboard) sends to the daemon.
///
/// Each variant carries exactly the fields its handler needs; a message that
/// lacks a required field fails to decode and never reaches the router.
/// Unknown `type` values decode to [`ClientMessage::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// A widget announces itself with its current property values.
    Register {
        id: WidgetId,
        /// Widget type tag (absent or null means "unknown")
        #[serde(rename = "widgetType", default, skip_serializing_if = "Option::is_none")]
        widget_type: Option<String>,
        #[serde(default)]
        properties: Properties,
        /// Schema describing the type's properties (first one per type wins)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<Schema>,
    },

    /// A widget goes away.
    Unregister { id: WidgetId },

    /// Request widgets, styles and schemas (answered to the sender only).
    GetAll,

    /// Merge a styles payload into the global styles document.
    Styles { data: serde_json::Map<String, serde_json::Value> },

    /// Set one property on a widget.
    UpdateProp {
        id: WidgetId,
        key: String,
        value: serde_json::Value,
    },

    /// Restore one widget to its baseline.
    Reset { id: WidgetId },

    /// Restore every widget to its baseline.
    ResetAllChanges,

    /// Forget all widgets, baselines and schemas.
    ResetAll,

    /// Any `type` this daemon does not handle.
    #[serde(other)]
    Unrecognized,
}

impl ClientMessage {
    /// Decodes one inbound frame.
    ///
    /// # Errors
    ///
    /// - `DecodeError::Syntax` if `text` is not valid JSON
    /// - `DecodeError::Malformed` if it is JSON but not a well-formed message
    ///   (not an object, no `type`, or a required field missing/mistyped)
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| DecodeError::Syntax(e.to_string()))?;

        // Serde would also accept a variant index or a sequence here
        if !matches!(value.get("type"), Some(serde_json::Value::String(_))) {
            return Err(DecodeError::Malformed(
                "expected an object with a string `type` field".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| DecodeError::Malformed(e.to_string()))
    }

    /// Serializes the message to its JSON wire form.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// The wire name of this message's `type`.
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Unregister { .. } => "unregister",
            Self::GetAll => "get_all",
            Self::Styles { .. } => "styles",
            Self::UpdateProp { .. } => "update_prop",
            Self::Reset { .. } => "reset",
            Self::ResetAllChanges => "reset_all_changes",
            Self::ResetAll => "reset_all",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Returns the widget type of a `Register`, applying the default.
    pub fn resolved_widget_type(widget_type: Option<String>) -> String {
        widget_type.unwrap_or_else(|| UNKNOWN_WIDGET_TYPE.to_string())
    }

    /// Creates a register message.
    pub fn register(
        id: impl Into<WidgetId>,
        widget_type: impl Into<String>,
        properties: Properties,
    ) -> Self {
        Self::Register {
            id: id.into(),
            widget_type: Some(widget_type.into()),
            properties,
            schema: None,
        }
    }

    /// Creates a register message carrying a schema.
    pub fn register_with_schema(
        id: impl Into<WidgetId>,
        widget_type: impl Into<String>,
        properties: Properties,
        schema: Schema,
    ) -> Self {
        Self::Register {
            id: id.into(),
            widget_type: Some(widget_type.into()),
            properties,
            schema: Some(schema),
        }
    }

    /// Creates an unregister message.
    pub fn unregister(id: impl Into<WidgetId>) -> Self {
        Self::Unregister { id: id.into() }
    }

    /// Creates a get_all request.
    pub fn get_all() -> Self {
        Self::GetAll
    }

    /// Creates a styles message.
    pub fn styles(data: serde_json::Map<String, serde_json::Value>) -> Self {
        Self::Styles { data }
    }

    /// Creates a property update.
    pub fn update_prop(
        id: impl Into<WidgetId>,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        Self::UpdateProp {
            id: id.into(),
            key: key.into(),
            value,
        }
    }

    /// Creates a reset message.
    pub fn reset(id: impl Into<WidgetId>) -> Self {
        Self::Reset { id: id.into() }
    }

    /// Creates a reset_all_changes message.
    pub fn reset_all_changes() -> Self {
        Self::ResetAllChanges
    }

    /// Creates a reset_all message.
    pub fn reset_all() -> Self {
        Self::ResetAll
    }
}

/// Why an inbound frame could not be turned into a [`ClientMessage`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The frame is not valid JSON.
    #[error("invalid JSON: {0}")]
    Syntax(String),

    /// The frame is JSON but not a well-formed message.
    #[error("malformed message: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_register() {
        let msg = ClientMessage::decode(
            r#"{"type":"register","id":"w1","widgetType":"Text","properties":{"fontSize":14}}"#,
        )
        .unwrap();

        match msg {
            ClientMessage::Register {
                id,
                widget_type,
                properties,
                schema,
            } => {
                assert_eq!(id.as_str(), "w1");
                assert_eq!(widget_type.as_deref(), Some("Text"));
                assert_eq!(properties.get("fontSize"), Some(&json!(14)));
                assert!(schema.is_none());
            }
            other => panic!("Expected Register, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_register_defaults() {
        let msg = ClientMessage::decode(r#"{"type":"register","id":"w1"}"#).unwrap();
        match msg {
            ClientMessage::Register {
                widget_type,
                properties,
                ..
            } => {
                assert_eq!(ClientMessage::resolved_widget_type(widget_type), "unknown");
                assert!(properties.is_empty());
            }
            other => panic!("Expected Register, got {other:?}"),
        }

        let msg = ClientMessage::decode(r#"{"type":"register","id":"w1","widgetType":null}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Register { widget_type: None, .. }));
    }

    #[test]
    fn test_decode_register_with_schema() {
        let msg = ClientMessage::decode(
            r#"{"type":"register","id":"w1","widgetType":"Text","schema":{"fontSize":{"type":"double"}}}"#,
        )
        .unwrap();
        assert!(matches!(msg, ClientMessage::Register { schema: Some(_), .. }));
    }

    #[test]
    fn test_decode_update_prop_accepts_null_value() {
        let msg = ClientMessage::decode(r#"{"type":"update_prop","id":"w1","key":"color","value":null}"#)
            .unwrap();
        assert_eq!(msg, ClientMessage::update_prop("w1", "color", json!(null)));
    }

    #[test]
    fn test_decode_unit_messages() {
        assert_eq!(ClientMessage::decode(r#"{"type":"get_all"}"#).unwrap(), ClientMessage::GetAll);
        assert_eq!(
            ClientMessage::decode(r#"{"type":"reset_all_changes"}"#).unwrap(),
            ClientMessage::ResetAllChanges
        );
        assert_eq!(
            ClientMessage::decode(r#"{"type":"reset_all","extra":1}"#).unwrap(),
            ClientMessage::ResetAll
        );
    }

    #[test]
    fn test_decode_unknown_type_is_unrecognized() {
        let msg = ClientMessage::decode(r#"{"type":"launch_rockets","id":"w1"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Unrecognized);
    }

    #[test]
    fn test_decode_missing_required_fields() {
        let cases = [
            r#"{"type":"register"}"#,
            r#"{"type":"unregister"}"#,
            r#"{"type":"update_prop","id":"w1","key":"fontSize"}"#,
            r#"{"type":"update_prop","id":"w1","value":3}"#,
            r#"{"type":"reset"}"#,
            r#"{"type":"styles"}"#,
            r#"{"id":"w1"}"#,
            r#"{"type":0,"id":"w1"}"#,
            r#"["get_all"]"#,
            r#""get_all""#,
        ];
        for case in cases {
            let err = ClientMessage::decode(case).unwrap_err();
            assert!(matches!(err, DecodeError::Malformed(_)), "{case} -> {err:?}");
        }
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = ClientMessage::decode("not json at all").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax(_)));
        assert!(err.to_string().starts_with("invalid JSON"));
    }

    #[test]
    fn test_encode_uses_wire_names() {
        let json = ClientMessage::register("w1", "Text", Properties::new()).encode().unwrap();
        assert!(json.contains("\"type\":\"register\""));
        assert!(json.contains("\"widgetType\":\"Text\""));
        assert!(!json.contains("schema"));

        let json = ClientMessage::reset_all_changes().encode().unwrap();
        assert_eq!(json, r#"{"type":"reset_all_changes"}"#);
    }

    #[test]
    fn test_message_type_matches_wire_tag() {
        let messages = [
            ClientMessage::unregister("w1"),
            ClientMessage::get_all(),
            ClientMessage::styles(serde_json::Map::new()),
            ClientMessage::update_prop("w1", "k", json!(1)),
            ClientMessage::reset("w1"),
            ClientMessage::reset_all(),
        ];
        for msg in messages {
            let value: serde_json::Value = serde_json::from_str(&msg.encode().unwrap()).unwrap();
            assert_eq!(value["type"], json!(msg.message_type()));
        }
    }
}
