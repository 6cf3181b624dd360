//! Outbound events sent from the daemon to connected clients.

use serde::{Deserialize, Serialize};
use wcs_core::{SchemaMap, Styles, WidgetMap, WidgetView};

/// Events the daemon emits, serialized as `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A single widget changed (registered, updated or reset)
    Update(Box<WidgetView>),

    /// Full widget snapshot keyed by widget id
    Widgets(WidgetMap),

    /// The full styles document
    Styles(Styles),

    /// Widget type → schema
    Schemas(SchemaMap),
}

impl ServerEvent {
    /// Creates a single-widget update.
    pub fn update(view: WidgetView) -> Self {
        Self::Update(Box::new(view))
    }

    /// Creates a widgets snapshot event.
    pub fn widgets(widgets: WidgetMap) -> Self {
        Self::Widgets(widgets)
    }

    /// Creates a styles event.
    pub fn styles(styles: Styles) -> Self {
        Self::Styles(styles)
    }

    /// Creates a schemas event.
    pub fn schemas(schemas: SchemaMap) -> Self {
        Self::Schemas(schemas)
    }

    /// The wire name of this event's `type`.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Update(_) => "update",
            Self::Widgets(_) => "widgets",
            Self::Styles(_) => "styles",
            Self::Schemas(_) => "schemas",
        }
    }

    /// Serializes the event to its JSON wire form.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wcs_core::{Properties, WidgetId, WidgetRecord};

    fn text_view(modified: bool) -> WidgetView {
        let mut properties = Properties::new();
        properties.insert("fontSize".to_string(), json!(14));
        let record = WidgetRecord::new(WidgetId::new("w1"), "Text", properties);
        WidgetView::from_record(&record, None, modified)
    }

    #[test]
    fn test_update_event_shape() {
        let event = ServerEvent::update(text_view(false));
        let value: serde_json::Value = serde_json::from_str(&event.encode().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "update",
                "data": {"id": "w1", "type": "Text", "properties": {"fontSize": 14}, "modified": false}
            })
        );
    }

    #[test]
    fn test_widgets_event_is_keyed_by_id() {
        let mut widgets = WidgetMap::new();
        widgets.insert(WidgetId::new("w1"), text_view(true));
        let event = ServerEvent::widgets(widgets);

        let value: serde_json::Value = serde_json::from_str(&event.encode().unwrap()).unwrap();
        assert_eq!(value["type"], json!("widgets"));
        assert_eq!(value["data"]["w1"]["modified"], json!(true));
    }

    #[test]
    fn test_empty_events() {
        assert_eq!(
            ServerEvent::widgets(WidgetMap::new()).encode().unwrap(),
            r#"{"type":"widgets","data":{}}"#
        );
        assert_eq!(
            ServerEvent::schemas(SchemaMap::new()).encode().unwrap(),
            r#"{"type":"schemas","data":{}}"#
        );
    }

    #[test]
    fn test_styles_event() {
        let event = ServerEvent::styles(Styles::default());
        let value: serde_json::Value = serde_json::from_str(&event.encode().unwrap()).unwrap();
        assert_eq!(value["type"], json!(event.event_type()));
        assert_eq!(value["data"]["textStyles"], json!({}));
    }

    #[test]
    fn test_event_decodes_on_client_side() {
        let event = ServerEvent::update(text_view(true));
        let parsed: ServerEvent = serde_json::from_str(&event.encode().unwrap()).unwrap();
        assert_eq!(parsed, event);
    }
}
