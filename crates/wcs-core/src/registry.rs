//! The widget registry.
//!
//! Owns every live widget together with its baseline snapshot and the
//! per-type schema store. Every operation is synchronous and total: targets
//! that do not exist turn the operation into a no-op, reported through the
//! return value instead of an error.
//!
//! # Invariants
//!
//! - A baseline exists iff its widget exists (created and removed together).
//! - Re-registering an id replaces both the live widget and its baseline.
//! - Schemas are only ever removed by [`WidgetRegistry::clear_all`].

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::baseline::BaselineTracker;
use crate::schema::{Schema, SchemaMap, SchemaStore};
use crate::widget::{Properties, WidgetId, WidgetMap, WidgetRecord, WidgetView};

/// Result of [`WidgetRegistry::register_widget`].
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    /// The stored widget, enriched with schema and modified flag.
    pub view: WidgetView,
    /// Whether an existing widget with the same id was replaced.
    pub replaced: bool,
    /// Whether the supplied schema became the type's schema.
    pub schema_registered: bool,
}

#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    /// Live widgets, in first-registration order.
    widgets: IndexMap<WidgetId, WidgetRecord>,
    baselines: BaselineTracker,
    schemas: SchemaStore,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a widget, overwriting any existing widget with the same id.
    ///
    /// Always takes a fresh baseline equal to the supplied values. If `schema`
    /// is given and the type has no schema yet, it becomes the type's schema.
    pub fn register_widget(
        &mut self,
        id: WidgetId,
        widget_type: impl Into<String>,
        properties: Properties,
        schema: Option<Schema>,
    ) -> Registration {
        let record = WidgetRecord::new(id.clone(), widget_type, properties);

        let schema_registered = match schema {
            Some(schema) => self.schemas.register_if_absent(&record.widget_type, schema),
            None => false,
        };
        if schema_registered {
            info!(widget_type = %record.widget_type, "Registered schema");
        }

        self.baselines.capture(record.clone());
        let view = self.enrich(&record);
        let replaced = self.widgets.insert(id.clone(), record).is_some();

        info!(
            widget_id = %id,
            widget_type = %view.widget_type,
            replaced,
            total_widgets = self.widgets.len(),
            "Widget registered"
        );

        Registration {
            view,
            replaced,
            schema_registered,
        }
    }

    /// Removes a widget and its baseline. Returns `true` if the widget existed.
    pub fn unregister_widget(&mut self, id: &WidgetId) -> bool {
        if self.widgets.shift_remove(id).is_none() {
            debug!(widget_id = %id, "Unregister for unknown widget, ignoring");
            return false;
        }
        self.baselines.remove(id);

        info!(
            widget_id = %id,
            total_widgets = self.widgets.len(),
            "Widget unregistered"
        );
        true
    }

    /// Sets `properties[key] = value` on an existing widget.
    ///
    /// Returns `false` (and changes nothing) if the widget does not exist.
    /// The baseline is never touched.
    pub fn update_property(&mut self, id: &WidgetId, key: impl Into<String>, value: serde_json::Value) -> bool {
        let Some(widget) = self.widgets.get_mut(id) else {
            debug!(widget_id = %id, "Property update for unknown widget, ignoring");
            return false;
        };

        let key = key.into();
        debug!(widget_id = %id, key = %key, value = %value, "Widget property updated");
        widget.properties.insert(key, value);
        true
    }

    /// Restores a widget to its baseline (type and a deep copy of properties).
    ///
    /// Returns `false` unless both the widget and its baseline exist.
    pub fn reset_widget(&mut self, id: &WidgetId) -> bool {
        let (Some(widget), Some(baseline)) = (self.widgets.get_mut(id), self.baselines.get(id)) else {
            debug!(widget_id = %id, "Reset for widget without baseline, ignoring");
            return false;
        };

        widget.widget_type = baseline.widget_type.clone();
        widget.properties = baseline.properties.clone();

        info!(widget_id = %id, "Widget reset to baseline");
        true
    }

    /// Resets every registered widget. Returns how many were reset.
    pub fn reset_all_to_baseline(&mut self) -> usize {
        let ids: Vec<WidgetId> = self.widgets.keys().cloned().collect();
        let reset = ids.iter().filter(|id| self.reset_widget(id)).count();

        info!(reset, "All widgets reset to baseline");
        reset
    }

    /// Empties widgets, baselines and schemas together.
    pub fn clear_all(&mut self) {
        let widgets = self.widgets.len();
        let schemas = self.schemas.len();

        self.widgets.clear();
        self.baselines.clear();
        self.schemas.clear();

        info!(widgets, schemas, "Cleared all widgets and schemas");
    }

    /// `true` if the widget's live properties differ from its baseline.
    pub fn is_modified(&self, id: &WidgetId) -> bool {
        self.widgets
            .get(id)
            .is_some_and(|widget| self.baselines.is_modified(id, &widget.properties))
    }

    /// The enriched view of one widget.
    pub fn view(&self, id: &WidgetId) -> Option<WidgetView> {
        self.widgets.get(id).map(|widget| self.enrich(widget))
    }

    /// Enriched views of every widget, in first-registration order.
    pub fn list_all(&self) -> WidgetMap {
        self.widgets
            .iter()
            .map(|(id, widget)| (id.clone(), self.enrich(widget)))
            .collect()
    }

    pub fn contains(&self, id: &WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    pub fn has_baseline(&self, id: &WidgetId) -> bool {
        self.baselines.contains(id)
    }

    /// The baseline snapshot recorded for `id`.
    pub fn baseline(&self, id: &WidgetId) -> Option<&WidgetRecord> {
        self.baselines.get(id)
    }

    pub fn schema(&self, widget_type: &str) -> Option<&Schema> {
        self.schemas.get(widget_type)
    }

    pub fn schemas(&self) -> SchemaMap {
        self.schemas.snapshot()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    fn enrich(&self, widget: &WidgetRecord) -> WidgetView {
        let modified = self.baselines.is_modified(&widget.id, &widget.properties);
        WidgetView::from_record(widget, self.schemas.get(&widget.widget_type), modified)
    }
}
