//! The state context owned by the daemon.
//!
//! `SyncState` bundles everything observers synchronize on: the widget
//! registry (with its baselines and schemas) and the styles document. The
//! daemon constructs exactly one at startup and hands it to the single task
//! that processes messages; nothing else mutates it.

use serde::{Deserialize, Serialize};

use crate::registry::WidgetRegistry;
use crate::schema::SchemaMap;
use crate::styles::Styles;
use crate::widget::WidgetMap;

#[derive(Debug, Clone, Default)]
pub struct SyncState {
    pub registry: WidgetRegistry,
    pub styles: Styles,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the full observable state.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            widgets: self.registry.list_all(),
            styles: self.styles.clone(),
            schemas: self.registry.schemas(),
        }
    }
}

/// Point-in-time copy of everything `get_all` reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub widgets: WidgetMap,
    pub styles: Styles,
    pub schemas: SchemaMap,
}
