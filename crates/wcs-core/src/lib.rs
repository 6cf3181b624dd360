//! WCS Core - Shared state types for the widget config server
//!
//! This crate provides the in-memory state the daemon (wcsd) synchronizes
//! between a running client application and its dashboards:
//! - `widget` - widget identifiers, records and enriched views
//! - `baseline` - first-registration snapshots and "modified" tracking
//! - `schema` - per-widget-type schema metadata (first writer wins)
//! - `styles` - the global styles document
//! - `registry` - the widget registry tying the above together
//! - `state` - the single state context owned by the daemon
//!
//! Nothing here performs I/O. All code follows the panic-free policy: no
//! `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`, or
//! direct indexing `[i]`.

pub mod baseline;
pub mod registry;
pub mod schema;
pub mod state;
pub mod styles;
pub mod widget;

// Re-exports for convenience
pub use baseline::BaselineTracker;
pub use registry::{Registration, WidgetRegistry};
pub use schema::{Schema, SchemaMap, SchemaStore};
pub use state::{StateSnapshot, SyncState};
pub use styles::{Styles, STYLE_CATEGORIES};
pub use widget::{Properties, WidgetId, WidgetMap, WidgetRecord, WidgetView, UNKNOWN_WIDGET_TYPE};
