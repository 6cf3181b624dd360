//! Protocol router - applies one decoded message to the state.
//!
//! `route` is the dispatch table of the protocol. It performs exactly one
//! state action per message and returns the events to emit, tagged with who
//! receives them. It never does I/O; the registry actor hands the result to
//! the broadcast dispatcher.
//!
//! | inbound             | emits                                            |
//! |---------------------|--------------------------------------------------|
//! | `register`          | broadcast `update`                               |
//! | `unregister`        | broadcast `widgets` (only if the widget existed) |
//! | `get_all`           | reply `widgets`, `styles`, `schemas`             |
//! | `styles`            | broadcast `styles`                               |
//! | `update_prop`       | broadcast `update` (only if the widget exists)   |
//! | `reset`             | broadcast `update` (only if it has a baseline)   |
//! | `reset_all_changes` | broadcast `widgets`                              |
//! | `reset_all`         | broadcast `widgets` then `schemas`, both empty   |

use tracing::debug;

use wcs_core::{SchemaMap, SyncState, WidgetId, WidgetMap};
use wcs_protocol::{ClientMessage, ServerEvent};

/// One event produced by routing, with its audience.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Deliver to every connected observer
    Broadcast(ServerEvent),
    /// Deliver only to the connection the message came from
    Reply(ServerEvent),
}

/// Applies `message` to `state` and returns the events to emit, in order.
pub fn route(state: &mut SyncState, message: ClientMessage) -> Vec<Outbound> {
    match message {
        ClientMessage::Register {
            id,
            widget_type,
            properties,
            schema,
        } => {
            let widget_type = ClientMessage::resolved_widget_type(widget_type);
            let registration = state
                .registry
                .register_widget(id, widget_type, properties, schema);
            vec![Outbound::Broadcast(ServerEvent::update(registration.view))]
        }

        ClientMessage::Unregister { id } => {
            if state.registry.unregister_widget(&id) {
                vec![Outbound::Broadcast(widgets_snapshot(state))]
            } else {
                Vec::new()
            }
        }

        ClientMessage::GetAll => vec![
            Outbound::Reply(widgets_snapshot(state)),
            Outbound::Reply(ServerEvent::styles(state.styles.clone())),
            Outbound::Reply(ServerEvent::schemas(state.registry.schemas())),
        ],

        ClientMessage::Styles { data } => {
            state.styles.merge(data);
            debug!(categories = ?state.styles.categories().collect::<Vec<_>>(), "Updated styles");
            vec![Outbound::Broadcast(ServerEvent::styles(state.styles.clone()))]
        }

        ClientMessage::UpdateProp { id, key, value } => {
            if state.registry.update_property(&id, key, value) {
                widget_update(state, &id)
            } else {
                Vec::new()
            }
        }

        ClientMessage::Reset { id } => {
            if state.registry.reset_widget(&id) {
                widget_update(state, &id)
            } else {
                Vec::new()
            }
        }

        ClientMessage::ResetAllChanges => {
            state.registry.reset_all_to_baseline();
            vec![Outbound::Broadcast(widgets_snapshot(state))]
        }

        ClientMessage::ResetAll => {
            state.registry.clear_all();
            vec![
                Outbound::Broadcast(ServerEvent::widgets(WidgetMap::new())),
                Outbound::Broadcast(ServerEvent::schemas(SchemaMap::new())),
            ]
        }

        ClientMessage::Unrecognized => {
            debug!("Ignoring message with unrecognized type");
            Vec::new()
        }
    }
}

fn widgets_snapshot(state: &SyncState) -> ServerEvent {
    ServerEvent::widgets(state.registry.list_all())
}

fn widget_update(state: &SyncState, id: &WidgetId) -> Vec<Outbound> {
    state
        .registry
        .view(id)
        .map(|view| vec![Outbound::Broadcast(ServerEvent::update(view))])
        .unwrap_or_default()
}
