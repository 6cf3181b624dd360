//! Registry actor - owns all synchronized state and the observer set.
//!
//! The RegistryActor is the single owner of widget state in the system.
//! It receives commands via an mpsc channel and fans events out through the
//! broadcast dispatcher.
//!
//! # Panic-Free Guarantees
//!
//! This module follows the panic-free policy:
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - All fallible operations use `?`, pattern matching, or `unwrap_or`
//! - Channel send failures are logged but don't panic

use tokio::sync::mpsc;
use tracing::{debug, info};

use wcs_core::SyncState;
use wcs_protocol::{ClientMessage, ServerEvent};

use super::commands::RegistryCommand;
use crate::broadcast::{ConnectionId, Dispatcher, Outbox};
use crate::router::{route, Outbound};

// ============================================================================
// Registry Actor
// ============================================================================

/// The registry actor - owns all widget, style and observer state.
///
/// Implements the actor pattern: receives commands via mpsc channel,
/// processes them sequentially, and delivers events to observers.
///
/// # Thread Safety
///
/// The actor runs in a single task and processes commands sequentially.
/// Every effect of one inbound message, broadcasts included, is complete
/// before the next command is taken off the channel. No command handler
/// awaits, so no other work can interleave with a state mutation.
pub struct RegistryActor {
    /// Command receiver
    receiver: mpsc::Receiver<RegistryCommand>,

    /// Widgets, baselines, schemas and styles
    state: SyncState,

    /// Connected observers
    dispatcher: Dispatcher,
}

impl RegistryActor {
    /// Creates a new registry actor with empty state.
    pub fn new(receiver: mpsc::Receiver<RegistryCommand>) -> Self {
        Self {
            receiver,
            state: SyncState::new(),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Runs the actor event loop.
    ///
    /// Processes commands until the channel closes (all senders dropped).
    /// This is the main entry point - call this in a spawned task.
    pub async fn run(mut self) {
        info!("Registry actor starting");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!(
            widgets = self.state.registry.len(),
            observers = self.dispatcher.len(),
            "Registry actor stopped"
        );
    }

    /// Dispatches a command to the appropriate handler.
    fn handle_command(&mut self, cmd: RegistryCommand) {
        match cmd {
            RegistryCommand::Connect { connection, outbox } => {
                self.handle_connect(connection, outbox);
            }
            RegistryCommand::Disconnect { connection } => {
                self.handle_disconnect(connection);
            }
            RegistryCommand::Inbound {
                connection,
                message,
            } => {
                self.handle_inbound(connection, *message);
            }
            RegistryCommand::Snapshot { respond_to } => {
                // Ignore send error - client may have dropped the receiver
                let _ = respond_to.send(self.state.snapshot());
            }
            RegistryCommand::ObserverCount { respond_to } => {
                let _ = respond_to.send(self.dispatcher.len());
            }
        }
    }

    // ========================================================================
    // Command Handlers
    // ========================================================================

    /// Adds a connection to the observer set.
    ///
    /// No state is pushed on connect; the client asks with `get_all`.
    fn handle_connect(&mut self, connection: ConnectionId, outbox: Outbox) {
        let total = self.dispatcher.on_connect(connection, outbox);
        info!(connection = %connection, total_clients = total, "Client connected");
    }

    fn handle_disconnect(&mut self, connection: ConnectionId) {
        // Broadcast may already have dropped it after a failed send
        let was_present = self.dispatcher.on_disconnect(connection);
        info!(
            connection = %connection,
            was_present,
            total_clients = self.dispatcher.len(),
            "Client disconnected"
        );
    }

    /// Routes one message and delivers what it produced.
    fn handle_inbound(&mut self, connection: ConnectionId, message: ClientMessage) {
        let message_type = message.message_type();
        let outbound = route(&mut self.state, message);

        debug!(
            connection = %connection,
            message_type,
            events = outbound.len(),
            "Message handled"
        );

        // Consecutive replies go out as one batch so a reply is never partial
        let mut replies = Vec::new();
        for event in outbound {
            match event {
                Outbound::Broadcast(event) => {
                    self.flush_replies(connection, &mut replies);
                    self.dispatcher.broadcast(&event);
                }
                Outbound::Reply(event) => replies.push(event),
            }
        }
        self.flush_replies(connection, &mut replies);
    }

    fn flush_replies(&mut self, connection: ConnectionId, replies: &mut Vec<ServerEvent>) {
        if replies.is_empty() {
            return;
        }
        if !self.dispatcher.reply_to(connection, replies) {
            debug!(connection = %connection, events = replies.len(), "Reply not delivered");
        }
        replies.clear();
    }

    // ========================================================================
    // Accessors (for testing)
    // ========================================================================

    /// Returns the number of widgets currently registered.
    #[cfg(test)]
    pub fn widget_count(&self) -> usize {
        self.state.registry.len()
    }

    /// Returns the number of connected observers.
    #[cfg(test)]
    pub fn observer_count(&self) -> usize {
        self.dispatcher.len()
    }
}
