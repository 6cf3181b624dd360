//! Client interface for interacting with the RegistryActor.
//!
//! The `RegistryHandle` provides a cheap-to-clone interface for sending commands
//! to the registry actor.
//!
//! # Panic-Free Guarantees
//!
//! This module follows the panic-free policy:
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - All fallible operations use `?`, pattern matching, or `unwrap_or`
//! - Channel errors are mapped to `RegistryError::ChannelClosed`

use tokio::sync::{mpsc, oneshot};

use wcs_core::StateSnapshot;
use wcs_protocol::ClientMessage;

use super::commands::{RegistryCommand, RegistryError};
use crate::broadcast::{ConnectionId, Outbox};

// ============================================================================
// Registry Handle
// ============================================================================

/// Handle for interacting with the registry actor.
///
/// This is a cheap-to-clone handle that can be shared across tasks.
/// All methods are async and communicate with the actor via channels.
///
/// # Usage
///
/// ```ignore
/// // Clone the handle to share across connection tasks
/// let handle = registry_handle.clone();
///
/// // Join the observer set, then submit messages
/// handle.connect(connection, outbox).await?;
/// handle.submit(connection, ClientMessage::get_all()).await?;
///
/// // Leave when the socket closes
/// handle.disconnect(connection).await?;
/// ```
#[derive(Clone)]
pub struct RegistryHandle {
    /// Command sender to the actor
    sender: mpsc::Sender<RegistryCommand>,
}

impl RegistryHandle {
    /// Create a new registry handle.
    ///
    /// # Arguments
    ///
    /// * `sender` - The command channel sender for communicating with the actor
    pub fn new(sender: mpsc::Sender<RegistryCommand>) -> Self {
        Self { sender }
    }

    /// Add a connection to the observer set.
    ///
    /// Every event broadcast after the actor processes this command is
    /// enqueued on `outbox`.
    ///
    /// # Errors
    ///
    /// - `RegistryError::ChannelClosed` if the actor has shut down
    pub async fn connect(&self, connection: ConnectionId, outbox: Outbox) -> Result<(), RegistryError> {
        self.send(RegistryCommand::Connect { connection, outbox }).await
    }

    /// Remove a connection from the observer set.
    ///
    /// # Errors
    ///
    /// - `RegistryError::ChannelClosed` if the actor has shut down
    pub async fn disconnect(&self, connection: ConnectionId) -> Result<(), RegistryError> {
        self.send(RegistryCommand::Disconnect { connection }).await
    }

    /// Submit a decoded message for processing.
    ///
    /// Returns once the message is queued; messages from one caller are
    /// processed in the order they were submitted.
    ///
    /// # Errors
    ///
    /// - `RegistryError::ChannelClosed` if the actor has shut down
    pub async fn submit(&self, connection: ConnectionId, message: ClientMessage) -> Result<(), RegistryError> {
        self.send(RegistryCommand::Inbound {
            connection,
            message: Box::new(message),
        })
        .await
    }

    /// Get a copy of widgets, styles and schemas.
    ///
    /// # Errors
    ///
    /// - `RegistryError::ChannelClosed` if the actor has shut down
    pub async fn snapshot(&self) -> Result<StateSnapshot, RegistryError> {
        let (tx, rx) = oneshot::channel();

        self.send(RegistryCommand::Snapshot { respond_to: tx }).await?;

        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }

    /// Get the number of connected observers.
    ///
    /// Returns 0 if communication with the actor fails.
    pub async fn observer_count(&self) -> usize {
        let (tx, rx) = oneshot::channel();

        if self
            .send(RegistryCommand::ObserverCount { respond_to: tx })
            .await
            .is_err()
        {
            return 0;
        }

        rx.await.unwrap_or_default()
    }

    /// Check if the registry actor is still running.
    ///
    /// This is a synchronous operation - it doesn't communicate with the actor.
    pub fn is_connected(&self) -> bool {
        !self.sender.is_closed()
    }

    async fn send(&self, cmd: RegistryCommand) -> Result<(), RegistryError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RegistryError::ChannelClosed)
    }
}
