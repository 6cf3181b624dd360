//! Registry actor commands and errors.
//!
//! This module defines the message types for communicating with the `RegistryActor`:
//! - `RegistryCommand`: Commands sent to the actor
//! - `RegistryError`: Errors that can occur when talking to the actor
//!
//! All types are designed for async message passing and follow the panic-free policy.

use thiserror::Error;
use tokio::sync::oneshot;

use wcs_core::StateSnapshot;
use wcs_protocol::ClientMessage;

use crate::broadcast::{ConnectionId, Outbox};

// ============================================================================
// Registry Commands
// ============================================================================

/// Commands sent to the registry actor.
///
/// The actor handles them strictly one at a time, in arrival order. Queries
/// carry a oneshot channel for the response.
#[derive(Debug)]
pub enum RegistryCommand {
    /// A connection opened; add it to the observer set.
    Connect {
        /// The new connection
        connection: ConnectionId,
        /// Queue its writer task drains
        outbox: Outbox,
    },

    /// A connection closed; remove it from the observer set.
    Disconnect {
        /// The closed connection
        connection: ConnectionId,
    },

    /// A decoded protocol message from a connection.
    ///
    /// The message is boxed to reduce enum size variance.
    Inbound {
        /// Connection the message arrived on (target of replies)
        connection: ConnectionId,
        /// The decoded message (boxed for size optimization)
        message: Box<ClientMessage>,
    },

    /// Get a copy of widgets, styles and schemas.
    Snapshot {
        /// Channel to send the result
        respond_to: oneshot::Sender<StateSnapshot>,
    },

    /// Get the number of connected observers.
    ObserverCount {
        /// Channel to send the result
        respond_to: oneshot::Sender<usize>,
    },
}

// ============================================================================
// Registry Errors
// ============================================================================

/// Errors that can occur when sending commands to the registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The command or response channel was closed.
    ///
    /// This typically indicates the actor was shut down.
    #[error("registry channel closed")]
    ChannelClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_display() {
        assert_eq!(RegistryError::ChannelClosed.to_string(), "registry channel closed");
    }

    #[tokio::test]
    async fn test_command_oneshot_pattern() {
        let (tx, rx) = oneshot::channel::<usize>();

        // Simulate actor receiving and responding
        tokio::spawn(async move {
            tx.send(3).ok();
        });

        assert_eq!(rx.await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_command_channel_closed_error() {
        let (tx, rx) = oneshot::channel::<StateSnapshot>();

        // Drop sender without sending
        drop(tx);

        assert!(rx.await.is_err());
    }
}
