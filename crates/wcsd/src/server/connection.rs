//! Per-connection WebSocket session.
//!
//! Each upgraded socket is split in two:
//! - a writer task drains the connection's outbox onto the socket
//! - the read loop decodes frames and submits them to the registry
//!
//! The session joins the observer set before reading anything and leaves it
//! when the read loop ends (close frame, transport error or shutdown).
//!
//! # Panic-Free Guarantees
//!
//! This module follows the panic-free policy:
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - Malformed input is logged and skipped, never fatal to the connection

use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use wcs_protocol::ClientMessage;

use crate::broadcast::{ConnectionId, Frame};
use crate::registry::RegistryHandle;

/// Runs a session until the client goes away or `cancel_token` fires.
pub async fn run_session(
    socket: WebSocket,
    connection: ConnectionId,
    registry: RegistryHandle,
    outbox_capacity: usize,
    cancel_token: CancellationToken,
) {
    let (ws_tx, mut ws_rx) = socket.split();
    let (outbox, outbox_rx) = mpsc::channel::<Frame>(outbox_capacity);

    if registry.connect(connection, outbox).await.is_err() {
        warn!(connection = %connection, "Registry unavailable, dropping connection");
        return;
    }

    let writer = spawn_writer(connection, ws_tx, outbox_rx);

    loop {
        let frame = tokio::select! {
            _ = cancel_token.cancelled() => {
                debug!(connection = %connection, "Session shutting down");
                break;
            }
            frame = ws_rx.next() => frame,
        };

        let msg = match frame {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                debug!(connection = %connection, error = %e, "WebSocket read error");
                break;
            }
            None => break,
        };

        let text = match msg {
            Message::Text(ref t) => t.as_str().to_string(),
            Message::Binary(ref data) => match std::str::from_utf8(data) {
                Ok(s) => s.to_string(),
                Err(_) => {
                    debug!(connection = %connection, len = data.len(), "Ignoring non-UTF8 binary frame");
                    continue;
                }
            },
            Message::Close(_) => {
                debug!(connection = %connection, "Client sent close frame");
                break;
            }
            Message::Ping(_) | Message::Pong(_) => continue,
        };

        let message = match ClientMessage::decode(&text) {
            Ok(message) => message,
            Err(e) => {
                warn!(connection = %connection, error = %e, "Discarding undecodable message");
                continue;
            }
        };

        if registry.submit(connection, message).await.is_err() {
            warn!(connection = %connection, "Registry unavailable, closing connection");
            break;
        }
    }

    // Ignore error - the registry may already be gone during shutdown
    let _ = registry.disconnect(connection).await;
    writer.abort();
    info!(connection = %connection, "Session ended");
}

/// Forwards queued frames to the socket until the outbox closes or a write
/// fails.
fn spawn_writer(
    connection: ConnectionId,
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut outbox_rx: mpsc::Receiver<Frame>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = outbox_rx.recv().await {
            if let Err(e) = ws_tx.send(Message::Text(frame.to_string().into())).await {
                debug!(connection = %connection, error = %e, "WebSocket write failed");
                break;
            }
        }
        let _ = ws_tx.close().await;
    })
}
