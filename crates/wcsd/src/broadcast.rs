//! Broadcast dispatcher - delivers events to connected observers.
//!
//! The dispatcher owns the observer set. Each observer is represented by its
//! outbound queue (`Outbox`); a writer task per connection drains that queue
//! onto the socket. Enqueueing never waits, so fanning an event out can not
//! stall the registry actor on a slow client.
//!
//! Delivery is independent per observer:
//! - a full queue drops the event for that observer only (at-most-once)
//! - a closed queue means the connection is gone; the observer is removed
//! - neither outcome affects delivery to anyone else

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, warn};

use wcs_protocol::ServerEvent;

/// A serialized event, shared between every recipient.
pub type Frame = Arc<str>;

/// Outbound queue of one connection.
pub type Outbox = mpsc::Sender<Frame>;

/// Identifies one transport connection for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Per-observer outcome counts of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Observers the event was enqueued for
    pub delivered: usize,
    /// Observers whose queue was full (event dropped, observer kept)
    pub dropped: usize,
    /// Observers whose connection had closed (observer removed)
    pub disconnected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Delivered,
    Dropped,
    Disconnected,
}

/// The observer set plus the fan-out logic.
#[derive(Debug, Default)]
pub struct Dispatcher {
    observers: HashMap<ConnectionId, Outbox>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer. Returns the number of connected observers.
    ///
    /// A connection that is already present gets its outbox replaced.
    pub fn on_connect(&mut self, connection: ConnectionId, outbox: Outbox) -> usize {
        self.observers.insert(connection, outbox);
        self.observers.len()
    }

    /// Removes an observer. Returns `true` if it was present.
    pub fn on_disconnect(&mut self, connection: ConnectionId) -> bool {
        self.observers.remove(&connection).is_some()
    }

    /// Delivers `event` to every connected observer.
    pub fn broadcast(&mut self, event: &ServerEvent) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let Some(frame) = encode(event) else {
            return report;
        };

        let mut closed = Vec::new();
        for (connection, outbox) in &self.observers {
            match deliver(*connection, outbox, &frame) {
                Delivery::Delivered => report.delivered += 1,
                Delivery::Dropped => report.dropped += 1,
                Delivery::Disconnected => {
                    report.disconnected += 1;
                    closed.push(*connection);
                }
            }
        }

        for connection in closed {
            self.observers.remove(&connection);
            debug!(connection = %connection, "Removed closed observer");
        }

        debug!(
            event_type = event.event_type(),
            delivered = report.delivered,
            dropped = report.dropped,
            disconnected = report.disconnected,
            "Broadcast event"
        );

        report
    }

    /// Delivers `events` to `connection` only, in order.
    ///
    /// All-or-nothing: if any event fails to encode or the outbox lacks room
    /// for the whole batch, nothing is enqueued. Returns `true` if enqueued.
    pub fn reply_to(&mut self, connection: ConnectionId, events: &[ServerEvent]) -> bool {
        let Some(outbox) = self.observers.get(&connection) else {
            debug!(connection = %connection, "Reply to unknown connection, dropping");
            return false;
        };
        if outbox.is_closed() {
            self.observers.remove(&connection);
            return false;
        }

        let Some(frames) = events.iter().map(encode).collect::<Option<Vec<_>>>() else {
            return false;
        };

        // The dispatcher is the only sender, so room can only grow after this check
        if outbox.capacity() < frames.len() {
            warn!(
                connection = %connection,
                events = frames.len(),
                "Observer queue lacks room for reply, dropping"
            );
            return false;
        }

        for frame in &frames {
            match deliver(connection, outbox, frame) {
                Delivery::Delivered => {}
                Delivery::Dropped => return false,
                Delivery::Disconnected => {
                    self.observers.remove(&connection);
                    return false;
                }
            }
        }
        true
    }

    pub fn contains(&self, connection: ConnectionId) -> bool {
        self.observers.contains_key(&connection)
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

fn encode(event: &ServerEvent) -> Option<Frame> {
    match event.encode() {
        Ok(json) => Some(Frame::from(json)),
        Err(e) => {
            error!(event_type = event.event_type(), error = %e, "Failed to serialize event");
            None
        }
    }
}

fn deliver(connection: ConnectionId, outbox: &Outbox, frame: &Frame) -> Delivery {
    match outbox.try_send(Arc::clone(frame)) {
        Ok(()) => Delivery::Delivered,
        Err(TrySendError::Full(_)) => {
            warn!(connection = %connection, "Observer queue full, dropping event");
            Delivery::Dropped
        }
        Err(TrySendError::Closed(_)) => Delivery::Disconnected,
    }
}
