//! WCS Protocol - Wire protocol for the widget config server
//!
//! This crate provides the message types exchanged over the WebSocket
//! endpoint: `ClientMessage` for anything a client application or dashboard
//! sends, and `ServerEvent` for the `{type, data}` events the daemon emits.
//!
//! The protocol carries no version field and no correlation ids; replies to
//! `get_all` are matched to the request by their position in the stream.

pub mod event;
pub mod message;

pub use event::ServerEvent;
pub use message::{ClientMessage, DecodeError};
