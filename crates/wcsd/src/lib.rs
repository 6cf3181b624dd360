//! WCS Daemon - widget registry and WebSocket broadcast server
//!
//! This crate provides the server side of live widget editing:
//! - `registry` - Actor that owns widget, style and schema state plus the observer set
//! - `router` - Applies one protocol message to the state and says who hears about it
//! - `broadcast` - Fans serialized events out to per-connection outboxes
//! - `server` - WebSocket endpoint and dashboard HTTP endpoint
//! - `config` - Layered server configuration
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          wcsd                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  ┌─────────────────┐     ┌─────────────────────────────┐   │
//! │  │  ConfigServer   │────▶│     RegistryActor           │   │
//! │  │  (WebSocket)    │     │  (SyncState owner, route)   │   │
//! │  └────────┬────────┘     └──────────────┬──────────────┘   │
//! │           │                             │                   │
//! │           │ connections                 │ events            │
//! │           ▼                             ▼                   │
//! │  ┌─────────────────┐     ┌─────────────────────────────┐   │
//! │  │   run_session   │◀────│   Dispatcher                │   │
//! │  │  (per client)   │     │   (per-connection outbox)   │   │
//! │  └─────────────────┘     └─────────────────────────────┘   │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Panic-Free Guarantees
//!
//! All production code in this crate follows the panic-free policy:
//! - No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, `todo!()`
//! - All fallible operations return `Result` or `Option`
//! - Channel operations handle closure gracefully

pub mod broadcast;
pub mod config;
pub mod registry;
pub mod router;
pub mod server;
