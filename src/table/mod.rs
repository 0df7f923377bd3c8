//! Driver-facing dispatch for the engine.
//!
//! Each table runs as its own task with an mpsc command inbox, which gives
//! the engine the serialized access it requires. Events fan out through
//! per-player subscriptions; `DealtHole` is delivered only to its owner,
//! everything else to everyone. The network layer (accept loop, framing,
//! wire encoding) lives outside this crate and talks to a [`TableHandle`].

pub mod actor;
pub mod config;
pub mod messages;

pub use actor::{TableActor, TableHandle};
pub use config::TableConfig;
pub use messages::TableCommand;
