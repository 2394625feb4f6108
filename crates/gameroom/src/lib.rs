//! Async runtime for live poker rooms.
//!
//! Each room is a single cooperative task owning one `pokerd_gameplay::Table`
//! and a bounded inbound command queue; it sequences join/leave/action/chat
//! commands from the session multiplexer, applies them to the table, fans
//! out per-recipient state, and persists snapshots and hand history through
//! `pokerd_database`.
//!
//! ## Submodules
//!
//! - [`room`] — the room coordinator: command dispatch, fan-out, persistence
//! - [`connections`] — per-seat/spectator outbound channel registry
//! - [`context`] — accumulates one hand's action log for persistence
//! - [`timer`] — persist-interval and idle-purge bookkeeping
//! - [`event`] — the room's internal vocabulary of things that happened
//! - [`protocol`] — translation between `Event`/`Table` and the wire envelope
//! - [`message`] — the wire envelope types (`ClientMessage`/`ServerMessage`)
mod connections;
mod context;
mod event;
mod message;
mod protocol;
mod registry;
mod room;
mod timer;

pub use connections::Connections;
pub use context::{ActionRecord, HandContext};
pub use event::Event;
pub use message::*;
pub use protocol::{Protocol, ProtocolError, Viewer};
pub use registry::{Registry, TableSettings};
pub use room::{Command, Room, RoomHandle, SignalKind};
pub use timer::{Timer, TimerConfig};
