//! Room lifecycle for Duelhall.
//!
//! Each room runs as an isolated tokio task (actor model) owning its
//! match core, seat map, spectators, and action log. All mutation
//! requests for a room serialize through that actor's inbox, which is
//! the engine's single-writer safety property: an action runs
//! read-validate-mutate to completion before the next one is looked at,
//! for that room, always.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — roomId → live actor, hydrating cold rooms from
//!   the store on first touch
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`SeatMap`] — the durable seat-label → user binding record
//! - [`ServerEvent`] — everything a room pushes to its sockets

mod error;
mod events;
mod registry;
mod room;
mod seats;

pub use error::RoomError;
pub use events::{ClientSender, RoomSnapshot, SeatStatus, ServerEvent};
pub use registry::RoomRegistry;
pub use room::{DeckSelection, RoomHandle, RoomInfo, RoomRuntime};
pub use seats::{now_ms, SeatMap};
