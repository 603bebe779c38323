//! Persistence gateway for Duelhall rooms.
//!
//! The in-memory room is instantaneously authoritative for gameplay; the
//! store holds an eventually-consistent durable copy. This crate owns:
//!
//! - [`PersistedRoom`] — the durable row shape, and the conversions that
//!   strip transient fields (connections, activity flags) on the way in
//!   and restore defaults on the way out
//! - [`migrate`] — the one place old rows are upgraded to the current
//!   shape (no ad hoc field defaulting anywhere else)
//! - [`RoomStore`] — the storage trait, with [`MemoryStore`] (tests,
//!   demos) and [`JsonFileStore`] (one JSON file per room) backends
//! - [`WriteQueue`] — a per-room single-writer task that applies
//!   sequence-numbered writes in issuance order

#![allow(async_fn_in_trait)]

mod error;
mod json_file;
mod memory;
pub mod migrate;
mod row;
mod writer;

pub use error::StoreError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use row::{PersistedPlayer, PersistedRoom, SeatBinding, SpectatorRecord, ROW_VERSION};
pub use writer::WriteQueue;

use duelhall_protocol::RoomId;

/// Durable storage for room rows.
///
/// Implementations must be safe to share across tasks; every room's
/// write queue holds the store behind an `Arc`.
pub trait RoomStore: Send + Sync + 'static {
    /// Reads the row for a room, or `None` if the room was never saved.
    async fn load(&self, room_id: &RoomId) -> Result<Option<PersistedRoom>, StoreError>;

    /// Replaces the row for a room.
    fn save(
        &self,
        room_id: &RoomId,
        row: PersistedRoom,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
