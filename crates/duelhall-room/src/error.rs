//! Error types for the room layer.

use duelhall_protocol::{RoomId, SeatLabel};

/// Errors that can occur during room operations.
///
/// Action-level failures never appear here — the dispatcher resolves
/// those internally (see `duelhall-match`). These are the structural
/// refusals a caller must hear about.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The seat is bound to a different user.
    #[error("seat {0} is bound to another user")]
    SeatOccupied(SeatLabel),

    /// The match has started; only the original seat-holders may rebind.
    #[error("room {0} is locked")]
    Locked(RoomId),

    /// The room's command channel is closed (actor gone).
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),

    /// Loading the room's durable row failed.
    #[error(transparent)]
    Store(#[from] duelhall_store::StoreError),
}
