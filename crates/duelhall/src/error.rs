//! Unified error type for the Duelhall engine.

use duelhall_protocol::ProtocolError;
use duelhall_room::RoomError;
use duelhall_store::StoreError;

use crate::CatalogError;

/// Top-level error that wraps all layer-specific errors.
///
/// Embedders deal with this single type; the `#[from]` attributes let
/// `?` convert layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DuelhallError {
    /// A room-level refusal (seat occupied, room locked, actor gone).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A persistence failure surfaced synchronously (hydration).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The deck catalog rejected or failed a lookup.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Encode/decode failure at the wire boundary.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
