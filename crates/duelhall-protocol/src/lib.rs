//! Identity types and wire codecs for Duelhall.
//!
//! This crate is the bottom of the stack: it defines the newtype
//! identifiers every other layer speaks in, and the [`Codec`] abstraction
//! used wherever a value has to cross a process boundary (persisted rows,
//! outbound socket events).
//!
//! ```text
//! Store / Room / Engine (above)  ← use the ids and codecs
//!      ↕
//! Protocol (this crate)          ← RoomId, UserId, SeatLabel, Codec
//! ```

mod codec;
mod error;
mod ids;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use ids::{DeckId, RoomId, SeatLabel, UserId};
