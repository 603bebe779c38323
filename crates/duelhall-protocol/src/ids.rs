//! Identity newtypes.
//!
//! Rooms, users, and decks are all identified by opaque strings issued by
//! the auth/catalog layers outside this engine. Wrapping them in newtypes
//! keeps a `RoomId` from being passed where a `UserId` is expected, at
//! zero runtime cost.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A room identifier, issued by the lobby layer.
///
/// `#[serde(transparent)]` serializes this as a bare string, so a
/// `RoomId("r-42")` is just `"r-42"` on the wire and in storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user identifier, issued by the auth layer.
///
/// This is the *stable* identity of a participant: it survives socket
/// churn, reconnects, and process restarts. Everything keyed "per player"
/// is keyed by `UserId`, never by connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A deck identifier in the external catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckId(pub String);

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two durable participant slots in a room.
///
/// A seat is independent of any transient connection: the seat map records
/// which `UserId` owns each label, and that record outlives disconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeatLabel {
    A,
    B,
}

impl SeatLabel {
    /// Both labels, in index order (A is player index 0 by convention).
    pub const ALL: [SeatLabel; 2] = [SeatLabel::A, SeatLabel::B];

    /// The other seat.
    pub fn opposite(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}
