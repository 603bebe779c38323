//! Match state and action dispatch for Duelhall.
//!
//! Everything in this crate is synchronous and I/O-free: a [`MatchCore`]
//! is plain data, and [`MatchCore::apply`] is a total function from
//! `(acting user, action)` to an [`Applied`] outcome. The async room
//! actor above owns a core and serializes calls into it; this crate never
//! needs to know about channels, sockets, or storage.
//!
//! # Key types
//!
//! - [`MatchCore`] — the two players plus shared match state
//! - [`Action`] — the closed union of everything a client can do
//! - [`Applied`] — what an action produced (mutation, broadcast, card)
//! - [`DenseZone`] / [`SlotZone`] — the two zone disciplines
//! - [`ActionLog`] — bounded ring of human-readable log entries

mod action;
mod card;
mod dispatch;
mod error;
mod log;
mod player;
mod setup;
mod state;
mod zone;

pub use action::{Action, Placement, PrivateReply, SlotArea, StatKind, ZoneId};
pub use card::{CardInstance, CardSpec};
pub use dispatch::{Applied, MatchCore};
pub use error::ActionError;
pub use log::{ActionLog, LogEntry, LOG_CAPACITY};
pub use player::{DeckRef, PlayerRuntime};
pub use setup::{FIRST_PLAYER_HAND, SECOND_PLAYER_HAND, STARTING_HEALTH};
pub use state::{MatchState, Phase};
pub use zone::{DenseZone, SlotZone, MAX_SLOTS, MIN_SLOTS};

/// Auto-increment ceiling for `max_mana` during end-turn. A player who
/// manually pushes `max_mana` past this is left alone.
pub const MANA_GROWTH_CAP: i32 = 10;

/// Ceiling for `chapter_tokens`, applied at every call site that touches
/// the field.
pub const CHAPTER_TOKEN_CAP: u32 = 3;

/// Client-declared card cost meaning "do not charge mana".
pub const COST_WILDCARD: i32 = -1;
