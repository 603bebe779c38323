//! Shared match state and the phase machine.

use serde::{Deserialize, Serialize};

use crate::zone::SlotZone;

/// The lifecycle phase of a match.
///
/// ```text
/// Waiting ──(both decks locked)──→ Playing
///    ↑                                │
///    └────────(mutual restart)────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Seats are binding and decks are being picked.
    Waiting,
    /// The match is live; actions mutate zones and resources.
    Playing,
}

impl Phase {
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Playing => write!(f, "playing"),
        }
    }
}

/// Turn-order and board state shared by both players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub phase: Phase,
    /// Index into the room's ordered player list.
    pub current_player_index: usize,
    /// Who went first this match; drives round increments.
    pub first_player_index: usize,
    pub round: u32,
    /// A neutral slot array both players can move cards onto.
    pub shared_board: SlotZone,
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Waiting,
            current_player_index: 0,
            first_player_index: 0,
            round: 1,
            shared_board: SlotZone::new(),
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}
