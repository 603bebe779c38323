//! Outbound events: everything a room pushes to its sockets.

use duelhall_match::{CardInstance, LogEntry, MatchState, PlayerRuntime};
use duelhall_protocol::{RoomId, SeatLabel, UserId};
use duelhall_store::SpectatorRecord;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Channel sender standing in for one client socket. The transport
/// layer owns the receiving half and forwards events onto the wire.
pub type ClientSender = mpsc::UnboundedSender<ServerEvent>;

/// One seat's availability, as shown to a joining non-spectator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatStatus {
    pub seat: SeatLabel,
    /// Username of the current holder, if bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub held_by: Option<String>,
}

/// Full room state, sent after every mutating action and on join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub players: Vec<PlayerRuntime>,
    pub spectators: Vec<SpectatorRecord>,
    pub match_state: MatchState,
    pub log: Vec<LogEntry>,
    pub locked: bool,
}

/// Events delivered to clients subscribed to a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Broadcast: the authoritative room state.
    StateSnapshot { room: RoomSnapshot },

    /// Broadcast: one action-log line, pushed live as it happens.
    LogEvent {
        message: String,
        actor: String,
        action: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        card: Option<CardInstance>,
    },

    /// To a joining non-spectator who has no seat yet: what's free.
    SeatAvailability {
        seats: Vec<SeatStatus>,
        locked: bool,
        /// Seat-holders' user ids, so a returning client can tell it is
        /// allowed to rebind.
        known_user_ids: Vec<UserId>,
    },

    /// To the requesting player only: their deck list.
    DeckContents { cards: Vec<CardInstance> },
}

impl From<&LogEntry> for ServerEvent {
    fn from(entry: &LogEntry) -> Self {
        Self::LogEvent {
            message: entry.message.clone(),
            actor: entry.actor.clone(),
            action: entry.action.clone(),
            card: entry.card.clone(),
        }
    }
}
