//! The durable row shape and runtime conversions.

use std::collections::BTreeMap;

use duelhall_match::{ActionLog, DeckRef, DenseZone, LogEntry, MatchState, PlayerRuntime, SlotZone};
use duelhall_protocol::{SeatLabel, UserId};
use serde::{Deserialize, Serialize};

/// Current row schema version. Bump when a field is added and teach
/// [`migrate`](crate::migrate) how to upgrade older rows.
pub const ROW_VERSION: u32 = 2;

/// The durable record of who owns a seat, independent of any player
/// runtime. Consulted before letting a user occupy a seat in a locked
/// room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatBinding {
    pub user_id: UserId,
    pub username: String,
    pub bound_at: u64,
}

/// A spectator, as persisted (no connection handle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectatorRecord {
    pub user_id: UserId,
    pub username: String,
}

/// A player runtime with transient fields stripped.
///
/// `is_active` and the live connection are connection facts, not match
/// facts — they are dropped on the way to storage and re-derived on
/// rehydration (a player loaded from a cold row is never active).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedPlayer {
    pub user_id: UserId,
    pub username: String,
    pub seat: SeatLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_ref: Option<DeckRef>,
    pub deck_locked: bool,
    pub health: i32,
    pub max_health: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub chapter_progress: u32,
    pub max_chapter_progress: u32,
    pub chapter_tokens: u32,
    pub turns_completed: u32,
    pub hand: DenseZone,
    pub deck: DenseZone,
    pub graveyard: DenseZone,
    pub battlefield: SlotZone,
    pub effect_zone: SlotZone,
    pub battlefield_slots: usize,
    pub effect_slots: usize,
    pub temporary_leave: bool,
    pub restart_requested: bool,
    pub displayed_hand: bool,
    pub first_draw_hint: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl From<&PlayerRuntime> for PersistedPlayer {
    fn from(p: &PlayerRuntime) -> Self {
        Self {
            user_id: p.user_id.clone(),
            username: p.username.clone(),
            seat: p.seat,
            deck_ref: p.deck_ref.clone(),
            deck_locked: p.deck_locked,
            health: p.health,
            max_health: p.max_health,
            mana: p.mana,
            max_mana: p.max_mana,
            chapter_progress: p.chapter_progress,
            max_chapter_progress: p.max_chapter_progress,
            chapter_tokens: p.chapter_tokens,
            turns_completed: p.turns_completed,
            hand: p.hand.clone(),
            deck: p.deck.clone(),
            graveyard: p.graveyard.clone(),
            battlefield: p.battlefield.clone(),
            effect_zone: p.effect_zone.clone(),
            battlefield_slots: p.battlefield_slots,
            effect_slots: p.effect_slots,
            temporary_leave: p.temporary_leave,
            restart_requested: p.restart_requested,
            displayed_hand: p.displayed_hand,
            first_draw_hint: p.first_draw_hint,
            last_active_ms: p.last_active_ms,
            custom: p.custom.clone(),
        }
    }
}

impl PersistedPlayer {
    /// Rebuilds a live runtime from the stored fields. The player comes
    /// back disconnected: `is_active` is false until a socket shows up.
    pub fn into_runtime(self) -> PlayerRuntime {
        let mut runtime = PlayerRuntime::new(self.user_id, self.username, self.seat);
        runtime.deck_ref = self.deck_ref;
        runtime.deck_locked = self.deck_locked;
        runtime.health = self.health;
        runtime.max_health = self.max_health;
        runtime.mana = self.mana;
        runtime.max_mana = self.max_mana;
        runtime.chapter_progress = self.chapter_progress;
        runtime.max_chapter_progress = self.max_chapter_progress;
        runtime.chapter_tokens = self.chapter_tokens;
        runtime.turns_completed = self.turns_completed;
        runtime.hand = self.hand;
        runtime.deck = self.deck;
        runtime.graveyard = self.graveyard;
        runtime.battlefield = self.battlefield;
        runtime.effect_zone = self.effect_zone;
        runtime.battlefield_slots = self.battlefield_slots;
        runtime.effect_slots = self.effect_slots;
        runtime.is_active = false;
        runtime.temporary_leave = self.temporary_leave;
        runtime.restart_requested = self.restart_requested;
        runtime.displayed_hand = self.displayed_hand;
        runtime.first_draw_hint = self.first_draw_hint;
        runtime.last_active_ms = self.last_active_ms;
        runtime.custom = self.custom;
        runtime
    }
}

/// One room's durable row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRoom {
    /// Schema version; see [`migrate`](crate::migrate).
    pub version: u32,
    /// Sequence number stamped by the room's write queue. Diagnostic
    /// only — the queue already guarantees issuance order.
    pub write_seq: u64,
    pub match_state: MatchState,
    /// Instance-id allocator watermark, so rehydrated rooms keep
    /// minting unique card ids.
    pub next_instance: u64,
    /// Last `LOG_CAPACITY` log entries.
    pub log: Vec<LogEntry>,
    pub seats: BTreeMap<SeatLabel, SeatBinding>,
    pub players: BTreeMap<UserId, PersistedPlayer>,
    /// Player list order (`current_player_index` indexes this). Keyed
    /// separately because `players` is a map.
    pub player_order: Vec<UserId>,
    pub spectators: Vec<SpectatorRecord>,
    pub locked: bool,
}

impl PersistedRoom {
    /// An empty row for a brand-new room.
    pub fn empty() -> Self {
        Self {
            version: ROW_VERSION,
            write_seq: 0,
            match_state: MatchState::new(),
            next_instance: 1,
            log: Vec::new(),
            seats: BTreeMap::new(),
            players: BTreeMap::new(),
            player_order: Vec::new(),
            spectators: Vec::new(),
            locked: false,
        }
    }

    /// Rebuilds the ordered player list. Users named in `player_order`
    /// come first, in order; any stragglers (defensive — a well-formed
    /// row has none) follow in map order.
    pub fn ordered_players(&self) -> Vec<PlayerRuntime> {
        let mut out = Vec::with_capacity(self.players.len());
        for user_id in &self.player_order {
            if let Some(p) = self.players.get(user_id) {
                out.push(p.clone().into_runtime());
            }
        }
        for (user_id, p) in &self.players {
            if !self.player_order.contains(user_id) {
                out.push(p.clone().into_runtime());
            }
        }
        out
    }

    pub fn action_log(&self) -> ActionLog {
        self.log.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use duelhall_protocol::SeatLabel;

    use super::*;

    fn runtime() -> PlayerRuntime {
        let mut p = PlayerRuntime::new(UserId::new("u1"), "alice", SeatLabel::A);
        p.mana = 4;
        p.is_active = true;
        p.temporary_leave = true;
        p.last_active_ms = Some(123);
        p
    }

    #[test]
    fn test_persisted_player_strips_is_active() {
        let live = runtime();
        let stored = PersistedPlayer::from(&live);
        let back = stored.into_runtime();

        assert!(!back.is_active, "activity is not a durable fact");
        assert_eq!(back.mana, 4);
        assert!(back.temporary_leave, "leave flag IS durable");
        assert_eq!(back.last_active_ms, Some(123));
    }

    #[test]
    fn test_ordered_players_follows_player_order() {
        let mut row = PersistedRoom::empty();
        let a = PlayerRuntime::new(UserId::new("a"), "a", SeatLabel::A);
        let b = PlayerRuntime::new(UserId::new("b"), "b", SeatLabel::B);
        row.players.insert(a.user_id.clone(), (&a).into());
        row.players.insert(b.user_id.clone(), (&b).into());
        // Bind order was B first: the map alone would lose that.
        row.player_order = vec![UserId::new("b"), UserId::new("a")];

        let players = row.ordered_players();

        assert_eq!(players[0].user_id, UserId::new("b"));
        assert_eq!(players[1].user_id, UserId::new("a"));
    }

    #[test]
    fn test_row_json_round_trip() {
        let mut row = PersistedRoom::empty();
        let p = runtime();
        row.player_order = vec![p.user_id.clone()];
        row.players.insert(p.user_id.clone(), (&p).into());
        row.seats.insert(
            SeatLabel::A,
            SeatBinding {
                user_id: p.user_id.clone(),
                username: "alice".into(),
                bound_at: 42,
            },
        );
        row.locked = true;

        let bytes = serde_json::to_vec(&row).unwrap();
        let back: PersistedRoom = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(row, back);
    }
}
