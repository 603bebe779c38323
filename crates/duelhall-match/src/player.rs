//! Per-player runtime state.

use std::collections::BTreeMap;

use duelhall_protocol::{DeckId, SeatLabel, UserId};
use serde::{Deserialize, Serialize};

use crate::zone::{DenseZone, SlotZone};

/// Default configured slot count for battlefield and effect area.
pub(crate) const DEFAULT_SLOTS: usize = 5;

/// Reference to the deck a player locked in, as declared at selection
/// time. The card list itself is hydrated into [`PlayerRuntime::deck`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckRef {
    pub deck_id: DeckId,
    pub name: String,
    pub hero: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub champion: Option<String>,
}

/// Everything the engine tracks for one seated player.
///
/// Created once when the user first binds a seat, reused across every
/// reconnect of that `user_id` for the life of the match, and only reset
/// wholesale by the mutual-restart handshake. The live socket handle is
/// deliberately NOT here — the room actor keys connections by `user_id`
/// so this struct stays fully serializable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRuntime {
    pub user_id: UserId,
    pub username: String,
    pub seat: SeatLabel,

    // Deck selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_ref: Option<DeckRef>,
    pub deck_locked: bool,

    // Numeric resources.
    pub health: i32,
    pub max_health: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub chapter_progress: u32,
    pub max_chapter_progress: u32,
    pub chapter_tokens: u32,
    pub turns_completed: u32,

    // Zones.
    pub hand: DenseZone,
    pub deck: DenseZone,
    pub graveyard: DenseZone,
    pub battlefield: SlotZone,
    pub effect_zone: SlotZone,
    pub battlefield_slots: usize,
    pub effect_slots: usize,

    // Presence and table flags.
    pub is_active: bool,
    pub temporary_leave: bool,
    pub restart_requested: bool,
    pub displayed_hand: bool,
    pub first_draw_hint: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl PlayerRuntime {
    /// A fresh, pre-deck-selection player on the given seat.
    pub fn new(user_id: UserId, username: impl Into<String>, seat: SeatLabel) -> Self {
        Self {
            user_id,
            username: username.into(),
            seat,
            deck_ref: None,
            deck_locked: false,
            health: 25,
            max_health: 25,
            mana: 0,
            max_mana: 0,
            chapter_progress: 0,
            max_chapter_progress: 3,
            chapter_tokens: 0,
            turns_completed: 0,
            hand: DenseZone::new(),
            deck: DenseZone::new(),
            graveyard: DenseZone::new(),
            battlefield: SlotZone::new(),
            effect_zone: SlotZone::new(),
            battlefield_slots: DEFAULT_SLOTS,
            effect_slots: DEFAULT_SLOTS,
            is_active: true,
            temporary_leave: false,
            restart_requested: false,
            displayed_hand: false,
            first_draw_hint: false,
            last_active_ms: None,
            custom: BTreeMap::new(),
        }
    }

    /// Wipes this player back to pre-deck-selection defaults, keeping
    /// only identity (user, name, seat). Used by the mutual restart.
    pub fn reset_for_restart(&mut self) {
        let fresh = PlayerRuntime::new(self.user_id.clone(), self.username.clone(), self.seat);
        let is_active = self.is_active;
        let temporary_leave = self.temporary_leave;
        *self = fresh;
        // Presence is a connection fact, not match state.
        self.is_active = is_active;
        self.temporary_leave = temporary_leave;
    }

    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }
}
