//! The closed action vocabulary.
//!
//! Every player-issued mutation is one variant of [`Action`], carrying
//! its own typed payload. The dispatcher is a single `match` over this
//! union — there is no string-keyed routing and no untyped payload
//! anywhere past the codec boundary.

use duelhall_protocol::UserId;
use serde::{Deserialize, Serialize};

/// A zone a card can live in. `Shared` addresses the neutral board in
/// the match state; the rest belong to the acting player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneId {
    Hand,
    Deck,
    Graveyard,
    Battlefield,
    Effect,
    Shared,
}

impl ZoneId {
    /// Dense zones splice on removal; slot zones leave holes.
    pub fn is_dense(self) -> bool {
        matches!(self, Self::Hand | Self::Deck | Self::Graveyard)
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Hand => "hand",
            Self::Deck => "deck",
            Self::Graveyard => "graveyard",
            Self::Battlefield => "battlefield",
            Self::Effect => "effect area",
            Self::Shared => "shared board",
        };
        write!(f, "{name}")
    }
}

/// Where an inserted card lands in its destination zone.
///
/// `Front`/`Back`/`Shuffle` are only meaningful for dense zones;
/// `Slot` only for slot zones. The dispatcher rejects mismatches as
/// [`ActionError::InvalidZone`](crate::ActionError::InvalidZone).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    Front,
    Back,
    /// Uniformly random index ("shuffle-insert").
    Shuffle,
    Slot(usize),
}

/// A numeric resource on the player runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatKind {
    Health,
    MaxHealth,
    Mana,
    MaxMana,
    ChapterProgress,
    MaxChapterProgress,
    ChapterTokens,
    TurnsCompleted,
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Health => "health",
            Self::MaxHealth => "max health",
            Self::Mana => "mana",
            Self::MaxMana => "max mana",
            Self::ChapterProgress => "chapter progress",
            Self::MaxChapterProgress => "max chapter progress",
            Self::ChapterTokens => "chapter tokens",
            Self::TurnsCompleted => "turns completed",
        };
        write!(f, "{name}")
    }
}

/// One of the player's two configurable slot arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotArea {
    Battlefield,
    Effect,
}

impl std::fmt::Display for SlotArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Battlefield => write!(f, "battlefield"),
            Self::Effect => write!(f, "effect area"),
        }
    }
}

/// Everything a seated player can ask the engine to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Action {
    /// Draw the top card of the deck into the hand.
    Draw,

    /// Move a hand card to the graveyard.
    Discard { hand_index: usize },

    /// Move a hand card onto a slot array, paying its declared cost.
    /// `cost` may be the wildcard value to skip the mana charge.
    PlayCard {
        hand_index: usize,
        area: SlotArea,
        slot: usize,
        cost: i32,
    },

    /// Reorder within a single zone. For slot zones the destination must
    /// be empty (or equal to the source, which is a no-op).
    MoveWithinZone {
        zone: ZoneId,
        from: usize,
        to: usize,
    },

    /// Transfer a card between any two zones.
    MoveBetweenZones {
        from_zone: ZoneId,
        from_index: usize,
        to_zone: ZoneId,
        to: Placement,
    },

    /// Set a numeric resource to an absolute value (clamped).
    ModifyStat { stat: StatKind, value: i32 },

    /// Change the configured slot count of a slot array (1..=10).
    ModifySlotCount { area: SlotArea, count: usize },

    /// Duplicate a card in place under a fresh instance id.
    CopyCard { zone: ZoneId, index: usize },

    /// Remove a card from the game entirely.
    RemoveCard { zone: ZoneId, index: usize },

    /// Shuffle the whole deck.
    ShuffleDeck,

    /// Privately view the full deck list (reply goes to the requester
    /// only, never broadcast).
    SearchDeck,

    /// Attach or clear a free-text note on a card.
    NoteUpdate {
        zone: ZoneId,
        index: usize,
        note: Option<String>,
    },

    /// Toggle the "hand revealed" table flag.
    DisplayHand { shown: bool },

    /// Roll an N-sided die and announce the result.
    RollDice { sides: u32 },

    /// Toggle this player's restart request. When both players have the
    /// flag set the match resets wholesale.
    RestartRequest { requested: bool },

    /// Pass the turn, running the full turn-advance algorithm.
    EndTurn,
}

impl Action {
    /// The wire/log tag for this action.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Draw => "draw",
            Self::Discard { .. } => "discard",
            Self::PlayCard { .. } => "play-card",
            Self::MoveWithinZone { .. } => "move-within-zone",
            Self::MoveBetweenZones { .. } => "move-between-zones",
            Self::ModifyStat { .. } => "modify-stat",
            Self::ModifySlotCount { .. } => "modify-slot-count",
            Self::CopyCard { .. } => "copy-card",
            Self::RemoveCard { .. } => "remove-card",
            Self::ShuffleDeck => "shuffle-deck",
            Self::SearchDeck => "search-deck",
            Self::NoteUpdate { .. } => "note-update",
            Self::DisplayHand { .. } => "display-hand",
            Self::RollDice { .. } => "roll-dice",
            Self::RestartRequest { .. } => "restart-request",
            Self::EndTurn => "end-turn",
        }
    }
}

/// A private reply produced by an action, delivered to the acting user
/// only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrivateReply {
    /// Full deck contents for a deck search.
    DeckContents {
        user_id: UserId,
        cards: Vec<crate::CardInstance>,
    },
}
