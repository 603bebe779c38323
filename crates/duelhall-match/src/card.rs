//! Card instances and catalog specs.

use serde::{Deserialize, Serialize};

/// The catalog-side shape of a card, as returned by the external deck
/// catalog. Immutable; the engine never edits these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSpec {
    pub name: String,
    pub cost: i32,
    pub attack: i32,
    pub health: i32,
    pub effect: String,
    pub faction: String,
}

/// One concrete card inside a room.
///
/// `instance_id` distinguishes this copy from every other copy of the
/// same catalog card in the room — two "Goblin" cards in play are two
/// instances. The overlay fields hold per-instance edits made at the
/// table (stat tweaks, notes, cost overrides) without losing the
/// original catalog values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardInstance {
    pub instance_id: u64,

    // Catalog fields, copied at hydration time.
    pub name: String,
    pub cost: i32,
    pub attack: i32,
    pub health: i32,
    pub effect: String,
    pub faction: String,

    // Per-instance overlay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_attack: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_health: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_attack: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_health: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_override: Option<i32>,
}

impl CardInstance {
    /// Stamps a catalog spec into a live instance.
    pub fn from_spec(spec: &CardSpec, instance_id: u64) -> Self {
        Self {
            instance_id,
            name: spec.name.clone(),
            cost: spec.cost,
            attack: spec.attack,
            health: spec.health,
            effect: spec.effect.clone(),
            faction: spec.faction.clone(),
            modified_attack: None,
            modified_health: None,
            original_attack: None,
            original_health: None,
            note: None,
            cost_override: None,
        }
    }

    /// A duplicate of this card under a fresh instance id. Overlay fields
    /// are carried over — a copy of a buffed card is a buffed copy.
    pub fn duplicate(&self, instance_id: u64) -> Self {
        Self {
            instance_id,
            ..self.clone()
        }
    }
}
