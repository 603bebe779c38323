//! Row migrations.
//!
//! Every store backend funnels raw bytes through [`from_slice`] so field
//! defaulting for old rows happens in exactly one place. A v1 row (the
//! original schema) predates configurable slot counts, max health, and
//! the explicit player ordering — those gaps are filled here, not at
//! call sites.

use serde_json::Value;

use crate::{PersistedRoom, StoreError};

/// Parses and upgrades a stored row to the current schema.
pub fn from_slice(bytes: &[u8]) -> Result<PersistedRoom, StoreError> {
    let value: Value = serde_json::from_slice(bytes).map_err(StoreError::Corrupt)?;
    from_value(value)
}

/// Upgrades a parsed row to the current schema.
pub fn from_value(mut value: Value) -> Result<PersistedRoom, StoreError> {
    let version = value
        .get("version")
        .and_then(Value::as_u64)
        .unwrap_or(1) as u32;

    if version < 2 {
        upgrade_v1(&mut value);
    }

    serde_json::from_value(value).map_err(StoreError::Corrupt)
}

/// v1 → v2: slot counts, max health, write sequence, instance-id
/// watermark, and player ordering (derived from seat labels, A before B,
/// which matches v1's bind behavior).
fn upgrade_v1(value: &mut Value) {
    let Some(root) = value.as_object_mut() else {
        return;
    };
    root.entry("write_seq").or_insert(Value::from(0u64));
    root.entry("next_instance").or_insert(Value::from(1u64));
    root.entry("log").or_insert(Value::Array(Vec::new()));
    root.entry("spectators").or_insert(Value::Array(Vec::new()));
    root.entry("locked").or_insert(Value::Bool(false));

    let mut order: Vec<(String, String)> = Vec::new();
    if let Some(players) = root.get_mut("players").and_then(Value::as_object_mut) {
        for (user_id, player) in players.iter_mut() {
            let Some(player) = player.as_object_mut() else {
                continue;
            };
            player
                .entry("battlefield_slots")
                .or_insert(Value::from(5u64));
            player.entry("effect_slots").or_insert(Value::from(5u64));
            player.entry("max_health").or_insert(Value::from(25i64));
            player.entry("first_draw_hint").or_insert(Value::Bool(false));
            player.entry("displayed_hand").or_insert(Value::Bool(false));
            let seat = player
                .get("seat")
                .and_then(Value::as_str)
                .unwrap_or("A")
                .to_string();
            order.push((seat, user_id.clone()));
        }
    } else {
        root.insert("players".into(), Value::Object(Default::default()));
    }

    if root.get("player_order").is_none() {
        order.sort();
        let order: Vec<Value> = order.into_iter().map(|(_, uid)| Value::from(uid)).collect();
        root.insert("player_order".into(), Value::Array(order));
    }

    root.entry("seats")
        .or_insert(Value::Object(Default::default()));
    root.insert("version".into(), Value::from(2u64));
}
