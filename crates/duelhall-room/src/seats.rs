//! The seat map: durable "who owns this seat" records.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use duelhall_protocol::{SeatLabel, UserId};
use duelhall_store::SeatBinding;
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch; used for bind and disconnect
/// timestamps.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Binds the two seat labels to user identities.
///
/// Independent of any `PlayerRuntime` and of socket churn: a binding
/// persists while its holder is disconnected and is only removed by a
/// mutual restart. Once the room locks, this record is what decides
/// whether a connecting user is an original seat-holder or a stranger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatMap {
    bindings: BTreeMap<SeatLabel, SeatBinding>,
}

impl SeatMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bindings(bindings: BTreeMap<SeatLabel, SeatBinding>) -> Self {
        Self { bindings }
    }

    pub fn holder(&self, seat: SeatLabel) -> Option<&SeatBinding> {
        self.bindings.get(&seat)
    }

    /// Is this user bound to any seat?
    pub fn seat_of(&self, user_id: &UserId) -> Option<SeatLabel> {
        self.bindings
            .iter()
            .find(|(_, b)| &b.user_id == user_id)
            .map(|(seat, _)| *seat)
    }

    /// Records a binding. The caller has already checked occupancy;
    /// rebinding the same user refreshes the username and timestamp.
    pub fn bind(&mut self, seat: SeatLabel, user_id: UserId, username: String, bound_at: u64) {
        self.bindings.insert(
            seat,
            SeatBinding {
                user_id,
                username,
                bound_at,
            },
        );
    }

    /// Seats with no binding yet.
    pub fn unbound(&self) -> Vec<SeatLabel> {
        SeatLabel::ALL
            .into_iter()
            .filter(|seat| !self.bindings.contains_key(seat))
            .collect()
    }

    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }

    /// User ids of every current seat-holder.
    pub fn known_users(&self) -> Vec<UserId> {
        self.bindings.values().map(|b| b.user_id.clone()).collect()
    }

    /// Drops every binding (mutual restart).
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn bindings(&self) -> &BTreeMap<SeatLabel, SeatBinding> {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(id: &str) -> UserId {
        UserId::new(id)
    }

    #[test]
    fn test_unbound_starts_with_both_seats() {
        let seats = SeatMap::new();
        assert_eq!(seats.unbound(), vec![SeatLabel::A, SeatLabel::B]);
    }

    #[test]
    fn test_bind_removes_from_unbound() {
        let mut seats = SeatMap::new();
        seats.bind(SeatLabel::A, uid("u1"), "alice".into(), 1);

        assert_eq!(seats.unbound(), vec![SeatLabel::B]);
        assert_eq!(seats.holder(SeatLabel::A).unwrap().user_id, uid("u1"));
        assert_eq!(seats.seat_of(&uid("u1")), Some(SeatLabel::A));
    }

    #[test]
    fn test_clear_unbinds_everything() {
        let mut seats = SeatMap::new();
        seats.bind(SeatLabel::A, uid("u1"), "alice".into(), 1);
        seats.bind(SeatLabel::B, uid("u2"), "bob".into(), 2);

        seats.clear();

        assert_eq!(seats.bound_count(), 0);
        assert!(seats.known_users().is_empty());
    }
}
