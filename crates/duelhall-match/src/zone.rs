//! The two zone disciplines.
//!
//! Hand, deck, and graveyard are *dense* lists: removing an element
//! splices it out and shifts everything after it. Battlefield and effect
//! area are *slot arrays*: removing a card leaves a hole, so the
//! positions other clients are pointing at stay valid. A slot array grows
//! lazily when a placement targets an index past its current length and
//! never shrinks.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::card::CardInstance;
use crate::error::ActionError;

/// Smallest allowed configured slot count.
pub const MIN_SLOTS: usize = 1;
/// Largest allowed configured slot count.
pub const MAX_SLOTS: usize = 10;

// ---------------------------------------------------------------------------
// DenseZone
// ---------------------------------------------------------------------------

/// An ordered list of cards with splice semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DenseZone {
    cards: Vec<CardInstance>,
}

impl DenseZone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CardInstance> {
        self.cards.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut CardInstance> {
        self.cards.get_mut(index)
    }

    pub fn cards(&self) -> &[CardInstance] {
        &self.cards
    }

    /// Removes and returns the top card (index 0), if any.
    pub fn draw_top(&mut self) -> Option<CardInstance> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    /// Splices out the card at `index`. Everything after it shifts down.
    pub fn remove(&mut self, index: usize) -> Result<CardInstance, ActionError> {
        if index >= self.cards.len() {
            return Err(ActionError::IndexOutOfRange);
        }
        Ok(self.cards.remove(index))
    }

    pub fn push_back(&mut self, card: CardInstance) {
        self.cards.push(card);
    }

    pub fn push_front(&mut self, card: CardInstance) {
        self.cards.insert(0, card);
    }

    /// Inserts at an exact index (clamped to the back).
    pub fn insert_at(&mut self, index: usize, card: CardInstance) {
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
    }

    /// Shuffle-insert: places the card at a uniformly random index.
    pub fn insert_random(&mut self, card: CardInstance) {
        let index = rand::rng().random_range(0..=self.cards.len());
        self.cards.insert(index, card);
    }

    /// Shuffles the whole zone in place.
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::rng());
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

// ---------------------------------------------------------------------------
// SlotZone
// ---------------------------------------------------------------------------

/// A positional, index-addressed zone where emptied slots stay present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotZone {
    slots: Vec<Option<CardInstance>>,
}

impl SlotZone {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current structural length (may exceed the configured slot count —
    /// the count limits placement, not the array).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn get(&self, index: usize) -> Option<&CardInstance> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut CardInstance> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub fn slots(&self) -> &[Option<CardInstance>] {
        &self.slots
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Places a card at `index`, growing the array with empty slots as
    /// needed. Fails if the slot already holds a card.
    pub fn place(&mut self, index: usize, card: CardInstance) -> Result<(), ActionError> {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        let slot = &mut self.slots[index];
        if slot.is_some() {
            return Err(ActionError::SlotOccupied);
        }
        *slot = Some(card);
        Ok(())
    }

    /// Empties the slot at `index` and returns its card. The slot stays
    /// structurally present so other positions are unaffected.
    pub fn take(&mut self, index: usize) -> Result<CardInstance, ActionError> {
        self.slots
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(ActionError::IndexOutOfRange)
    }

    /// First empty slot strictly below `limit`, if any.
    pub fn first_free(&self, limit: usize) -> Option<usize> {
        (0..limit).find(|&i| self.slots.get(i).map_or(true, Option::is_none))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardSpec;

    fn card(id: u64) -> CardInstance {
        CardInstance::from_spec(
            &CardSpec {
                name: format!("card-{id}"),
                cost: 1,
                attack: 1,
                health: 1,
                effect: String::new(),
                faction: "Neutral".into(),
            },
            id,
        )
    }

    #[test]
    fn test_dense_remove_shifts_later_indices() {
        let mut zone = DenseZone::new();
        for id in 0..3 {
            zone.push_back(card(id));
        }

        let removed = zone.remove(1).unwrap();

        assert_eq!(removed.instance_id, 1);
        assert_eq!(zone.len(), 2);
        assert_eq!(zone.get(1).unwrap().instance_id, 2);
    }

    #[test]
    fn test_dense_remove_out_of_range() {
        let mut zone = DenseZone::new();
        zone.push_back(card(0));
        assert!(matches!(zone.remove(5), Err(ActionError::IndexOutOfRange)));
        assert_eq!(zone.len(), 1);
    }

    #[test]
    fn test_dense_draw_top_empties_front() {
        let mut zone = DenseZone::new();
        zone.push_back(card(10));
        zone.push_back(card(11));

        assert_eq!(zone.draw_top().unwrap().instance_id, 10);
        assert_eq!(zone.draw_top().unwrap().instance_id, 11);
        assert!(zone.draw_top().is_none());
    }

    #[test]
    fn test_dense_insert_random_keeps_all_cards() {
        let mut zone = DenseZone::new();
        for id in 0..5 {
            zone.push_back(card(id));
        }
        zone.insert_random(card(99));
        assert_eq!(zone.len(), 6);
        assert!(zone.cards().iter().any(|c| c.instance_id == 99));
    }

    #[test]
    fn test_slot_take_leaves_hole() {
        let mut zone = SlotZone::new();
        zone.place(0, card(0)).unwrap();
        zone.place(1, card(1)).unwrap();
        zone.place(2, card(2)).unwrap();

        let taken = zone.take(1).unwrap();

        assert_eq!(taken.instance_id, 1);
        assert_eq!(zone.len(), 3, "array length unchanged");
        assert!(zone.get(1).is_none(), "slot 1 is a hole");
        assert_eq!(zone.get(0).unwrap().instance_id, 0);
        assert_eq!(zone.get(2).unwrap().instance_id, 2, "neighbors unmoved");
    }

    #[test]
    fn test_slot_place_grows_lazily() {
        let mut zone = SlotZone::new();
        zone.place(4, card(7)).unwrap();
        assert_eq!(zone.len(), 5);
        assert!(zone.get(0).is_none());
        assert_eq!(zone.get(4).unwrap().instance_id, 7);
    }

    #[test]
    fn test_slot_place_occupied_is_rejected() {
        let mut zone = SlotZone::new();
        zone.place(0, card(1)).unwrap();
        let result = zone.place(0, card(2));
        assert!(matches!(result, Err(ActionError::SlotOccupied)));
        assert_eq!(zone.get(0).unwrap().instance_id, 1);
    }

    #[test]
    fn test_slot_take_empty_is_out_of_range() {
        let mut zone = SlotZone::new();
        zone.place(1, card(1)).unwrap();
        assert!(matches!(zone.take(0), Err(ActionError::IndexOutOfRange)));
        assert!(matches!(zone.take(9), Err(ActionError::IndexOutOfRange)));
    }

    #[test]
    fn test_slot_first_free_respects_limit() {
        let mut zone = SlotZone::new();
        zone.place(0, card(0)).unwrap();
        zone.place(1, card(1)).unwrap();
        assert_eq!(zone.first_free(5), Some(2));
        assert_eq!(zone.first_free(2), None);
    }
}
