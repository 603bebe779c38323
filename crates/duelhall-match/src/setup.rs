//! The asymmetric match-setup algorithm.
//!
//! Once both seats have a locked deck, the match opens with a single
//! random choice (who goes first) and a fixed asymmetric hand-out: the
//! first player starts with fewer cards and one mana, the second with
//! more cards and none. The extra card is the catch-up for moving
//! second — the exact numbers are game balance and must not drift.

use rand::Rng;

use crate::dispatch::MatchCore;
use crate::state::Phase;

/// Opening health for both players.
pub const STARTING_HEALTH: i32 = 25;
/// Opening hand size for the player who goes first.
pub const FIRST_PLAYER_HAND: usize = 3;
/// Opening hand size for the player who goes second.
pub const SECOND_PLAYER_HAND: usize = 4;

impl MatchCore {
    /// Runs match setup if its preconditions hold: exactly two players,
    /// both decks locked, phase still `Waiting`. Returns `true` when the
    /// match started (the caller locks the room and persists).
    ///
    /// The phase check doubles as the idempotency guard — a second call
    /// after setup is a no-op.
    pub fn try_setup(&mut self) -> bool {
        if self.state.phase != Phase::Waiting {
            return false;
        }
        if self.players.len() != 2 || !self.players.iter().all(|p| p.deck_locked) {
            return false;
        }

        let first = rand::rng().random_range(0..2usize);
        self.state.first_player_index = first;
        self.state.current_player_index = first;
        self.state.round = 1;

        for (index, player) in self.players.iter_mut().enumerate() {
            let goes_first = index == first;
            let opening = if goes_first {
                FIRST_PLAYER_HAND
            } else {
                SECOND_PLAYER_HAND
            };
            for _ in 0..opening {
                if let Some(card) = player.deck.draw_top() {
                    player.hand.push_back(card);
                }
            }
            player.health = STARTING_HEALTH;
            player.max_health = STARTING_HEALTH;
            player.mana = if goes_first { 1 } else { 0 };
            player.max_mana = player.mana;
            player.chapter_progress = 1;
            player.max_chapter_progress = 3;
            player.chapter_tokens = 0;
            player.turns_completed = 0;
            // One-shot hint for the first player's UI; cleared by their
            // first draw.
            player.first_draw_hint = goes_first;
        }

        self.state.phase = Phase::Playing;
        tracing::info!(first_player = first, "match started");
        true
    }
}

#[cfg(test)]
mod tests {
    use duelhall_protocol::{SeatLabel, UserId};

    use super::*;
    use crate::card::CardSpec;
    use crate::player::{DeckRef, PlayerRuntime};

    fn spec(n: usize) -> CardSpec {
        CardSpec {
            name: format!("card-{n}"),
            cost: 1,
            attack: 1,
            health: 1,
            effect: String::new(),
            faction: "Neutral".into(),
        }
    }

    fn deck_ref(id: &str) -> DeckRef {
        DeckRef {
            deck_id: duelhall_protocol::DeckId(id.into()),
            name: "test deck".into(),
            hero: "hero".into(),
            champion: None,
        }
    }

    fn core_with_locked_decks(deck_size: usize) -> MatchCore {
        let mut core = MatchCore::new();
        core.players
            .push(PlayerRuntime::new(UserId::new("u1"), "alice", SeatLabel::A));
        core.players
            .push(PlayerRuntime::new(UserId::new("u2"), "bob", SeatLabel::B));
        let specs: Vec<CardSpec> = (0..deck_size).map(spec).collect();
        core.hydrate_deck(&UserId::new("u1"), deck_ref("d1"), &specs);
        core.hydrate_deck(&UserId::new("u2"), deck_ref("d2"), &specs);
        core
    }

    #[test]
    fn test_setup_requires_both_decks_locked() {
        let mut core = MatchCore::new();
        core.players
            .push(PlayerRuntime::new(UserId::new("u1"), "alice", SeatLabel::A));
        core.players
            .push(PlayerRuntime::new(UserId::new("u2"), "bob", SeatLabel::B));
        core.players[0].deck_locked = true;

        assert!(!core.try_setup());
        assert_eq!(core.state.phase, Phase::Waiting);
    }

    #[test]
    fn test_setup_asymmetry() {
        let mut core = core_with_locked_decks(10);

        assert!(core.try_setup());

        let first = core.state.first_player_index;
        assert!(first < 2);
        assert_eq!(core.state.current_player_index, first);
        assert_eq!(core.state.phase, Phase::Playing);

        let second = 1 - first;
        assert_eq!(core.players[first].hand.len(), FIRST_PLAYER_HAND);
        assert_eq!(core.players[first].mana, 1);
        assert_eq!(core.players[first].max_mana, 1);
        assert!(core.players[first].first_draw_hint);

        assert_eq!(core.players[second].hand.len(), SECOND_PLAYER_HAND);
        assert_eq!(core.players[second].mana, 0);
        assert_eq!(core.players[second].max_mana, 0);
        assert!(!core.players[second].first_draw_hint);

        for player in &core.players {
            assert_eq!(player.health, STARTING_HEALTH);
            assert_eq!(player.max_health, STARTING_HEALTH);
            assert_eq!(player.chapter_progress, 1);
            assert_eq!(player.max_chapter_progress, 3);
        }
    }

    #[test]
    fn test_setup_is_idempotent() {
        let mut core = core_with_locked_decks(10);
        assert!(core.try_setup());
        let hand_sizes: Vec<_> = core.players.iter().map(|p| p.hand.len()).collect();

        assert!(!core.try_setup(), "second call must be a no-op");
        let after: Vec<_> = core.players.iter().map(|p| p.hand.len()).collect();
        assert_eq!(hand_sizes, after);
    }

    #[test]
    fn test_setup_draws_come_off_the_deck_top() {
        let mut core = core_with_locked_decks(10);
        core.try_setup();
        for player in &core.players {
            // No shuffle at setup: hand is the deck's former top, in
            // catalog order.
            assert_eq!(player.hand.get(0).unwrap().name, "card-0");
            assert_eq!(player.deck.len() + player.hand.len(), 10);
        }
    }
}
