//! The action dispatcher.
//!
//! [`MatchCore::apply`] is the single mutation path for a room's game
//! state. It runs read-validate-mutate to completion with no suspension
//! point, so two actions against the same room can never interleave —
//! the room actor simply calls it twice and the second call observes the
//! first's completed effect.
//!
//! Failure policy: validation happens in full before any mutation, so no
//! action ever partially applies. Occupancy and resource failures return
//! an explanatory broadcast; index and zone failures are treated as
//! client bugs and stay silent. Either way `mutated` is `false` — a
//! message never implies success.

use duelhall_protocol::UserId;
use rand::Rng;

use crate::action::{Action, Placement, PrivateReply, SlotArea, StatKind, ZoneId};
use crate::card::{CardInstance, CardSpec};
use crate::player::{DeckRef, PlayerRuntime};
use crate::state::MatchState;
use crate::zone::{DenseZone, SlotZone, MAX_SLOTS, MIN_SLOTS};
use crate::{CHAPTER_TOKEN_CAP, COST_WILDCARD, MANA_GROWTH_CAP};

/// Upper clamp for client-set numeric stats.
const STAT_CEILING: i32 = 999;
/// Largest die a client may roll.
const DICE_CEILING: u32 = 1000;

/// The outcome of one dispatched action.
#[derive(Debug, Clone, Default)]
pub struct Applied {
    /// Whether any state changed. Gates persistence and snapshots.
    pub mutated: bool,
    /// Human-readable line for the room log and live broadcast.
    pub broadcast: Option<String>,
    /// Full card payload when the action concerned a specific card.
    pub card: Option<CardInstance>,
    /// A reply for the acting user only (never broadcast).
    pub private: Option<PrivateReply>,
    /// The mutual restart fired: the room must unbind seats and unlock.
    pub reset: bool,
}

impl Applied {
    /// Nothing happened and nobody is told why.
    fn silent() -> Self {
        Self::default()
    }

    /// The action failed a precondition the actor should hear about.
    fn rejected(message: String) -> Self {
        Self {
            broadcast: Some(message),
            ..Self::default()
        }
    }

    /// A successful mutation with a broadcast line.
    fn done(message: String) -> Self {
        Self {
            mutated: true,
            broadcast: Some(message),
            ..Self::default()
        }
    }

    fn with_card(mut self, card: CardInstance) -> Self {
        self.card = Some(card);
        self
    }
}

/// The players plus shared match state — the pure core a room actor owns.
#[derive(Debug, Clone, Default)]
pub struct MatchCore {
    /// At most two players, in seat-bind order. `current_player_index`
    /// in the match state indexes this list.
    pub players: Vec<PlayerRuntime>,
    pub state: MatchState,
    /// Allocator for card instance ids, persisted with the room so ids
    /// stay unique across rehydration.
    pub next_instance: u64,
}

impl MatchCore {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            state: MatchState::new(),
            next_instance: 1,
        }
    }

    pub fn player_index(&self, user_id: &UserId) -> Option<usize> {
        self.players.iter().position(|p| &p.user_id == user_id)
    }

    pub fn player(&self, user_id: &UserId) -> Option<&PlayerRuntime> {
        self.players.iter().find(|p| &p.user_id == user_id)
    }

    pub fn player_mut(&mut self, user_id: &UserId) -> Option<&mut PlayerRuntime> {
        self.players.iter_mut().find(|p| &p.user_id == user_id)
    }

    pub fn alloc_instance_id(&mut self) -> u64 {
        let id = self.next_instance;
        self.next_instance += 1;
        id
    }

    /// Expands a catalog card list into the player's deck zone and locks
    /// the selection. Card order is catalog order — nothing shuffles
    /// until a player asks for it.
    pub fn hydrate_deck(&mut self, user_id: &UserId, deck_ref: DeckRef, specs: &[CardSpec]) {
        let mut cards = Vec::with_capacity(specs.len());
        for spec in specs {
            let id = self.alloc_instance_id();
            cards.push(CardInstance::from_spec(spec, id));
        }
        if let Some(player) = self.player_mut(user_id) {
            player.deck.clear();
            player.hand.clear();
            for card in cards {
                player.deck.push_back(card);
            }
            player.deck_ref = Some(deck_ref);
            player.deck_locked = true;
        }
    }

    /// Applies one action for one user. Total: every input produces an
    /// [`Applied`], never an error.
    pub fn apply(&mut self, user_id: &UserId, action: Action) -> Applied {
        let Some(index) = self.player_index(user_id) else {
            // Unknown users (spectators, stale sockets) are dropped
            // without comment.
            tracing::debug!(%user_id, tag = action.tag(), "action from non-player, ignoring");
            return Applied::silent();
        };

        match action {
            Action::Draw => self.draw(index),
            Action::Discard { hand_index } => self.discard(index, hand_index),
            Action::PlayCard {
                hand_index,
                area,
                slot,
                cost,
            } => self.play_card(index, hand_index, area, slot, cost),
            Action::MoveWithinZone { zone, from, to } => self.move_within(index, zone, from, to),
            Action::MoveBetweenZones {
                from_zone,
                from_index,
                to_zone,
                to,
            } => self.move_between(index, from_zone, from_index, to_zone, to),
            Action::ModifyStat { stat, value } => self.modify_stat(index, stat, value),
            Action::ModifySlotCount { area, count } => self.modify_slot_count(index, area, count),
            Action::CopyCard { zone, index: at } => self.copy_card(index, zone, at),
            Action::RemoveCard { zone, index: at } => self.remove_card(index, zone, at),
            Action::ShuffleDeck => self.shuffle_deck(index),
            Action::SearchDeck => self.search_deck(index),
            Action::NoteUpdate { zone, index: at, note } => self.note_update(index, zone, at, note),
            Action::DisplayHand { shown } => self.display_hand(index, shown),
            Action::RollDice { sides } => self.roll_dice(index, sides),
            Action::RestartRequest { requested } => self.restart_request(index, requested),
            Action::EndTurn => self.end_turn(index),
        }
    }

    // -- individual actions -------------------------------------------------

    fn draw(&mut self, index: usize) -> Applied {
        let player = &mut self.players[index];
        let Some(card) = player.deck.draw_top() else {
            return Applied::silent();
        };
        player.hand.push_back(card);
        player.first_draw_hint = false;
        Applied::done(format!("{} drew a card", player.username))
    }

    fn discard(&mut self, index: usize, hand_index: usize) -> Applied {
        let player = &mut self.players[index];
        let card = match player.hand.remove(hand_index) {
            Ok(card) => card,
            Err(_) => return Applied::silent(),
        };
        let message = format!("{} discarded {}", player.username, card.name);
        player.graveyard.push_back(card.clone());
        Applied::done(message).with_card(card)
    }

    fn play_card(
        &mut self,
        index: usize,
        hand_index: usize,
        area: SlotArea,
        slot: usize,
        cost: i32,
    ) -> Applied {
        let player = &mut self.players[index];
        if player.hand.get(hand_index).is_none() {
            return Applied::silent();
        }
        if cost < COST_WILDCARD {
            return Applied::silent();
        }
        if cost != COST_WILDCARD && cost > player.mana {
            return Applied::rejected(format!(
                "{} does not have enough mana ({} needed, {} available)",
                player.username, cost, player.mana
            ));
        }
        let (zone, limit) = match area {
            SlotArea::Battlefield => (&mut player.battlefield, player.battlefield_slots),
            SlotArea::Effect => (&mut player.effect_zone, player.effect_slots),
        };
        if slot >= limit {
            return Applied::silent();
        }
        if zone.get(slot).is_some() {
            return Applied::rejected(format!(
                "{} tried to play onto an occupied slot",
                player.username
            ));
        }

        // Validation complete — mutate.
        let card = player
            .hand
            .remove(hand_index)
            .expect("hand index validated above");
        let (zone, _) = match area {
            SlotArea::Battlefield => (&mut player.battlefield, ()),
            SlotArea::Effect => (&mut player.effect_zone, ()),
        };
        zone.place(slot, card.clone())
            .expect("slot validated empty above");
        if cost != COST_WILDCARD {
            player.mana -= cost;
        }
        Applied::done(format!(
            "{} played {} to {} slot {}",
            player.username, card.name, area, slot
        ))
        .with_card(card)
    }

    fn move_within(&mut self, index: usize, zone: ZoneId, from: usize, to: usize) -> Applied {
        let player = &mut self.players[index];
        let shared = &mut self.state.shared_board;

        if zone.is_dense() {
            let Some(dense) = dense_zone_mut(player, zone) else {
                return Applied::silent();
            };
            let card = match dense.remove(from) {
                Ok(card) => card,
                Err(_) => return Applied::silent(),
            };
            let name = card.name.clone();
            dense.insert_at(to, card);
            return Applied::done(format!(
                "{} reordered {} within their {}",
                player.username, name, zone
            ));
        }

        let Some((slots, limit)) = slot_zone_mut(player, shared, zone) else {
            return Applied::silent();
        };
        if from == to {
            // Dropping a card back where it came from is a no-op, not
            // an occupancy failure.
            return Applied::silent();
        }
        if to >= limit {
            return Applied::silent();
        }
        if slots.get(from).is_none() {
            return Applied::silent();
        }
        if slots.get(to).is_some() {
            return Applied::rejected(format!(
                "{} tried to move onto an occupied slot",
                player.username
            ));
        }
        let card = slots.take(from).expect("source slot validated above");
        let name = card.name.clone();
        slots.place(to, card).expect("target slot validated above");
        Applied::done(format!(
            "{} moved {} to {} slot {}",
            player.username, name, zone, to
        ))
    }

    fn move_between(
        &mut self,
        index: usize,
        from_zone: ZoneId,
        from_index: usize,
        to_zone: ZoneId,
        to: Placement,
    ) -> Applied {
        if from_zone == to_zone {
            // Same-zone moves go through move-within-zone.
            return Applied::silent();
        }
        let player = &mut self.players[index];
        let shared = &mut self.state.shared_board;

        // Validate the destination first so the source is never drained
        // into a rejected placement.
        if to_zone.is_dense() {
            if matches!(to, Placement::Slot(_)) {
                return Applied::silent();
            }
        } else {
            let Placement::Slot(slot) = to else {
                return Applied::silent();
            };
            let Some((slots, limit)) = slot_zone_ref(player, shared, to_zone) else {
                return Applied::silent();
            };
            if slot >= limit {
                return Applied::silent();
            }
            if slots.get(slot).is_some() {
                return Applied::rejected(format!(
                    "{} tried to move onto an occupied slot",
                    player.username
                ));
            }
        }

        // Validate and drain the source.
        let card = if from_zone.is_dense() {
            let Some(dense) = dense_zone_mut(player, from_zone) else {
                return Applied::silent();
            };
            match dense.remove(from_index) {
                Ok(card) => card,
                Err(_) => return Applied::silent(),
            }
        } else {
            let Some((slots, _)) = slot_zone_mut(player, shared, from_zone) else {
                return Applied::silent();
            };
            match slots.take(from_index) {
                Ok(card) => card,
                Err(_) => return Applied::silent(),
            }
        };

        // Deliver.
        if to_zone.is_dense() {
            let dense = dense_zone_mut(player, to_zone).expect("dense destination validated");
            match to {
                Placement::Front => dense.push_front(card.clone()),
                Placement::Back => dense.push_back(card.clone()),
                Placement::Shuffle => dense.insert_random(card.clone()),
                Placement::Slot(_) => unreachable!("rejected above"),
            }
        } else {
            let Placement::Slot(slot) = to else {
                unreachable!("rejected above")
            };
            let (slots, _) = slot_zone_mut(player, shared, to_zone).expect("slot destination validated");
            slots
                .place(slot, card.clone())
                .expect("destination slot validated empty");
        }

        Applied::done(format!(
            "{} moved {} from {} to {}",
            player.username, card.name, from_zone, to_zone
        ))
        .with_card(card)
    }

    fn modify_stat(&mut self, index: usize, stat: StatKind, value: i32) -> Applied {
        let player = &mut self.players[index];
        let clamped = value.clamp(0, STAT_CEILING);
        match stat {
            StatKind::Health => player.health = clamped,
            StatKind::MaxHealth => player.max_health = clamped,
            StatKind::Mana => player.mana = clamped,
            StatKind::MaxMana => player.max_mana = clamped,
            StatKind::ChapterProgress => player.chapter_progress = clamped as u32,
            StatKind::MaxChapterProgress => player.max_chapter_progress = clamped as u32,
            StatKind::ChapterTokens => {
                player.chapter_tokens = (clamped as u32).min(CHAPTER_TOKEN_CAP)
            }
            StatKind::TurnsCompleted => player.turns_completed = clamped as u32,
        }
        let shown = match stat {
            StatKind::ChapterTokens => player.chapter_tokens as i32,
            _ => clamped,
        };
        Applied::done(format!("{} set {} to {}", player.username, stat, shown))
    }

    fn modify_slot_count(&mut self, index: usize, area: SlotArea, count: usize) -> Applied {
        if !(MIN_SLOTS..=MAX_SLOTS).contains(&count) {
            return Applied::silent();
        }
        let player = &mut self.players[index];
        // The backing array never shrinks; the count only limits future
        // placement.
        match area {
            SlotArea::Battlefield => player.battlefield_slots = count,
            SlotArea::Effect => player.effect_slots = count,
        }
        Applied::done(format!(
            "{} set {} slots to {}",
            player.username, area, count
        ))
    }

    fn copy_card(&mut self, index: usize, zone: ZoneId, at: usize) -> Applied {
        let id = self.alloc_instance_id();
        let player = &mut self.players[index];
        let shared = &mut self.state.shared_board;

        if zone.is_dense() {
            let Some(dense) = dense_zone_mut(player, zone) else {
                return Applied::silent();
            };
            let Some(original) = dense.get(at) else {
                return Applied::silent();
            };
            let copy = original.duplicate(id);
            dense.insert_at(at + 1, copy.clone());
            return Applied::done(format!("{} copied {}", player.username, copy.name))
                .with_card(copy);
        }

        let Some((slots, limit)) = slot_zone_mut(player, shared, zone) else {
            return Applied::silent();
        };
        let Some(original) = slots.get(at) else {
            return Applied::silent();
        };
        let copy = original.duplicate(id);
        let Some(free) = slots.first_free(limit) else {
            return Applied::rejected(format!(
                "{} has no free slot for a copy",
                player.username
            ));
        };
        slots.place(free, copy.clone()).expect("slot reported free");
        Applied::done(format!("{} copied {}", player.username, copy.name)).with_card(copy)
    }

    fn remove_card(&mut self, index: usize, zone: ZoneId, at: usize) -> Applied {
        let player = &mut self.players[index];
        let shared = &mut self.state.shared_board;

        let card = if zone.is_dense() {
            let Some(dense) = dense_zone_mut(player, zone) else {
                return Applied::silent();
            };
            match dense.remove(at) {
                Ok(card) => card,
                Err(_) => return Applied::silent(),
            }
        } else {
            let Some((slots, _)) = slot_zone_mut(player, shared, zone) else {
                return Applied::silent();
            };
            match slots.take(at) {
                Ok(card) => card,
                Err(_) => return Applied::silent(),
            }
        };

        Applied::done(format!(
            "{} removed {} from {}",
            player.username, card.name, zone
        ))
        .with_card(card)
    }

    fn shuffle_deck(&mut self, index: usize) -> Applied {
        let player = &mut self.players[index];
        player.deck.shuffle();
        Applied::done(format!("{} shuffled their deck", player.username))
    }

    fn search_deck(&mut self, index: usize) -> Applied {
        let player = &self.players[index];
        Applied {
            mutated: false,
            broadcast: Some(format!("{} is searching their deck", player.username)),
            card: None,
            private: Some(PrivateReply::DeckContents {
                user_id: player.user_id.clone(),
                cards: player.deck.cards().to_vec(),
            }),
            reset: false,
        }
    }

    fn note_update(
        &mut self,
        index: usize,
        zone: ZoneId,
        at: usize,
        note: Option<String>,
    ) -> Applied {
        let player = &mut self.players[index];
        let shared = &mut self.state.shared_board;

        let card = if zone.is_dense() {
            dense_zone_mut(player, zone).and_then(|z| z.get_mut(at))
        } else {
            slot_zone_mut(player, shared, zone).and_then(|(z, _)| z.get_mut(at))
        };
        let Some(card) = card else {
            return Applied::silent();
        };
        card.note = note;
        Applied::done(format!("{} updated a card note", player.username))
    }

    fn display_hand(&mut self, index: usize, shown: bool) -> Applied {
        let player = &mut self.players[index];
        player.displayed_hand = shown;
        let verb = if shown { "reveals" } else { "hides" };
        Applied::done(format!("{} {} their hand", player.username, verb))
    }

    fn roll_dice(&mut self, index: usize, sides: u32) -> Applied {
        if !(2..=DICE_CEILING).contains(&sides) {
            return Applied::silent();
        }
        let player = &self.players[index];
        let result = rand::rng().random_range(1..=sides);
        Applied::done(format!(
            "{} rolled {} (d{})",
            player.username, result, sides
        ))
    }

    fn restart_request(&mut self, index: usize, requested: bool) -> Applied {
        let username = self.players[index].username.clone();
        self.players[index].restart_requested = requested;

        if !requested {
            return Applied::done(format!("{username} withdrew their restart request"));
        }
        let all_agree = self.players.len() == 2
            && self.players.iter().all(|p| p.restart_requested);
        if !all_agree {
            return Applied::done(format!("{username} requested a restart"));
        }

        // Mutual restart: wipe every player back to pre-deck-selection
        // defaults and return the room to the waiting phase. The actor
        // above clears seat bindings and the lock.
        for player in &mut self.players {
            player.reset_for_restart();
        }
        self.state = MatchState::new();
        let mut applied = Applied::done("match reset by mutual agreement".to_string());
        applied.reset = true;
        applied
    }

    fn end_turn(&mut self, index: usize) -> Applied {
        if !self.state.phase.is_playing() {
            return Applied::silent();
        }
        if index != self.state.current_player_index {
            return Applied::silent();
        }
        let count = self.players.len();
        debug_assert_eq!(count, 2, "playing phase requires both seats");

        let previous = self.state.current_player_index;
        let next = (previous + 1) % count;
        self.state.current_player_index = next;
        self.players[previous].turns_completed += 1;
        if next == self.state.first_player_index {
            self.state.round += 1;
        }

        let round = self.state.round;
        let ender = self.players[previous].username.clone();
        let upcoming = &mut self.players[next];
        if let Some(card) = upcoming.deck.draw_top() {
            // Empty deck is a no-op, not an error.
            upcoming.hand.push_back(card);
            upcoming.first_draw_hint = false;
        }
        if upcoming.max_mana < MANA_GROWTH_CAP {
            // A player who manually pushed max_mana past the cap is
            // never re-capped or decremented here.
            upcoming.max_mana += 1;
        }
        upcoming.mana = upcoming.max_mana;
        upcoming.chapter_progress += 1;
        if upcoming.chapter_progress >= upcoming.max_chapter_progress {
            upcoming.chapter_progress = 0;
            upcoming.chapter_tokens = (upcoming.chapter_tokens + 1).min(CHAPTER_TOKEN_CAP);
        }

        Applied::done(format!(
            "{} ended their turn — {} is up (round {})",
            ender, upcoming.username, round
        ))
    }
}

// ---------------------------------------------------------------------------
// Zone resolution helpers
// ---------------------------------------------------------------------------

fn dense_zone_mut(player: &mut PlayerRuntime, zone: ZoneId) -> Option<&mut DenseZone> {
    match zone {
        ZoneId::Hand => Some(&mut player.hand),
        ZoneId::Deck => Some(&mut player.deck),
        ZoneId::Graveyard => Some(&mut player.graveyard),
        _ => None,
    }
}

fn slot_zone_mut<'a>(
    player: &'a mut PlayerRuntime,
    shared: &'a mut SlotZone,
    zone: ZoneId,
) -> Option<(&'a mut SlotZone, usize)> {
    match zone {
        ZoneId::Battlefield => Some((&mut player.battlefield, player.battlefield_slots)),
        ZoneId::Effect => Some((&mut player.effect_zone, player.effect_slots)),
        ZoneId::Shared => Some((shared, MAX_SLOTS)),
        _ => None,
    }
}

fn slot_zone_ref<'a>(
    player: &'a PlayerRuntime,
    shared: &'a SlotZone,
    zone: ZoneId,
) -> Option<(&'a SlotZone, usize)> {
    match zone {
        ZoneId::Battlefield => Some((&player.battlefield, player.battlefield_slots)),
        ZoneId::Effect => Some((&player.effect_zone, player.effect_slots)),
        ZoneId::Shared => Some((shared, MAX_SLOTS)),
        _ => None,
    }
}
