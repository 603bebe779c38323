//! Room actor: an isolated tokio task that owns one room's state.
//!
//! The actor is the concurrency boundary. Commands arrive through an
//! mpsc channel and are handled one at a time; each handler mutates the
//! [`RoomRuntime`] synchronously and only then fans out broadcasts and
//! enqueues the durable write. Nothing outside the actor ever holds a
//! reference to live room state.

use std::collections::HashMap;

use duelhall_match::{
    Action, ActionLog, CardSpec, DeckRef, LogEntry, MatchCore, Phase, PrivateReply,
};
use duelhall_protocol::{RoomId, SeatLabel, UserId};
use duelhall_store::{PersistedPlayer, PersistedRoom, SpectatorRecord, WriteQueue, ROW_VERSION};
use tokio::sync::{mpsc, oneshot};

use crate::events::{ClientSender, RoomSnapshot, SeatStatus, ServerEvent};
use crate::seats::{now_ms, SeatMap};
use crate::RoomError;

/// Command channel depth per room actor.
const CHANNEL_SIZE: usize = 64;

/// A deck pick, already hydrated into a card list by the catalog layer.
#[derive(Debug, Clone)]
pub struct DeckSelection {
    pub deck_ref: DeckRef,
    pub cards: Vec<CardSpec>,
}

/// Commands sent to a room actor through its channel.
enum RoomCommand {
    /// A socket joined the room (player or spectator).
    Join {
        user_id: UserId,
        username: String,
        spectate: bool,
        sender: ClientSender,
        reply: oneshot::Sender<()>,
    },

    /// Claim a seat.
    BindSeat {
        user_id: UserId,
        username: String,
        seat: SeatLabel,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Lock in a deck (fire-and-forget; a non-seated user is ignored).
    SelectDeck {
        user_id: UserId,
        username: String,
        selection: Box<DeckSelection>,
    },

    /// A game action (fire-and-forget; failures resolve inside the
    /// dispatcher).
    Dispatch { user_id: UserId, action: Action },

    /// Explicit leave or transport drop.
    Leave { user_id: UserId },

    /// Metadata snapshot for the registry and tests.
    Info { reply: oneshot::Sender<RoomInfo> },
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub phase: Phase,
    pub player_count: usize,
    pub spectator_count: usize,
    pub connected_count: usize,
    pub locked: bool,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Registers a connection with the room. Resolves once the actor has
    /// processed the join (snapshot/seat events are already in flight).
    pub async fn join(
        &self,
        user_id: UserId,
        username: String,
        spectate: bool,
        sender: ClientSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                user_id,
                username,
                spectate,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    pub async fn bind_seat(
        &self,
        user_id: UserId,
        username: String,
        seat: SeatLabel,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::BindSeat {
                user_id,
                username,
                seat,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?
    }

    pub async fn select_deck(
        &self,
        user_id: UserId,
        username: String,
        selection: DeckSelection,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::SelectDeck {
                user_id,
                username,
                selection: Box::new(selection),
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    pub async fn dispatch(&self, user_id: UserId, action: Action) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Dispatch { user_id, action })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    pub async fn leave(&self, user_id: UserId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Leave { user_id })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }
}

/// One room's complete in-memory state.
#[derive(Debug, Clone)]
pub struct RoomRuntime {
    pub room_id: RoomId,
    pub core: MatchCore,
    pub seats: SeatMap,
    pub spectators: Vec<SpectatorRecord>,
    pub log: ActionLog,
    /// Set when the match starts; a locked room only rebinds original
    /// seat-holders.
    pub locked: bool,
}

impl RoomRuntime {
    /// An empty room, created on first touch.
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            core: MatchCore::new(),
            seats: SeatMap::new(),
            spectators: Vec::new(),
            log: ActionLog::new(),
            locked: false,
        }
    }

    /// Rebuilds a room from its durable row (cold start).
    pub fn from_row(room_id: RoomId, row: PersistedRoom) -> Self {
        let mut core = MatchCore::new();
        core.players = row.ordered_players();
        core.state = row.match_state.clone();
        core.next_instance = row.next_instance;
        Self {
            room_id,
            core,
            seats: SeatMap::from_bindings(row.seats.clone()),
            spectators: row.spectators.clone(),
            log: row.action_log(),
            locked: row.locked,
        }
    }

    /// Serializes the durable subset of this room. `write_seq` is
    /// stamped by the write queue at enqueue time.
    pub fn to_row(&self) -> PersistedRoom {
        PersistedRoom {
            version: ROW_VERSION,
            write_seq: 0,
            match_state: self.core.state.clone(),
            next_instance: self.core.next_instance,
            log: self.log.to_vec(),
            seats: self.seats.bindings().clone(),
            players: self
                .core
                .players
                .iter()
                .map(|p| (p.user_id.clone(), PersistedPlayer::from(p)))
                .collect(),
            player_order: self.core.players.iter().map(|p| p.user_id.clone()).collect(),
            spectators: self.spectators.clone(),
            locked: self.locked,
        }
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.room_id.clone(),
            players: self.core.players.clone(),
            spectators: self.spectators.clone(),
            match_state: self.core.state.clone(),
            log: self.log.to_vec(),
            locked: self.locked,
        }
    }

    fn seat_statuses(&self) -> Vec<SeatStatus> {
        SeatLabel::ALL
            .into_iter()
            .map(|seat| SeatStatus {
                seat,
                held_by: self.seats.holder(seat).map(|b| b.username.clone()),
            })
            .collect()
    }
}

/// The internal room actor. Runs inside a tokio task.
struct RoomActor {
    runtime: RoomRuntime,
    /// Live sockets of seated players and spectators, keyed by user.
    conns: HashMap<UserId, ClientSender>,
    /// Sockets of joined users who have not bound a seat yet.
    lobby: HashMap<UserId, ClientSender>,
    writes: WriteQueue,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room_id = %self.runtime.room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    user_id,
                    username,
                    spectate,
                    sender,
                    reply,
                } => {
                    self.handle_join(user_id, username, spectate, sender);
                    let _ = reply.send(());
                }
                RoomCommand::BindSeat {
                    user_id,
                    username,
                    seat,
                    reply,
                } => {
                    let result = self.handle_bind_seat(user_id, username, seat);
                    let _ = reply.send(result);
                }
                RoomCommand::SelectDeck {
                    user_id,
                    username,
                    selection,
                } => {
                    self.handle_select_deck(user_id, username, *selection);
                }
                RoomCommand::Dispatch { user_id, action } => {
                    self.handle_dispatch(user_id, action);
                }
                RoomCommand::Leave { user_id } => {
                    self.handle_leave(user_id);
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
            }
        }

        tracing::info!(room_id = %self.runtime.room_id, "room actor stopped");
    }

    /// Reconnection coordinator (§ the asymmetry is intentional: player
    /// state survives a drop, spectator presence does not).
    fn handle_join(
        &mut self,
        user_id: UserId,
        username: String,
        spectate: bool,
        sender: ClientSender,
    ) {
        if spectate {
            // Idempotent upsert; spectators never touch seats.
            if let Some(existing) = self
                .runtime
                .spectators
                .iter_mut()
                .find(|s| s.user_id == user_id)
            {
                existing.username = username;
            } else {
                self.runtime.spectators.push(SpectatorRecord {
                    user_id: user_id.clone(),
                    username,
                });
            }
            self.send_to(&sender, self.snapshot_event());
            self.conns.insert(user_id.clone(), sender);
            tracing::info!(room_id = %self.runtime.room_id, %user_id, "spectator joined");
            self.broadcast_snapshot();
            self.persist();
            return;
        }

        if let Some(player) = self.runtime.core.player_mut(&user_id) {
            // Warm (or rehydrated) player: reattach the socket, clear
            // the leave flags, and touch nothing else.
            player.is_active = true;
            player.temporary_leave = false;
            self.send_to(&sender, self.snapshot_event());
            self.conns.insert(user_id.clone(), sender);
            tracing::info!(room_id = %self.runtime.room_id, %user_id, "player reconnected");
            self.broadcast_snapshot();
            return;
        }

        // A stranger: offer the seats and hold the socket in the lobby
        // until they bind one.
        let offer = ServerEvent::SeatAvailability {
            seats: self.runtime.seat_statuses(),
            locked: self.runtime.locked,
            known_user_ids: self.runtime.seats.known_users(),
        };
        self.send_to(&sender, offer);
        self.lobby.insert(user_id.clone(), sender);
        tracing::debug!(room_id = %self.runtime.room_id, %user_id, "joiner offered seats");
    }

    fn handle_bind_seat(
        &mut self,
        user_id: UserId,
        username: String,
        seat: SeatLabel,
    ) -> Result<(), RoomError> {
        if let Some(binding) = self.runtime.seats.holder(seat) {
            if binding.user_id != user_id {
                return Err(RoomError::SeatOccupied(seat));
            }
        }

        let known = self.runtime.core.player_index(&user_id).is_some();
        if self.runtime.locked && !known {
            // Late joiners cannot displace a seat once the match has
            // started.
            return Err(RoomError::Locked(self.runtime.room_id.clone()));
        }

        if !known {
            // After a mutual restart a reset player entry may still sit
            // on this seat; a new claimant replaces it.
            self.runtime.core.players.retain(|p| p.seat != seat);
            self.runtime
                .core
                .players
                .push(duelhall_match::PlayerRuntime::new(
                    user_id.clone(),
                    username.clone(),
                    seat,
                ));
        }
        self.runtime
            .seats
            .bind(seat, user_id.clone(), username, now_ms());

        if let Some(sender) = self.lobby.remove(&user_id) {
            self.conns.insert(user_id.clone(), sender);
        }
        if let Some(player) = self.runtime.core.player_mut(&user_id) {
            player.is_active = self.conns.contains_key(&user_id);
            player.temporary_leave = false;
        }

        tracing::info!(
            room_id = %self.runtime.room_id,
            %user_id,
            %seat,
            "seat bound"
        );
        self.broadcast_snapshot();
        self.persist();
        Ok(())
    }

    fn handle_select_deck(&mut self, user_id: UserId, username: String, selection: DeckSelection) {
        if self.runtime.core.player_index(&user_id).is_none() {
            tracing::debug!(
                room_id = %self.runtime.room_id,
                %user_id,
                "deck selection from non-player, ignoring"
            );
            return;
        }
        if let Some(player) = self.runtime.core.player_mut(&user_id) {
            player.username = username;
        }

        self.runtime
            .core
            .hydrate_deck(&user_id, selection.deck_ref, &selection.cards);
        tracing::info!(
            room_id = %self.runtime.room_id,
            %user_id,
            cards = selection.cards.len(),
            "deck locked"
        );

        if self.runtime.core.try_setup() {
            // The match is live: stop accepting new seat-holders.
            self.runtime.locked = true;
            tracing::info!(room_id = %self.runtime.room_id, "room locked, match started");
        }

        self.broadcast_snapshot();
        self.persist();
    }

    fn handle_dispatch(&mut self, user_id: UserId, action: Action) {
        let tag = action.tag();
        let applied = self.runtime.core.apply(&user_id, action);

        if let Some(message) = &applied.broadcast {
            let actor = self
                .runtime
                .core
                .player(&user_id)
                .map(|p| p.username.clone())
                .unwrap_or_default();
            let entry = LogEntry {
                message: message.clone(),
                actor,
                action: tag.to_string(),
                card: applied.card.clone(),
            };
            self.runtime.log.push(entry.clone());
            self.broadcast(ServerEvent::from(&entry));
        }

        if let Some(PrivateReply::DeckContents { user_id, cards }) = applied.private {
            if let Some(sender) = self.conns.get(&user_id) {
                let _ = sender.send(ServerEvent::DeckContents { cards });
            }
        }

        if applied.reset {
            // Mutual restart: the dispatcher wiped the players; the
            // room-level half is unbinding seats and unlocking.
            self.runtime.seats.clear();
            self.runtime.locked = false;
            tracing::info!(room_id = %self.runtime.room_id, "mutual restart completed");
        }

        if applied.mutated {
            self.broadcast_snapshot();
            self.persist();
        }
    }

    fn handle_leave(&mut self, user_id: UserId) {
        self.lobby.remove(&user_id);
        self.conns.remove(&user_id);

        if let Some(player) = self.runtime.core.player_mut(&user_id) {
            // Player state is mid-match progress: keep the entry and all
            // its zones, just mark the absence.
            player.is_active = false;
            player.temporary_leave = true;
            player.last_active_ms = Some(now_ms());
            tracing::info!(room_id = %self.runtime.room_id, %user_id, "player disconnected");
        } else {
            let before = self.runtime.spectators.len();
            self.runtime.spectators.retain(|s| s.user_id != user_id);
            if self.runtime.spectators.len() != before {
                tracing::info!(room_id = %self.runtime.room_id, %user_id, "spectator removed");
            }
        }

        self.broadcast_snapshot();
        self.persist();
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.runtime.room_id.clone(),
            phase: self.runtime.core.state.phase,
            player_count: self.runtime.core.players.len(),
            spectator_count: self.runtime.spectators.len(),
            connected_count: self.conns.len(),
            locked: self.runtime.locked,
        }
    }

    // -- plumbing -----------------------------------------------------------

    fn snapshot_event(&self) -> ServerEvent {
        ServerEvent::StateSnapshot {
            room: self.runtime.snapshot(),
        }
    }

    fn broadcast_snapshot(&self) {
        self.broadcast(self.snapshot_event());
    }

    /// Sends an event to every live connection. Closed receivers are
    /// dropped silently; the Leave path does the bookkeeping.
    fn broadcast(&self, event: ServerEvent) {
        for sender in self.conns.values() {
            let _ = sender.send(event.clone());
        }
    }

    fn send_to(&self, sender: &ClientSender, event: ServerEvent) {
        let _ = sender.send(event);
    }

    /// Enqueues the durable write for the current state. Fire-and-forget
    /// from the actor's point of view; ordering is the queue's job.
    fn persist(&mut self) {
        let row = self.runtime.to_row();
        self.writes.push(row);
    }
}

/// Spawns a room actor task and returns its handle.
pub(crate) fn spawn_room(runtime: RoomRuntime, writes: WriteQueue) -> RoomHandle {
    let room_id = runtime.room_id.clone();
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);

    let actor = RoomActor {
        runtime,
        conns: HashMap::new(),
        lobby: HashMap::new(),
        writes,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
