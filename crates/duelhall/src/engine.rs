//! The engine facade: the five inbound operations.
//!
//! `Engine` is what the transport layer talks to. It owns the room
//! registry (behind a mutex — registry lookups are short and rare
//! relative to room traffic, which flows through per-room channels) and
//! the deck catalog hook. All real work happens inside room actors; the
//! engine's job is routing plus deck hydration.

use std::sync::Arc;

use duelhall_match::{Action, DeckRef};
use duelhall_protocol::{DeckId, RoomId, SeatLabel, UserId};
use duelhall_room::{ClientSender, DeckSelection, RoomRegistry};
use duelhall_store::RoomStore;
use tokio::sync::Mutex;

use crate::command::ClientCommand;
use crate::{DeckCatalog, DuelhallError};

/// A deck pick as declared by the client. The engine expands it through
/// the catalog before handing it to the room.
#[derive(Debug, Clone)]
pub struct DeckRequest {
    pub deck_id: DeckId,
    pub deck_name: String,
    pub hero_name: String,
    pub champion: Option<String>,
}

/// The room runtime engine.
pub struct Engine<S: RoomStore, D: DeckCatalog> {
    registry: Mutex<RoomRegistry<S>>,
    catalog: D,
}

impl<S: RoomStore, D: DeckCatalog> Engine<S, D> {
    pub fn new(store: Arc<S>, catalog: D) -> Self {
        Self {
            registry: Mutex::new(RoomRegistry::new(store)),
            catalog,
        }
    }

    /// Registers a connection with a room, hydrating the room from
    /// storage if this is its first touch since process start.
    pub async fn join(
        &self,
        room_id: RoomId,
        user_id: UserId,
        username: String,
        spectate: bool,
        sender: ClientSender,
    ) -> Result<(), DuelhallError> {
        let room = self.registry.lock().await.room(&room_id).await?;
        room.join(user_id, username, spectate, sender).await?;
        Ok(())
    }

    /// Claims a seat for a user.
    pub async fn bind_seat(
        &self,
        room_id: RoomId,
        user_id: UserId,
        username: String,
        seat: SeatLabel,
    ) -> Result<(), DuelhallError> {
        let room = self.registry.lock().await.room(&room_id).await?;
        room.bind_seat(user_id, username, seat).await?;
        Ok(())
    }

    /// Locks in a deck: expands the card list through the catalog, then
    /// hands the hydrated selection to the room (which runs match setup
    /// once both seats have locked decks).
    pub async fn select_deck(
        &self,
        room_id: RoomId,
        user_id: UserId,
        username: String,
        request: DeckRequest,
    ) -> Result<(), DuelhallError> {
        let cards = self.catalog.fetch_deck(&request.deck_id).await?;
        let selection = DeckSelection {
            deck_ref: DeckRef {
                deck_id: request.deck_id,
                name: request.deck_name,
                hero: request.hero_name,
                champion: request.champion,
            },
            cards,
        };
        let room = self.registry.lock().await.room(&room_id).await?;
        room.select_deck(user_id, username, selection).await?;
        Ok(())
    }

    /// Routes a game action to the room's dispatcher. Validation
    /// failures resolve inside the room — this only errors when the
    /// room itself is unreachable.
    pub async fn dispatch(
        &self,
        room_id: RoomId,
        user_id: UserId,
        action: Action,
    ) -> Result<(), DuelhallError> {
        let room = self.registry.lock().await.room(&room_id).await?;
        room.dispatch(user_id, action).await?;
        Ok(())
    }

    /// Explicit disconnect path (also called on transport drop).
    pub async fn leave(&self, room_id: RoomId, user_id: UserId) -> Result<(), DuelhallError> {
        let room = self.registry.lock().await.room(&room_id).await?;
        room.leave(user_id).await?;
        Ok(())
    }

    /// Wire-facing entry point: dispatches one decoded client command.
    /// This is the single function a transport adapter needs to call.
    pub async fn handle(
        &self,
        command: ClientCommand,
        sender: ClientSender,
    ) -> Result<(), DuelhallError> {
        match command {
            ClientCommand::Join {
                room_id,
                user_id,
                username,
                spectate,
            } => self.join(room_id, user_id, username, spectate, sender).await,
            ClientCommand::BindSeat {
                room_id,
                user_id,
                username,
                seat,
            } => self.bind_seat(room_id, user_id, username, seat).await,
            ClientCommand::SelectDeck {
                room_id,
                user_id,
                username,
                deck_id,
                deck_name,
                hero_name,
                champion,
            } => {
                self.select_deck(
                    room_id,
                    user_id,
                    username,
                    DeckRequest {
                        deck_id,
                        deck_name,
                        hero_name,
                        champion,
                    },
                )
                .await
            }
            ClientCommand::DispatchAction {
                room_id,
                user_id,
                action,
            } => self.dispatch(room_id, user_id, action).await,
            ClientCommand::Leave { room_id, user_id } => self.leave(room_id, user_id).await,
        }
    }

    /// Number of rooms live in this process (test/metrics hook).
    pub async fn live_room_count(&self) -> usize {
        self.registry.lock().await.room_count()
    }
}
