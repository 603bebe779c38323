//! # Duelhall
//!
//! The authoritative real-time engine for two-player card-game matches
//! (plus unlimited spectators). Duelhall keeps a match consistent across
//! disconnect-prone clients: every room is a single-writer actor, player
//! state survives socket churn, and each accepted action is durably
//! written through a per-room ordered queue.
//!
//! Transport and authentication live outside this crate — the excluded
//! layers call [`Engine`] (or hand it decoded [`ClientCommand`]s) with
//! already-authenticated identities, and receive events on plain
//! channels standing in for sockets.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use duelhall::prelude::*;
//!
//! # async fn run() {
//! let engine = Engine::new(Arc::new(MemoryStore::new()), FixedCatalog::default());
//! let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
//! engine
//!     .join(RoomId::new("r1"), UserId::new("u1"), "alice".into(), false, tx)
//!     .await
//!     .unwrap();
//! # }
//! ```

mod catalog;
mod command;
mod engine;
mod error;

pub use catalog::{CatalogError, DeckCatalog, FixedCatalog};
pub use command::ClientCommand;
pub use engine::{DeckRequest, Engine};
pub use error::DuelhallError;

/// One-stop imports for embedding the engine.
pub mod prelude {
    pub use crate::{
        CatalogError, ClientCommand, DeckCatalog, DeckRequest, DuelhallError, Engine, FixedCatalog,
    };
    pub use duelhall_match::{Action, CardSpec, Phase, Placement, SlotArea, StatKind, ZoneId};
    pub use duelhall_protocol::{DeckId, RoomId, SeatLabel, UserId};
    pub use duelhall_room::{ClientSender, RoomSnapshot, ServerEvent};
    pub use duelhall_store::{JsonFileStore, MemoryStore, RoomStore};
}
