//! Room registry: roomId → live actor, with cold-start hydration.

use std::collections::HashMap;
use std::sync::Arc;

use duelhall_protocol::RoomId;
use duelhall_store::{RoomStore, WriteQueue};

use crate::room::{spawn_room, RoomHandle, RoomRuntime};
use crate::RoomError;

/// Owns every live room actor in the process.
///
/// Rooms are created on first touch: if no actor exists for a roomId the
/// registry asks the store for a durable row, rebuilds the runtime from
/// it (or starts empty), and spawns the actor plus its write queue.
/// Rooms are never evicted while the process runs — a restart implicitly
/// clears the map and the next touch rehydrates.
pub struct RoomRegistry<S: RoomStore> {
    store: Arc<S>,
    rooms: HashMap<RoomId, RoomHandle>,
}

impl<S: RoomStore> RoomRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            rooms: HashMap::new(),
        }
    }

    /// Returns the live handle for a room, hydrating it first if this is
    /// the process's first touch of that roomId.
    pub async fn room(&mut self, room_id: &RoomId) -> Result<RoomHandle, RoomError> {
        if let Some(handle) = self.rooms.get(room_id) {
            return Ok(handle.clone());
        }

        let (runtime, start_seq) = match self.store.load(room_id).await? {
            Some(row) => {
                let seq = row.write_seq;
                tracing::info!(%room_id, write_seq = seq, "rehydrating room from store");
                (RoomRuntime::from_row(room_id.clone(), row), seq)
            }
            None => {
                tracing::info!(%room_id, "creating empty room");
                (RoomRuntime::new(room_id.clone()), 0)
            }
        };

        let writes = WriteQueue::spawn(Arc::clone(&self.store), room_id.clone(), start_seq);
        let handle = spawn_room(runtime, writes);
        self.rooms.insert(room_id.clone(), handle.clone());
        Ok(handle)
    }

    /// Whether a live actor exists for this room (no hydration).
    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }
}
