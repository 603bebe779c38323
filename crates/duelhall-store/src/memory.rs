//! In-memory store backend.

use std::collections::HashMap;
use std::sync::Arc;

use duelhall_protocol::RoomId;
use tokio::sync::Mutex;

use crate::{PersistedRoom, RoomStore, StoreError};

/// A store that keeps rows in a process-local map.
///
/// The default for tests and demos, and a faithful stand-in for any
/// remote backend: rows round-trip through the same shapes, they just
/// don't survive the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Arc<Mutex<HashMap<RoomId, PersistedRoom>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rooms with a saved row (test hook).
    pub async fn row_count(&self) -> usize {
        self.rows.lock().await.len()
    }
}

impl RoomStore for MemoryStore {
    async fn load(&self, room_id: &RoomId) -> Result<Option<PersistedRoom>, StoreError> {
        Ok(self.rows.lock().await.get(room_id).cloned())
    }

    async fn save(&self, room_id: &RoomId, row: PersistedRoom) -> Result<(), StoreError> {
        self.rows.lock().await.insert(room_id.clone(), row);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_room_is_none() {
        let store = MemoryStore::new();
        let row = store.load(&RoomId::new("nope")).await.unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let store = MemoryStore::new();
        let room = RoomId::new("r1");
        let mut row = PersistedRoom::empty();
        row.locked = true;

        store.save(&room, row.clone()).await.unwrap();
        let back = store.load(&room).await.unwrap().unwrap();

        assert_eq!(back, row);
        assert_eq!(store.row_count().await, 1);
    }

    #[tokio::test]
    async fn test_save_replaces_previous_row() {
        let store = MemoryStore::new();
        let room = RoomId::new("r1");
        store.save(&room, PersistedRoom::empty()).await.unwrap();

        let mut updated = PersistedRoom::empty();
        updated.write_seq = 9;
        store.save(&room, updated.clone()).await.unwrap();

        let back = store.load(&room).await.unwrap().unwrap();
        assert_eq!(back.write_seq, 9);
    }
}
