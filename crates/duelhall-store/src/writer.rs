//! Per-room durable-write queue.
//!
//! Each live room owns one of these. Pushes are synchronous and cheap
//! (an unbounded channel send from inside the room actor); a dedicated
//! task drains the channel and awaits each save before starting the
//! next. That single consumer is what guarantees writes land in
//! issuance order — a slow early write can never overtake and clobber a
//! fast later one.

use std::sync::Arc;

use duelhall_protocol::RoomId;
use tokio::sync::mpsc;

use crate::{PersistedRoom, RoomStore};

/// Handle for enqueueing room rows. Dropping it stops the writer task
/// once the queue drains.
#[derive(Debug)]
pub struct WriteQueue {
    tx: mpsc::UnboundedSender<PersistedRoom>,
    seq: u64,
}

impl WriteQueue {
    /// Spawns the writer task for one room.
    ///
    /// `start_seq` seeds the sequence counter — pass the loaded row's
    /// `write_seq` so numbering continues across restarts.
    pub fn spawn<S: RoomStore>(store: Arc<S>, room_id: RoomId, start_seq: u64) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<PersistedRoom>();

        tokio::spawn(async move {
            while let Some(row) = rx.recv().await {
                let seq = row.write_seq;
                if let Err(e) = store.save(&room_id, row).await {
                    // Persistence is best-effort relative to the live
                    // room; gameplay never blocks on it.
                    tracing::warn!(%room_id, seq, error = %e, "room write failed");
                }
            }
            tracing::debug!(%room_id, "write queue drained and closed");
        });

        Self { tx, seq: start_seq }
    }

    /// Stamps the next sequence number and enqueues the row.
    pub fn push(&mut self, mut row: PersistedRoom) {
        self.seq += 1;
        row.write_seq = self.seq;
        let _ = self.tx.send(row);
    }

    /// The sequence number of the most recently enqueued write.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn test_writes_apply_in_issuance_order() {
        let store = Arc::new(MemoryStore::new());
        let room = RoomId::new("r1");
        let mut queue = WriteQueue::spawn(Arc::clone(&store), room.clone(), 0);

        for _ in 0..20 {
            queue.push(PersistedRoom::empty());
        }
        assert_eq!(queue.seq(), 20);

        // Give the writer task time to drain.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let row = store.load(&room).await.unwrap().unwrap();
        assert_eq!(row.write_seq, 20, "last issued write is the survivor");
    }

    #[tokio::test]
    async fn test_start_seq_continues_numbering() {
        let store = Arc::new(MemoryStore::new());
        let mut queue = WriteQueue::spawn(store, RoomId::new("r2"), 41);
        queue.push(PersistedRoom::empty());
        assert_eq!(queue.seq(), 42);
    }
}
