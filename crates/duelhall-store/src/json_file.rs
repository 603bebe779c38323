//! File-backed store: one JSON document per room.

use std::path::{Path, PathBuf};

use duelhall_protocol::{Codec, JsonCodec, RoomId};
use tokio::fs;

use crate::{migrate, PersistedRoom, RoomStore, StoreError};

/// Stores each room as `<dir>/<room_id>.json`.
///
/// Room ids come from an external lobby layer, so they are sanitized
/// before touching the filesystem. Loads run through the migration path
/// like every other backend.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    codec: JsonCodec,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            codec: JsonCodec,
        }
    }

    fn path_for(&self, room_id: &RoomId) -> PathBuf {
        let safe: String = room_id
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RoomStore for JsonFileStore {
    async fn load(&self, room_id: &RoomId) -> Result<Option<PersistedRoom>, StoreError> {
        let path = self.path_for(room_id);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Backend(e)),
        };
        migrate::from_slice(&bytes).map(Some)
    }

    async fn save(&self, room_id: &RoomId, row: PersistedRoom) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;
        let bytes = self.codec.encode(&row)?;
        fs::write(self.path_for(room_id), bytes).await?;
        Ok(())
    }
}
