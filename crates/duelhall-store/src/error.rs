//! Error types for the persistence layer.

/// Errors that can occur while loading or saving room rows.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or the file operation failed.
    #[error("storage backend error: {0}")]
    Backend(#[from] std::io::Error),

    /// The stored bytes don't parse as any known row version.
    #[error("corrupt room row: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// Row (de)serialization failed on the way to the backend.
    #[error(transparent)]
    Codec(#[from] duelhall_protocol::ProtocolError),
}
