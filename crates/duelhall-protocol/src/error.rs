//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding values.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed bytes, missing fields, or a
    /// shape that doesn't match the expected type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The value decoded but is invalid at the protocol level.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
