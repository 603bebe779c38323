//! Codec trait and implementations.
//!
//! A codec converts between Rust values and raw bytes. The layers above
//! (the store serializing room rows, a transport serializing events) don't
//! care how — they program against the [`Codec`] trait and the concrete
//! format is swappable.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` so a codec can be shared across tokio tasks
/// for the life of the process.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Human-readable, which makes persisted room rows inspectable with any
/// text tool. Behind the `json` feature flag (enabled by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;

    #[test]
    fn test_json_codec_round_trip() {
        let codec = JsonCodec;
        let value = vec![1u32, 2, 3];
        let bytes = codec.encode(&value).unwrap();
        let back: Vec<u32> = codec.decode(&bytes).unwrap();
        assert_eq!(value, back);
    }

    #[test]
    fn test_json_codec_decode_garbage_is_error() {
        let codec = JsonCodec;
        let result: Result<Vec<u32>, _> = codec.decode(b"not json");
        assert!(result.is_err());
    }
}
