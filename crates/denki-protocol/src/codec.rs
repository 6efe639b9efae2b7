//! Codec trait and implementations for encoding room documents.
//!
//! The document store keeps rooms as opaque bytes. It doesn't care HOW a
//! `GameRoom` becomes bytes, only that something implements [`Codec`].
//! [`JsonCodec`] is the default; a binary codec can be swapped in without
//! touching the store or the rules.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because a codec lives inside a store that is
/// shared across Tokio tasks for the whole life of the process.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Stored documents stay human-readable, which makes a misbehaving room easy
/// to inspect in logs. Behind the `json` feature (enabled by default).
///
/// ## Example
///
/// ```rust
/// use denki_protocol::{Codec, JsonCodec, PlayerId};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&PlayerId(5)).unwrap();
/// assert_eq!(bytes, b"5");
///
/// let decoded: PlayerId = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, PlayerId(5));
/// ```
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
