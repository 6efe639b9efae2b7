//! Error types for the protocol layer.
//!
//! Each crate in Denki defines its own error enum. A `ProtocolError` always
//! means a document could not be turned into bytes or back, never a rules
//! violation or a storage race.

/// Errors that can occur while encoding or decoding documents.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: a truncated document or one written by an
    /// incompatible version.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
