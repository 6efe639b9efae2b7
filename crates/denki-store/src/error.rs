//! Error types for the store layer.

use denki_protocol::{ProtocolError, RoomId};
use denki_rules::RulesError;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Another writer committed first. Transactions retry this internally
    /// and only report it once every attempt lost the race.
    #[error("write conflict on room {room_id} after {attempts} attempt(s)")]
    Conflict { room_id: RoomId, attempts: u32 },

    /// The transaction body rejected the action. Never retried.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// A stored document could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl StoreError {
    /// Returns `true` if re-issuing the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
