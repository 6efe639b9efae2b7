//! Unified error type for the Denki engine.

use denki_protocol::ProtocolError;
use denki_rules::RulesError;
use denki_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// A rules rejection that travelled through a store transaction comes out
/// as [`DenkiError::Rules`], not wrapped twice, so callers can match on
/// the rules variant directly.
#[derive(Debug, thiserror::Error)]
pub enum DenkiError {
    /// A document could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The action was rejected by the game rules.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// The store failed: missing room or a lost write race.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for DenkiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rules(err) => Self::Rules(err),
            StoreError::Protocol(err) => Self::Protocol(err),
            other => Self::Store(other),
        }
    }
}

impl DenkiError {
    /// Returns `true` if re-issuing the request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_transient())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use denki_protocol::{PlayerId, RoomId};

    #[test]
    fn test_from_rules_error() {
        let err: DenkiError = RulesError::NotAuthorized(PlayerId(3)).into();
        assert!(matches!(err, DenkiError::Rules(RulesError::NotAuthorized(_))));
        assert!(err.to_string().contains("P-3"));
    }

    #[test]
    fn test_from_store_error_unwraps_rules() {
        let err: DenkiError = StoreError::Rules(RulesError::StaleRound("x".into())).into();
        assert!(matches!(err, DenkiError::Rules(RulesError::StaleRound(_))));
    }

    #[test]
    fn test_from_store_error_not_found() {
        let err: DenkiError = StoreError::NotFound(RoomId(1)).into();
        assert!(matches!(err, DenkiError::Store(StoreError::NotFound(_))));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_conflict_is_transient() {
        let err: DenkiError = StoreError::Conflict {
            room_id: RoomId(1),
            attempts: 5,
        }
        .into();
        assert!(err.is_transient());
    }
}
