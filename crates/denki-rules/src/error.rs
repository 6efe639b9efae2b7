//! Error types for the rules layer.

use denki_protocol::{PlayerId, RoomId};

/// Errors raised by the pure rule transitions.
///
/// None of these are transient: retrying the same action against the same
/// snapshot fails the same way. The store surfaces them to the caller
/// without retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// The action doesn't fit the room's current phase. For example,
    /// activating before a seat was taken, or acting after the game ended.
    #[error("invalid state for this action: {0}")]
    InvalidState(String),

    /// The player isn't in the room, or isn't the one allowed to act.
    #[error("player {0} is not allowed to do this")]
    NotAuthorized(PlayerId),

    /// A confirmation arrived for a round that has nothing to confirm.
    #[error("stale round: {0}")]
    StaleRound(String),

    /// The room already seats two players.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The chair is out of play or was never on the board.
    #[error("chair {0} is not available")]
    ChairUnavailable(u32),
}
