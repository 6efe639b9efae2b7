//! The turn confirmation barrier.
//!
//! After a round is resolved both players have to acknowledge the result
//! before the game moves on. Each call to [`confirm`] is one
//! acknowledgement; the second one builds the next round.
//!
//! ```text
//! AwaitingFirst ──confirm──→ AwaitingSecond ──confirm──→ Advanced
//!  (no ids)                   (one id, shown)             (fresh round)
//! ```
//!
//! The store runs [`confirm`] inside a transaction, so two players
//! confirming at the same instant are serialized: the loser re-runs against
//! the winner's committed round and sees `AwaitingSecond`, never a stale
//! `AwaitingFirst`.

use denki_protocol::PlayerId;

use crate::{GameRoom, Phase, RoomUpdate, Round, RulesError};

/// Where a resolved round stands in the barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierState {
    /// Nobody has confirmed yet.
    AwaitingFirst,
    /// One player confirmed; the other still has to.
    AwaitingSecond,
    /// Both confirmed. On a running game the round has already been
    /// replaced, so this is only observable once the game has ended.
    Advanced,
}

impl BarrierState {
    /// Reads the state off a round. `confirmed_ids` is the stored field and
    /// this enum is computed from it; [`confirm`] branches on the enum only.
    pub fn of(round: &Round) -> Self {
        match round.result.confirmed_ids.len() {
            0 => Self::AwaitingFirst,
            1 => Self::AwaitingSecond,
            _ => Self::Advanced,
        }
    }
}

/// What a confirmation did to the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// First confirmation recorded on the current round.
    Recorded(Round),
    /// Second confirmation: this fresh round replaces the finished one.
    Advanced(Round),
    /// Second confirmation on a finished game. Recorded, nothing follows.
    Acknowledged(Round),
    /// Duplicate or surplus confirmation. Nothing to write.
    Ignored,
}

impl Confirmation {
    /// The write this confirmation needs, `None` for a no-op.
    pub fn into_update(self) -> Option<RoomUpdate> {
        match self {
            Self::Recorded(round) | Self::Advanced(round) | Self::Acknowledged(round) => {
                Some(RoomUpdate::round(round))
            }
            Self::Ignored => None,
        }
    }
}

/// Records `player_id`'s acknowledgement of the shown result.
///
/// A player confirming twice, or anyone confirming a round that already
/// has both confirmations, is a no-op ([`Confirmation::Ignored`]).
///
/// # Errors
/// - [`RulesError::NotAuthorized`] if the player isn't in the room
/// - [`RulesError::StaleRound`] if there is no resolved round to confirm
pub fn confirm(room: &GameRoom, player_id: PlayerId) -> Result<Confirmation, RulesError> {
    if !room.is_member(player_id) {
        return Err(RulesError::NotAuthorized(player_id));
    }
    let round = room
        .round
        .as_ref()
        .ok_or_else(|| RulesError::StaleRound("game has not started".into()))?;
    if round.phase != Phase::Result {
        return Err(RulesError::StaleRound(format!(
            "round {} ({}) is in phase {}",
            round.count, round.turn, round.phase
        )));
    }
    if round.result.confirmed_ids.contains(&player_id) {
        tracing::debug!(room_id = %room.id, %player_id, "duplicate confirmation ignored");
        return Ok(Confirmation::Ignored);
    }

    match BarrierState::of(round) {
        BarrierState::AwaitingFirst => {
            let mut current = round.clone();
            current.result.confirmed_ids.push(player_id);
            current.result.shown_result = true;
            tracing::debug!(room_id = %room.id, %player_id, "first confirmation recorded");
            Ok(Confirmation::Recorded(current))
        }
        BarrierState::AwaitingSecond => {
            let mut confirmed = round.result.confirmed_ids.clone();
            confirmed.push(player_id);

            if room.is_finished() {
                let mut current = round.clone();
                current.result.confirmed_ids = confirmed;
                tracing::debug!(room_id = %room.id, "final result acknowledged by both players");
                return Ok(Confirmation::Acknowledged(current));
            }

            let next = next_round(round, &confirmed);
            tracing::info!(
                room_id = %room.id,
                attacker = %next.attacker_id,
                turn = %next.turn,
                count = next.count,
                "round advanced"
            );
            Ok(Confirmation::Advanced(next))
        }
        BarrierState::Advanced => {
            tracing::debug!(room_id = %room.id, %player_id, "round already confirmed by both");
            Ok(Confirmation::Ignored)
        }
    }
}

/// Picks the next attacker: whoever confirmed and isn't attacking now.
/// Falls back to the first confirmer if both entries name the attacker.
pub fn next_attacker(confirmed_ids: &[PlayerId], current_attacker: PlayerId) -> Option<PlayerId> {
    confirmed_ids
        .iter()
        .copied()
        .find(|&id| id != current_attacker)
        .or_else(|| confirmed_ids.first().copied())
}

/// Builds the round that follows `finished` once `confirmed_ids` holds
/// both confirmations. Every per-round field starts over in `Select`.
pub fn next_round(finished: &Round, confirmed_ids: &[PlayerId]) -> Round {
    let attacker =
        next_attacker(confirmed_ids, finished.attacker_id).unwrap_or(finished.attacker_id);
    let (turn, cycle_done) = finished.turn.advance();
    let count = if cycle_done {
        finished.count + 1
    } else {
        finished.count
    };
    Round::new(attacker, turn, count)
}
