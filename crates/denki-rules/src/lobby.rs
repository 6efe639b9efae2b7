//! Joining a room and getting both players ready.
//!
//! These flows are simple record edits, but they are where the
//! "exactly two players" invariant is enforced and where the first round
//! is created.

use denki_protocol::PlayerId;

use crate::{GameRoom, Player, Round, RuleConfig, RulesError};

/// Seats per room.
pub const MAX_PLAYERS: usize = 2;

/// Adds a player to the room.
///
/// # Errors
/// - [`RulesError::RoomFull`] if both seats are taken
/// - [`RulesError::InvalidState`] if a player with the same id already sat
///   down
pub fn join(room: &GameRoom, player: Player) -> Result<GameRoom, RulesError> {
    if room.is_member(player.id) {
        return Err(RulesError::InvalidState(format!(
            "player {} already joined",
            player.id
        )));
    }
    if room.players.len() >= MAX_PLAYERS {
        return Err(RulesError::RoomFull(room.id));
    }

    let mut next = room.clone();
    tracing::info!(
        room_id = %room.id,
        player_id = %player.id,
        players = next.players.len() + 1,
        "player joined"
    );
    next.players.push(player);
    Ok(next)
}

/// Marks a player ready. When both players are ready the game starts:
/// the first joiner attacks the opening round and every chair is in play.
///
/// Marking an already-ready player again changes nothing.
///
/// # Errors
/// - [`RulesError::NotAuthorized`] if the player isn't in the room
/// - [`RulesError::InvalidState`] if the game already started
pub fn set_ready(
    room: &GameRoom,
    player_id: PlayerId,
    rules: &RuleConfig,
) -> Result<GameRoom, RulesError> {
    if room.round.is_some() {
        return Err(RulesError::InvalidState("game already started".into()));
    }

    let mut next = room.clone();
    let player = next
        .player_mut(player_id)
        .ok_or(RulesError::NotAuthorized(player_id))?;
    player.ready = true;

    let all_ready =
        next.players.len() == MAX_PLAYERS && next.players.iter().all(|p| p.ready);
    if all_ready {
        let attacker = next.players[0].id;
        next.round = Some(Round::first(attacker));
        next.remaining_chairs = rules.chairs().collect();
        tracing::info!(
            room_id = %next.id,
            %attacker,
            chairs = next.remaining_chairs.len(),
            "game started"
        );
    }

    Ok(next)
}
