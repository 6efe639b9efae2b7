//! Seat selection: hiding the electric chair, sitting down, pulling the switch.
//!
//! The defender acts first and last in a round: it hides the electric chair
//! in `Select` and pulls the switch once the attacker has sat down in
//! `Activate`. The attacker may change seats any number of times before the
//! switch is pulled.

use denki_protocol::PlayerId;

use crate::resolver::resolve;
use crate::{GameRoom, Phase, RuleConfig, RulesError};

/// Checks the game is running and the caller is this round's defender.
fn ensure_defender(room: &GameRoom, player_id: PlayerId) -> Result<(), RulesError> {
    ensure_running(room)?;
    if room.defender_id() != Some(player_id) {
        return Err(RulesError::NotAuthorized(player_id));
    }
    Ok(())
}

fn ensure_running(room: &GameRoom) -> Result<(), RulesError> {
    if let Some(winner) = room.winner {
        return Err(RulesError::InvalidState(format!(
            "game is over (winner: {winner})"
        )));
    }
    room.current_round().map(|_| ())
}

fn ensure_in_play(room: &GameRoom, chair: u32) -> Result<(), RulesError> {
    if !room.remaining_chairs.contains(&chair) {
        return Err(RulesError::ChairUnavailable(chair));
    }
    Ok(())
}

/// The defender hides the electric chair and the round moves to `Activate`.
///
/// # Errors
/// - [`RulesError::NotAuthorized`] unless the caller is the defender
/// - [`RulesError::InvalidState`] outside the `Select` phase
/// - [`RulesError::ChairUnavailable`] if the chair is out of play
pub fn select_electric_chair(
    room: &GameRoom,
    player_id: PlayerId,
    chair: u32,
) -> Result<GameRoom, RulesError> {
    ensure_defender(room, player_id)?;
    let round = room.current_round()?;
    if !round.phase.can_transition_to(Phase::Activate) {
        return Err(RulesError::InvalidState(format!(
            "cannot hide the electric chair in phase {}",
            round.phase
        )));
    }
    ensure_in_play(room, chair)?;

    let mut next = room.clone();
    if let Some(round) = next.round.as_mut() {
        round.electric_chair = Some(chair);
        round.phase = Phase::Activate;
    }
    tracing::debug!(room_id = %room.id, %player_id, "electric chair hidden");
    Ok(next)
}

/// The attacker takes a seat.
///
/// # Errors
/// - [`RulesError::NotAuthorized`] unless the caller is the attacker
/// - [`RulesError::InvalidState`] outside the `Activate` phase
/// - [`RulesError::ChairUnavailable`] if the chair is out of play
pub fn sit(room: &GameRoom, player_id: PlayerId, chair: u32) -> Result<GameRoom, RulesError> {
    ensure_running(room)?;
    let round = room.current_round()?;
    if round.attacker_id != player_id {
        return Err(RulesError::NotAuthorized(player_id));
    }
    if round.phase != Phase::Activate {
        return Err(RulesError::InvalidState(format!(
            "cannot sit down in phase {}",
            round.phase
        )));
    }
    ensure_in_play(room, chair)?;

    let mut next = room.clone();
    if let Some(round) = next.round.as_mut() {
        round.seated_chair = Some(chair);
    }
    tracing::debug!(room_id = %room.id, %player_id, chair, "attacker seated");
    Ok(next)
}

/// The defender pulls the switch: the round is resolved.
///
/// # Errors
/// [`RulesError::NotAuthorized`] unless the caller is the defender, plus
/// everything [`resolve`] can return.
pub fn pull_switch(
    room: &GameRoom,
    player_id: PlayerId,
    rules: &RuleConfig,
) -> Result<GameRoom, RulesError> {
    ensure_defender(room, player_id)?;
    resolve(room, rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, Round, Winner};
    use denki_protocol::RoomId;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    /// Player 1 attacks, player 2 defends, all twelve chairs in play.
    fn started() -> GameRoom {
        let mut room = GameRoom::new(RoomId(1));
        room.players = vec![Player::new(pid(1), "alice"), Player::new(pid(2), "bob")];
        room.round = Some(Round::first(pid(1)));
        room.remaining_chairs = (1..=12).collect();
        room
    }

    #[test]
    fn test_select_electric_chair_moves_to_activate() {
        let room = select_electric_chair(&started(), pid(2), 7).unwrap();
        let round = room.round.unwrap();
        assert_eq!(round.electric_chair, Some(7));
        assert_eq!(round.phase, Phase::Activate);
    }

    #[test]
    fn test_select_electric_chair_by_attacker_is_not_authorized() {
        let result = select_electric_chair(&started(), pid(1), 7);
        assert_eq!(result, Err(RulesError::NotAuthorized(pid(1))));
    }

    #[test]
    fn test_select_electric_chair_twice_is_invalid_state() {
        let room = select_electric_chair(&started(), pid(2), 7).unwrap();
        let result = select_electric_chair(&room, pid(2), 8);
        assert!(matches!(result, Err(RulesError::InvalidState(_))));
    }

    #[test]
    fn test_select_retired_chair_is_unavailable() {
        let mut room = started();
        room.remaining_chairs.remove(&5);
        let result = select_electric_chair(&room, pid(2), 5);
        assert_eq!(result, Err(RulesError::ChairUnavailable(5)));
    }

    #[test]
    fn test_sit_before_chair_hidden_is_invalid_state() {
        let result = sit(&started(), pid(1), 3);
        assert!(matches!(result, Err(RulesError::InvalidState(_))));
    }

    #[test]
    fn test_sit_by_defender_is_not_authorized() {
        let room = select_electric_chair(&started(), pid(2), 7).unwrap();
        assert_eq!(sit(&room, pid(2), 3), Err(RulesError::NotAuthorized(pid(2))));
    }

    #[test]
    fn test_sit_can_change_seat_before_switch() {
        let room = select_electric_chair(&started(), pid(2), 7).unwrap();
        let room = sit(&room, pid(1), 3).unwrap();
        let room = sit(&room, pid(1), 11).unwrap();
        assert_eq!(room.round.unwrap().seated_chair, Some(11));
    }

    #[test]
    fn test_sit_on_chair_zero_is_unavailable() {
        let room = select_electric_chair(&started(), pid(2), 7).unwrap();
        assert_eq!(sit(&room, pid(1), 0), Err(RulesError::ChairUnavailable(0)));
    }

    #[test]
    fn test_pull_switch_by_attacker_is_not_authorized() {
        let room = select_electric_chair(&started(), pid(2), 7).unwrap();
        let room = sit(&room, pid(1), 3).unwrap();
        let result = pull_switch(&room, pid(1), &RuleConfig::default());
        assert_eq!(result, Err(RulesError::NotAuthorized(pid(1))));
    }

    #[test]
    fn test_pull_switch_resolves_round() {
        let room = select_electric_chair(&started(), pid(2), 7).unwrap();
        let room = sit(&room, pid(1), 3).unwrap();
        let room = pull_switch(&room, pid(2), &RuleConfig::default()).unwrap();
        assert_eq!(room.round.as_ref().unwrap().phase, Phase::Result);
        assert_eq!(room.player(pid(1)).unwrap().point, 3);
    }

    #[test]
    fn test_actions_after_game_over_are_invalid_state() {
        let mut room = started();
        room.winner = Some(Winner::Draw);
        assert!(matches!(
            select_electric_chair(&room, pid(2), 7),
            Err(RulesError::InvalidState(_))
        ));
        assert!(matches!(sit(&room, pid(1), 3), Err(RulesError::InvalidState(_))));
    }

    #[test]
    fn test_actions_before_start_are_invalid_state() {
        let mut room = started();
        room.round = None;
        assert!(matches!(sit(&room, pid(1), 3), Err(RulesError::InvalidState(_))));
    }
}
