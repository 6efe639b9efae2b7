//! Round outcome resolution: what happens when the switch is pulled.
//!
//! [`resolve`] is a pure function of the room snapshot. It is NOT
//! idempotent (every application moves scores), so it must run exactly once
//! per round. The phase guard makes that hold under the store's
//! transactions: once a resolution commits, the round is in `Result` and any
//! replay against the committed state is rejected.

use std::collections::BTreeSet;

use crate::{GameRoom, Phase, Player, ResultStatus, RuleConfig, RulesError, Winner};

/// Resolves the current round.
///
/// 1. Shocked if the attacker sat on the electric chair.
/// 2. Shocked: the attacker's points drop to zero and one shock is added.
///    Safe: the chair's number is added to the attacker's points.
/// 3. A safe chair is retired from `remaining_chairs`.
/// 4. The winner is decided by [`determine_winner`].
/// 5. The round moves to `Result` with the outcome recorded; confirmations
///    are left as they were.
///
/// # Errors
/// [`RulesError::InvalidState`] if the game is over or hasn't started, the
/// round isn't in `Activate`, or either chair is still unset.
pub fn resolve(room: &GameRoom, rules: &RuleConfig) -> Result<GameRoom, RulesError> {
    if room.is_finished() {
        return Err(RulesError::InvalidState("game is already over".into()));
    }
    let round = room.current_round()?;
    if !round.phase.can_transition_to(Phase::Result) {
        return Err(RulesError::InvalidState(format!(
            "cannot activate in phase {}",
            round.phase
        )));
    }
    let seated = round
        .seated_chair
        .ok_or_else(|| RulesError::InvalidState("no chair has been taken".into()))?;
    let electric = round
        .electric_chair
        .ok_or_else(|| RulesError::InvalidState("electric chair was never set".into()))?;
    let attacker_id = round.attacker_id;

    let status = if seated == electric {
        ResultStatus::Shocked
    } else {
        ResultStatus::Safe
    };

    let mut next = room.clone();
    let attacker = next
        .player_mut(attacker_id)
        .ok_or_else(|| RulesError::InvalidState(format!("attacker {attacker_id} left the room")))?;
    match status {
        ResultStatus::Shocked => {
            attacker.point = 0;
            attacker.shocked_count += 1;
        }
        ResultStatus::Safe => {
            attacker.point = attacker.point.saturating_add(seated);
            next.remaining_chairs.remove(&seated);
        }
    }

    next.winner = determine_winner(&next.players, &next.remaining_chairs, rules);

    if let Some(round) = next.round.as_mut() {
        round.phase = Phase::Result;
        round.result.status = Some(status);
    }

    tracing::info!(
        room_id = %room.id,
        attacker = %attacker_id,
        chair = seated,
        %status,
        remaining = next.remaining_chairs.len(),
        "round resolved"
    );
    if let Some(winner) = next.winner {
        tracing::info!(room_id = %room.id, %winner, "game finished");
    }

    Ok(next)
}

/// Decides whether the game is over. The first matching rule wins:
///
/// 1. A player at or above `winning_points` wins on score.
/// 2. A player at `max_shocks` is eliminated; the other player wins.
/// 3. With at most one chair left the higher score wins, a tie is a draw.
/// 4. Otherwise the game goes on.
pub fn determine_winner(
    players: &[Player],
    remaining_chairs: &BTreeSet<u32>,
    rules: &RuleConfig,
) -> Option<Winner> {
    if let Some(p) = players.iter().find(|p| p.point >= rules.winning_points) {
        return Some(Winner::Player(p.id));
    }

    if let Some(out) = players.iter().find(|p| p.shocked_count >= rules.max_shocks) {
        return players
            .iter()
            .find(|p| p.id != out.id)
            .map(|other| Winner::Player(other.id));
    }

    if remaining_chairs.len() <= 1 {
        let [a, b] = players else {
            return None;
        };
        return Some(match a.point.cmp(&b.point) {
            std::cmp::Ordering::Greater => Winner::Player(a.id),
            std::cmp::Ordering::Less => Winner::Player(b.id),
            std::cmp::Ordering::Equal => Winner::Draw,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Round;
    use denki_protocol::{PlayerId, RoomId};

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    /// Player 1 attacks; the electric chair and seat are already set.
    fn armed(electric: u32, seated: u32) -> GameRoom {
        let mut room = GameRoom::new(RoomId(1));
        room.players = vec![Player::new(pid(1), "alice"), Player::new(pid(2), "bob")];
        let mut round = Round::first(pid(1));
        round.phase = Phase::Activate;
        round.electric_chair = Some(electric);
        round.seated_chair = Some(seated);
        room.round = Some(round);
        room.remaining_chairs = (1..=12).collect();
        room
    }

    fn rules() -> RuleConfig {
        RuleConfig::default()
    }

    #[test]
    fn test_resolve_safe_adds_chair_points_and_retires_chair() {
        let room = resolve(&armed(5, 9), &rules()).unwrap();
        let attacker = room.player(pid(1)).unwrap();
        assert_eq!(attacker.point, 9);
        assert_eq!(attacker.shocked_count, 0);
        assert!(!room.remaining_chairs.contains(&9));
        assert_eq!(room.remaining_chairs.len(), 11);

        let round = room.round.unwrap();
        assert_eq!(round.phase, Phase::Result);
        assert_eq!(round.result.status, Some(ResultStatus::Safe));
        assert_eq!(room.winner, None);
    }

    #[test]
    fn test_resolve_shocked_resets_points_and_keeps_chairs() {
        let mut room = armed(4, 4);
        room.players[0].point = 25;

        let room = resolve(&room, &rules()).unwrap();

        let attacker = room.player(pid(1)).unwrap();
        assert_eq!(attacker.point, 0);
        assert_eq!(attacker.shocked_count, 1);
        assert_eq!(room.remaining_chairs.len(), 12);
        assert_eq!(room.round.unwrap().result.status, Some(ResultStatus::Shocked));
    }

    #[test]
    fn test_resolve_leaves_defender_untouched() {
        let room = resolve(&armed(4, 4), &rules()).unwrap();
        assert_eq!(room.player(pid(2)), Some(&Player::new(pid(2), "bob")));
    }

    #[test]
    fn test_resolve_keeps_existing_confirmations() {
        let mut room = armed(5, 9);
        if let Some(round) = room.round.as_mut() {
            round.result.confirmed_ids = vec![pid(2)];
        }
        let room = resolve(&room, &rules()).unwrap();
        assert_eq!(room.round.unwrap().result.confirmed_ids, vec![pid(2)]);
    }

    #[test]
    fn test_resolve_score_victory() {
        // Scenario: 38 points, safe on chair 2 → 40 → wins.
        let mut room = armed(5, 2);
        room.players[0].point = 38;

        let room = resolve(&room, &rules()).unwrap();

        assert_eq!(room.player(pid(1)).unwrap().point, 40);
        assert_eq!(room.winner, Some(Winner::Player(pid(1))));
    }

    #[test]
    fn test_resolve_third_shock_eliminates_attacker() {
        // Scenario: two shocks already, shocked on chair 3 → opponent wins.
        let mut room = armed(3, 3);
        room.players[0].shocked_count = 2;

        let room = resolve(&room, &rules()).unwrap();

        assert_eq!(room.player(pid(1)).unwrap().shocked_count, 3);
        assert_eq!(room.winner, Some(Winner::Player(pid(2))));
    }

    #[test]
    fn test_resolve_last_chair_tie_is_draw() {
        // Scenario: only chair 4 left, safe on it, 20 apiece → draw.
        let mut room = armed(7, 4);
        room.remaining_chairs = [4].into_iter().collect();
        room.players[0].point = 16;
        room.players[1].point = 20;

        let room = resolve(&room, &rules()).unwrap();

        assert!(room.remaining_chairs.is_empty());
        assert_eq!(room.player(pid(1)).unwrap().point, 20);
        assert_eq!(room.winner, Some(Winner::Draw));
    }

    #[test]
    fn test_resolve_one_chair_left_higher_score_wins() {
        let mut room = armed(7, 4);
        room.remaining_chairs = [4, 7].into_iter().collect();
        room.players[0].point = 10;
        room.players[1].point = 30;

        let room = resolve(&room, &rules()).unwrap();

        assert_eq!(room.remaining_chairs.len(), 1);
        assert_eq!(room.winner, Some(Winner::Player(pid(2))));
    }

    #[test]
    fn test_resolve_score_beats_elimination() {
        // Both conditions hold: the score rule is checked first.
        let mut room = armed(5, 9);
        room.players[0].point = 35;
        room.players[1].shocked_count = 3;

        let room = resolve(&room, &rules()).unwrap();

        assert_eq!(room.winner, Some(Winner::Player(pid(1))));
    }

    #[test]
    fn test_resolve_without_seat_is_invalid_state() {
        let mut room = armed(5, 9);
        if let Some(round) = room.round.as_mut() {
            round.seated_chair = None;
        }
        assert!(matches!(resolve(&room, &rules()), Err(RulesError::InvalidState(_))));
    }

    #[test]
    fn test_resolve_in_select_phase_is_invalid_state() {
        let mut room = armed(5, 9);
        if let Some(round) = room.round.as_mut() {
            round.phase = Phase::Select;
        }
        assert!(matches!(resolve(&room, &rules()), Err(RulesError::InvalidState(_))));
    }

    #[test]
    fn test_resolve_twice_is_rejected() {
        let once = resolve(&armed(5, 9), &rules()).unwrap();
        assert!(matches!(resolve(&once, &rules()), Err(RulesError::InvalidState(_))));
    }

    #[test]
    fn test_resolve_after_game_over_is_invalid_state() {
        let mut room = armed(5, 9);
        room.winner = Some(Winner::Draw);
        assert!(matches!(resolve(&room, &rules()), Err(RulesError::InvalidState(_))));
    }

    #[test]
    fn test_determine_winner_ongoing_game_is_none() {
        let players = vec![Player::new(pid(1), "a"), Player::new(pid(2), "b")];
        let chairs: BTreeSet<u32> = (1..=5).collect();
        assert_eq!(determine_winner(&players, &chairs, &rules()), None);
    }
}
