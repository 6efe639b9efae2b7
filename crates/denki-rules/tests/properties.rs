//! Property tests: random games played through the public rules API.
//!
//! Each case plays up to 60 rounds with chairs picked from whatever is still
//! in play, checking the game-wide invariants after every step.

use denki_protocol::{PlayerId, RoomId};
use denki_rules::{
    GameRoom, Phase, Player, RuleConfig, barrier, lobby, resolver, selection,
};
use proptest::prelude::*;
use proptest::sample::Index;

fn pid(id: u64) -> PlayerId {
    PlayerId(id)
}

fn started(rules: &RuleConfig) -> GameRoom {
    let room = GameRoom::new(RoomId(1));
    let room = lobby::join(&room, Player::new(pid(1), "alice")).unwrap();
    let room = lobby::join(&room, Player::new(pid(2), "bob")).unwrap();
    let room = lobby::set_ready(&room, pid(1), rules).unwrap();
    lobby::set_ready(&room, pid(2), rules).unwrap()
}

fn pick(room: &GameRoom, index: &Index) -> u32 {
    let chairs: Vec<u32> = room.remaining_chairs.iter().copied().collect();
    *index.get(&chairs)
}

/// Hides the electric chair and seats the attacker; stops before the switch.
fn arm(room: &GameRoom, electric: &Index, seat: &Index) -> GameRoom {
    let attacker = room.round.as_ref().unwrap().attacker_id;
    let defender = room.defender_id().unwrap();
    let room = selection::select_electric_chair(room, defender, pick(room, electric)).unwrap();
    selection::sit(&room, attacker, pick(&room, seat)).unwrap()
}

fn confirm_both(room: &GameRoom) -> GameRoom {
    let mut room = room.clone();
    for id in [pid(2), pid(1)] {
        if let Some(update) = barrier::confirm(&room, id).unwrap().into_update() {
            room.apply(update);
        }
    }
    room
}

proptest! {
    #[test]
    fn prop_resolution_invariants_hold_for_whole_game(
        picks in proptest::collection::vec((any::<Index>(), any::<Index>()), 1..60)
    ) {
        let rules = RuleConfig::default();
        let mut room = started(&rules);

        for (electric, seat) in &picks {
            if room.is_finished() {
                break;
            }
            let armed = arm(&room, electric, seat);
            let round = armed.round.clone().unwrap();
            let seated = round.seated_chair.unwrap();
            let before = armed.player(round.attacker_id).unwrap().clone();

            let defender = armed.defender_id().unwrap();
            let resolved = selection::pull_switch(&armed, defender, &rules).unwrap();
            let after = resolved.player(round.attacker_id).unwrap();

            // Exactly one of: points grew by the chair, or one more shock.
            let scored = after.point == before.point + seated
                && after.shocked_count == before.shocked_count;
            let shocked = after.shocked_count == before.shocked_count + 1
                && after.point == 0;
            prop_assert!(scored ^ shocked);

            // Chairs only shrink, one per safe round, and never run out
            // while the game continues.
            let removed = armed.remaining_chairs.len() - resolved.remaining_chairs.len();
            prop_assert_eq!(removed, usize::from(scored));
            if !resolved.is_finished() {
                prop_assert!(!resolved.remaining_chairs.is_empty());
            }

            // The other player is never touched.
            prop_assert_eq!(armed.player(defender), resolved.player(defender));
            prop_assert_eq!(resolved.round.as_ref().unwrap().phase, Phase::Result);

            // Once set, the winner survives the barrier unchanged.
            let winner = resolved.winner;
            room = confirm_both(&resolved);
            prop_assert_eq!(room.winner, winner);
        }
    }

    #[test]
    fn prop_replay_after_json_round_trip_is_identical(
        picks in proptest::collection::vec((any::<Index>(), any::<Index>()), 1..20)
    ) {
        let rules = RuleConfig::default();
        let mut room = started(&rules);

        for (electric, seat) in &picks {
            if room.is_finished() {
                break;
            }
            let armed = arm(&room, electric, seat);
            let bytes = serde_json::to_vec(&armed).unwrap();
            let restored: GameRoom = serde_json::from_slice(&bytes).unwrap();
            prop_assert_eq!(&restored, &armed);

            let defender = armed.defender_id().unwrap();
            let direct = resolver::resolve(&armed, &rules).unwrap();
            let replayed = resolver::resolve(&restored, &rules).unwrap();
            prop_assert_eq!(&direct, &replayed);
            prop_assert_eq!(
                serde_json::to_vec(&direct).unwrap(),
                serde_json::to_vec(&replayed).unwrap()
            );

            let direct = confirm_both(&direct);
            let replayed = confirm_both(&replayed);
            prop_assert_eq!(&direct, &replayed);
            prop_assert!(direct.is_member(defender));
            room = direct;
        }
    }

    #[test]
    fn prop_third_confirmation_is_a_no_op(extra in 0u64..4) {
        // Finish the game on the spot, then confirm past saturation.
        let rules = RuleConfig::default();
        let mut room = started(&rules);
        room.players[0].point = 39;
        let armed = {
            let defender = room.defender_id().unwrap();
            let room = selection::select_electric_chair(&room, defender, 12).unwrap();
            selection::sit(&room, pid(1), 1).unwrap()
        };
        let done = selection::pull_switch(&armed, pid(2), &rules).unwrap();
        prop_assert!(done.is_finished());

        let saturated = confirm_both(&done);
        let confirmer = pid(1 + extra % 2);
        let outcome = barrier::confirm(&saturated, confirmer).unwrap();
        prop_assert!(outcome.into_update().is_none());
    }
}
