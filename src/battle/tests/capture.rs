//! Capture attempts through full turns.

use crate::battle::engine::{resolve_turn, PlayerAction};
use crate::battle::events::BattleEvent;
use crate::battle::state::{Outcome, TurnRng};
use crate::battle::tests::common::*;
use crate::errors::ActionError;
use pretty_assertions::assert_eq;

#[test]
fn four_shakes_capture_and_end_the_battle() {
    let meta = test_metadata();
    let mut state = wild_battle_state(&meta);

    let mut rng = TurnRng::new_for_test(vec![0, 0, 0, 0]);
    let report = resolve_turn(
        &mut state,
        &meta,
        PlayerAction::Catch { ball: CAPTURE_ORB },
        &mut rng,
    )
    .unwrap();

    assert_eq!(report.outcome, Some(Outcome::Caught));
    assert!(report.events.events().iter().any(|e| matches!(
        e,
        BattleEvent::BallThrown {
            shakes: 4,
            caught: true,
            ..
        }
    )));
    // The wild combatant changed hands.
    let caught = state
        .side(0)
        .roster
        .iter()
        .flatten()
        .find(|c| c.name == "Sparkit")
        .unwrap();
    assert_eq!(caught.owner.as_deref(), Some("p1"));
    assert!(state.side(1).active().is_none());
    assert_eq!(state.side(0).item_count(CAPTURE_ORB), 4);
}

#[test]
fn failed_capture_lets_the_wild_side_retaliate() {
    let meta = test_metadata();
    let mut state = wild_battle_state(&meta);
    let player_hp = state.side(0).active().unwrap().current_hp;

    // First shake fails, the flee roll stays put, then the wild side
    // attacks normally.
    let mut rng = TurnRng::new_for_test(vec![65535, 100, 100, 100, 100]);
    let report = resolve_turn(
        &mut state,
        &meta,
        PlayerAction::Catch { ball: CAPTURE_ORB },
        &mut rng,
    )
    .unwrap();

    assert!(report.outcome.is_none());
    assert!(report.events.events().iter().any(|e| matches!(
        e,
        BattleEvent::BallThrown {
            shakes: 0,
            caught: false,
            ..
        }
    )));
    assert_eq!(state.side(0).item_count(CAPTURE_ORB), 4);
    assert!(state.side(0).active().unwrap().current_hp < player_hp);
}

#[test]
fn shaken_wild_combatant_can_flee() {
    let meta = test_metadata();
    let mut state = wild_battle_state(&meta);
    // Wounded wild targets are flightier.
    {
        let wild = state.side_mut(1).active_mut().unwrap();
        let max = wild.max_hp();
        wild.current_hp = max / 10;
    }

    let mut rng = TurnRng::new_for_test(vec![65535, 1]);
    let report = resolve_turn(
        &mut state,
        &meta,
        PlayerAction::Catch { ball: CAPTURE_ORB },
        &mut rng,
    )
    .unwrap();

    assert_eq!(report.outcome, Some(Outcome::Escape));
    assert!(report
        .events
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::WildFled { .. })));
}

#[test]
fn catching_in_a_trainer_battle_is_rejected() {
    let meta = test_metadata();
    let mut state = trainer_battle_state(&meta);
    let mut rng = TurnRng::new_for_test(vec![]);
    let result = resolve_turn(
        &mut state,
        &meta,
        PlayerAction::Catch { ball: CAPTURE_ORB },
        &mut rng,
    );
    assert_eq!(result.unwrap_err(), ActionError::CatchInTrainerBattle);
    assert_eq!(state.turn_number, 0);
}

#[test]
fn catching_with_a_full_roster_is_rejected() {
    let meta = test_metadata();
    let mut state = wild_battle_state(&meta);
    for slot in 1..6 {
        let mut filler = creature_with_skills(&meta, RIVERSNAP, 10 + slot as u32, 5, &[TACKLE]);
        filler.owner = Some("p1".to_string());
        state.side_mut(0).roster[slot] = Some(filler);
    }

    let mut rng = TurnRng::new_for_test(vec![]);
    let result = resolve_turn(
        &mut state,
        &meta,
        PlayerAction::Catch { ball: CAPTURE_ORB },
        &mut rng,
    );
    assert_eq!(result.unwrap_err(), ActionError::RosterFull);
}

#[test]
fn a_stronger_ball_raises_the_shake_threshold() {
    // Same wild target, same rolls: a throw that fails with the basic orb
    // can succeed with the stronger one.
    let meta = test_metadata();

    let mut basic = wild_battle_state(&meta);
    let mut rng = TurnRng::new_for_test(vec![47000, 100, 100, 100, 100]);
    let report = resolve_turn(
        &mut basic,
        &meta,
        PlayerAction::Catch { ball: CAPTURE_ORB },
        &mut rng,
    )
    .unwrap();
    assert!(report.outcome.is_none());

    let mut strong = wild_battle_state(&meta);
    let mut rng = TurnRng::new_for_test(vec![47000, 47000, 47000, 47000]);
    let report = resolve_turn(
        &mut strong,
        &meta,
        PlayerAction::Catch { ball: GREAT_ORB },
        &mut rng,
    )
    .unwrap();
    assert_eq!(report.outcome, Some(Outcome::Caught));
}
