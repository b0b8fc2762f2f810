//! Switching: validation, ordering ahead of skills, and forced
//! replacements after a knockout.

use crate::battle::engine::{resolve_turn, PlayerAction};
use crate::battle::events::BattleEvent;
use crate::battle::state::TurnRng;
use crate::battle::tests::common::*;
use crate::errors::ActionError;
use pretty_assertions::assert_eq;
use schema::StatType;

#[test]
fn switch_resolves_before_the_opponent_skill() {
    let meta = test_metadata();
    let mut state = wild_battle_state(&meta);
    let mut reserve = creature_with_skills(&meta, MOLTENOX, 2, 10, &[TACKLE]);
    reserve.owner = Some("p1".to_string());
    state.side_mut(0).roster[1] = Some(reserve);

    let mut rng = TurnRng::new_for_test(vec![100, 100, 100]);
    let report = resolve_turn(&mut state, &meta, PlayerAction::Switch { slot: 1 }, &mut rng)
        .unwrap();

    let events = report.events.events();
    let switch_pos = events
        .iter()
        .position(|e| matches!(e, BattleEvent::Switched { .. }))
        .unwrap();
    let attack_pos = events
        .iter()
        .position(|e| matches!(e, BattleEvent::SkillUsed { .. }))
        .unwrap();
    assert!(switch_pos < attack_pos);
    assert_eq!(state.side(0).active_index, 1);
    // The incoming combatant took the hit.
    assert!(state.side(0).active().unwrap().current_hp < state.side(0).active().unwrap().max_hp());
}

#[test]
fn switching_clears_the_outgoing_side_stages() {
    let meta = test_metadata();
    let mut state = wild_battle_state(&meta);
    let mut reserve = creature_with_skills(&meta, MOLTENOX, 2, 10, &[TACKLE]);
    reserve.owner = Some("p1".to_string());
    state.side_mut(0).roster[1] = Some(reserve);
    state.side_mut(0).change_stat_stage(StatType::Attack, 2);

    let mut rng = TurnRng::new_for_test(vec![100, 100, 100]);
    resolve_turn(&mut state, &meta, PlayerAction::Switch { slot: 1 }, &mut rng).unwrap();
    assert_eq!(state.side(0).stat_stage(StatType::Attack), 0);
}

#[test]
fn invalid_switches_are_rejected_without_side_effects() {
    let meta = test_metadata();
    let mut state = wild_battle_state(&meta);
    let mut fainted = creature_with_skills(&meta, MOLTENOX, 2, 10, &[TACKLE]);
    fainted.current_hp = 0;
    state.side_mut(0).roster[1] = Some(fainted);

    let cases = [
        (PlayerAction::Switch { slot: 0 }, ActionError::AlreadyActive { slot: 0 }),
        (
            PlayerAction::Switch { slot: 1 },
            ActionError::FaintedSwitchTarget { slot: 1 },
        ),
        (PlayerAction::Switch { slot: 3 }, ActionError::EmptyRosterSlot { slot: 3 }),
        (
            PlayerAction::Switch { slot: 9 },
            ActionError::InvalidRosterSlot { slot: 9 },
        ),
    ];
    for (action, expected) in cases {
        let mut rng = TurnRng::new_for_test(vec![]);
        let result = resolve_turn(&mut state, &meta, action, &mut rng);
        assert_eq!(result.unwrap_err(), expected);
        assert_eq!(state.turn_number, 0);
    }
}

#[test]
fn replacement_does_not_inherit_the_fainted_combatants_action() {
    let meta = test_metadata();
    let mut state = wild_battle_state(&meta);
    let mut reserve = creature_with_skills(&meta, MOLTENOX, 2, 10, &[TACKLE]);
    reserve.owner = Some("p1".to_string());
    state.side_mut(0).roster[1] = Some(reserve);
    {
        let active = state.side_mut(0).active_mut().unwrap();
        active.current_hp = 1;
        active.curr_stats[schema::Stat::Speed.index()] = 1;
    }

    // The wild side outspeeds and knocks out the player's pick before it
    // can move; Moltenox steps in but does not fire the fallen one's skill.
    let mut rng = TurnRng::new_for_test(vec![100, 100, 100]);
    let report = resolve_turn(&mut state, &meta, PlayerAction::UseSkill { slot: 0 }, &mut rng)
        .unwrap();

    assert!(report.outcome.is_none());
    assert_eq!(state.side(0).active_index, 1);
    assert!(!report.events.events().iter().any(|e| matches!(
        e,
        BattleEvent::SkillUsed { name, .. } if name == "Moltenox"
    )));
    let replacement = state.side(0).active().unwrap();
    assert_eq!(replacement.current_hp, replacement.max_hp());
    assert!(replacement.skills[0].map(|s| s.pp == s.max_pp).unwrap());
}

#[test]
fn trainer_opponent_sends_its_next_combatant() {
    let meta = test_metadata();
    let mut state = trainer_battle_state(&meta);
    state.side_mut(1).active_mut().unwrap().current_hp = 1;

    // Player knocks out the first rival combatant; the replacement steps in
    // and still takes its turn.
    let mut rng = TurnRng::new_for_test(vec![100, 100, 100, 100, 100, 100]);
    let report = resolve_turn(&mut state, &meta, PlayerAction::UseSkill { slot: 0 }, &mut rng)
        .unwrap();

    assert!(report.outcome.is_none());
    assert_eq!(state.side(1).active_index, 1);
    assert!(report
        .events
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::Switched { .. })));
    // Trainer knockouts pay boosted experience.
    assert!(report
        .events
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::ExpGained { .. })));
}
