//! Battle commands: the single mutation vocabulary for battle state.
//! Calculators produce command lists; only [`execute_commands`] applies them.

use crate::battle::events::{BattleEvent, EventBus};
use crate::battle::state::{BattlePhase, BattleState, OPPONENT_SIDE, PLAYER_SIDE};
use crate::errors::{DataError, DataResult};
use crate::status::{MajorStatus, VolatileStatus};
use schema::{ItemId, StatType, VolatileKind};
use serde::{Deserialize, Serialize};

/// Which side a command or event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideTarget {
    Player,
    Opponent,
}

impl SideTarget {
    pub fn to_index(self) -> usize {
        match self {
            SideTarget::Player => PLAYER_SIDE,
            SideTarget::Opponent => OPPONENT_SIDE,
        }
    }

    pub fn from_index(index: usize) -> Self {
        if index == PLAYER_SIDE {
            SideTarget::Player
        } else {
            SideTarget::Opponent
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            SideTarget::Player => SideTarget::Opponent,
            SideTarget::Opponent => SideTarget::Player,
        }
    }
}

/// One atomic state mutation. Everything a turn does to the battle goes
/// through one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    /// Damage the active combatant. Emits `DamageDealt`, and `Fainted` when
    /// it drops HP to zero.
    DealDamage { target: SideTarget, amount: u16 },
    /// Heal the active combatant, emitting `Healed` with the restored amount.
    Heal { target: SideTarget, amount: u16 },
    /// Set or clear the active combatant's major status. No exclusivity
    /// check here; calculators decide whether the application is legal.
    SetStatus {
        target: SideTarget,
        status: Option<MajorStatus>,
    },
    ChangeStatStage {
        target: SideTarget,
        stat: StatType,
        delta: i8,
    },
    AddVolatile {
        target: SideTarget,
        status: VolatileStatus,
    },
    RemoveVolatile {
        target: SideTarget,
        kind: VolatileKind,
    },
    UsePp { target: SideTarget, slot: usize },
    /// Restore PP to every skill slot of the active combatant.
    RestorePp { target: SideTarget, amount: u8 },
    ConsumeItem { target: SideTarget, item: ItemId },
    /// Make a roster slot active, clearing battle-scoped side state.
    SwitchActive { target: SideTarget, slot: usize },
    /// Move the opponent's active combatant into the player's roster and
    /// assign the player as its owner.
    CaptureOpponent { new_owner: String },
    /// End-of-turn chip damage from the active combatant's major status.
    /// Escalates the toxic counter as a side effect.
    TickStatus { target: SideTarget },
    /// End-of-turn leech seed drain: damage the seeded side, heal the other.
    TickLeechSeed { target: SideTarget },
    /// Start-of-turn countdown for turn-limited volatiles, removing the
    /// expired ones.
    TickVolatileCounters { target: SideTarget },
    IncrementRunAttempts,
    IncrementTurn,
    SetPhase(BattlePhase),
    EmitEvent(BattleEvent),
}

/// Apply a command list in order. The only function in the crate that
/// mutates `BattleState` during a turn.
pub fn execute_commands(
    commands: Vec<BattleCommand>,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> DataResult<()> {
    for command in commands {
        execute_one(command, state, bus)?;
    }
    Ok(())
}

fn execute_one(
    command: BattleCommand,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> DataResult<()> {
    match command {
        BattleCommand::DealDamage { target, amount } => {
            let index = target.to_index();
            let creature = state
                .side_mut(index)
                .active_mut()
                .ok_or(DataError::NoActiveCombatant { side: index })?;
            let fainted = creature.take_damage(amount);
            let name = creature.name.clone();
            let remaining_hp = creature.current_hp;
            bus.push(BattleEvent::DamageDealt {
                side: target,
                name: name.clone(),
                amount,
                remaining_hp,
            });
            if fainted {
                bus.push(BattleEvent::Fainted { side: target, name });
            }
        }
        BattleCommand::Heal { target, amount } => {
            let index = target.to_index();
            let creature = state
                .side_mut(index)
                .active_mut()
                .ok_or(DataError::NoActiveCombatant { side: index })?;
            let restored = creature.heal(amount);
            if restored > 0 {
                bus.push(BattleEvent::Healed {
                    side: target,
                    name: creature.name.clone(),
                    amount: restored,
                });
            }
        }
        BattleCommand::SetStatus { target, status } => {
            let index = target.to_index();
            let creature = state
                .side_mut(index)
                .active_mut()
                .ok_or(DataError::NoActiveCombatant { side: index })?;
            let name = creature.name.clone();
            match (creature.status, status) {
                (_, Some(applied)) => {
                    creature.status = Some(applied);
                    bus.push(BattleEvent::StatusApplied {
                        side: target,
                        name,
                        status: applied.kind(),
                    });
                }
                (Some(removed), None) => {
                    creature.status = None;
                    bus.push(BattleEvent::StatusRemoved {
                        side: target,
                        name,
                        status: removed.kind(),
                    });
                }
                (None, None) => {}
            }
        }
        BattleCommand::ChangeStatStage { target, stat, delta } => {
            let index = target.to_index();
            let name = state
                .side(index)
                .active()
                .ok_or(DataError::NoActiveCombatant { side: index })?
                .name
                .clone();
            let applied = state.side_mut(index).change_stat_stage(stat, delta);
            if applied == 0 {
                bus.push(BattleEvent::StatChangeBlocked {
                    side: target,
                    name,
                    stat,
                    rising: delta > 0,
                });
            } else {
                bus.push(BattleEvent::StatStageChanged {
                    side: target,
                    name,
                    stat,
                    delta: applied,
                });
            }
        }
        BattleCommand::AddVolatile { target, status } => {
            let index = target.to_index();
            let name = state
                .side(index)
                .active()
                .ok_or(DataError::NoActiveCombatant { side: index })?
                .name
                .clone();
            if state.side_mut(index).add_volatile(status) {
                bus.push(BattleEvent::VolatileApplied {
                    side: target,
                    name,
                    volatile: status.kind(),
                });
            }
        }
        BattleCommand::RemoveVolatile { target, kind } => {
            let index = target.to_index();
            let name = state
                .side(index)
                .active()
                .map(|c| c.name.clone())
                .unwrap_or_default();
            if state.side_mut(index).remove_volatile(kind) {
                bus.push(BattleEvent::VolatileRemoved {
                    side: target,
                    name,
                    volatile: kind,
                });
            }
        }
        BattleCommand::UsePp { target, slot } => {
            let index = target.to_index();
            let creature = state
                .side_mut(index)
                .active_mut()
                .ok_or(DataError::NoActiveCombatant { side: index })?;
            if let Some(skill) = creature.skills.get_mut(slot).and_then(Option::as_mut) {
                skill.use_pp();
            }
        }
        BattleCommand::RestorePp { target, amount } => {
            let index = target.to_index();
            let creature = state
                .side_mut(index)
                .active_mut()
                .ok_or(DataError::NoActiveCombatant { side: index })?;
            for skill in creature.skills.iter_mut().flatten() {
                skill.restore_pp(amount);
            }
        }
        BattleCommand::ConsumeItem { target, item } => {
            state.side_mut(target.to_index()).consume_item(item);
        }
        BattleCommand::SwitchActive { target, slot } => {
            let index = target.to_index();
            let side = state.side_mut(index);
            side.clear_battle_state();
            side.active_index = slot;
            if let Some(creature) = side.active() {
                bus.push(BattleEvent::Switched {
                    side: target,
                    name: creature.name.clone(),
                });
            }
        }
        BattleCommand::CaptureOpponent { new_owner } => {
            let slot = state.side(OPPONENT_SIDE).active_index;
            if let Some(mut creature) = state.side_mut(OPPONENT_SIDE).roster[slot].take() {
                creature.owner = Some(new_owner);
                if let Some(empty) = state.side(PLAYER_SIDE).first_empty_slot() {
                    state.side_mut(PLAYER_SIDE).roster[empty] = Some(creature);
                }
            }
        }
        BattleCommand::TickStatus { target } => {
            let index = target.to_index();
            let Some(creature) = state.side_mut(index).active_mut() else {
                return Ok(());
            };
            let Some(status) = creature.status else {
                return Ok(());
            };
            let (damage, after) = status.end_of_turn_damage(creature.max_hp());
            creature.status = Some(after);
            if damage > 0 {
                let fainted = creature.take_damage(damage);
                let name = creature.name.clone();
                bus.push(BattleEvent::StatusDamage {
                    side: target,
                    name: name.clone(),
                    status: status.kind(),
                    amount: damage,
                });
                if fainted {
                    bus.push(BattleEvent::Fainted { side: target, name });
                }
            }
        }
        BattleCommand::TickLeechSeed { target } => {
            let index = target.to_index();
            if !state.side(index).has_volatile(VolatileKind::LeechSeed) {
                return Ok(());
            }
            let Some(seeded) = state.side_mut(index).active_mut() else {
                return Ok(());
            };
            let drain = (seeded.max_hp() / 8).max(1).min(seeded.current_hp);
            if drain == 0 {
                return Ok(());
            }
            let fainted = seeded.take_damage(drain);
            let name = seeded.name.clone();
            bus.push(BattleEvent::LeechSeedDrain {
                side: target,
                name: name.clone(),
                amount: drain,
            });
            if fainted {
                bus.push(BattleEvent::Fainted { side: target, name });
            }
            let other = target.opponent();
            if let Some(drinker) = state.side_mut(other.to_index()).active_mut() {
                let restored = drinker.heal(drain);
                if restored > 0 {
                    bus.push(BattleEvent::Healed {
                        side: other,
                        name: drinker.name.clone(),
                        amount: restored,
                    });
                }
            }
        }
        BattleCommand::TickVolatileCounters { target } => {
            let index = target.to_index();
            let name = state
                .side(index)
                .active()
                .map(|c| c.name.clone())
                .unwrap_or_default();
            let side = state.side_mut(index);
            let mut expired = Vec::new();
            let mut ticked = Vec::new();
            for (&kind, status) in side.volatiles.iter() {
                match status.tick() {
                    Some(next) => ticked.push((kind, next)),
                    None => expired.push(kind),
                }
            }
            for (kind, next) in ticked {
                side.volatiles.insert(kind, next);
            }
            for kind in expired {
                side.volatiles.remove(&kind);
                bus.push(BattleEvent::VolatileRemoved {
                    side: target,
                    name: name.clone(),
                    volatile: kind,
                });
            }
        }
        BattleCommand::IncrementRunAttempts => {
            state.run_attempts = state.run_attempts.saturating_add(1);
        }
        BattleCommand::IncrementTurn => {
            state.turn_number += 1;
        }
        BattleCommand::SetPhase(phase) => {
            state.phase = phase;
            if let BattlePhase::Finished(outcome) = phase {
                for side in state.sides.iter_mut() {
                    side.clear_battle_state();
                }
                bus.push(BattleEvent::BattleEnded { outcome });
            }
        }
        BattleCommand::EmitEvent(event) => bus.push(event),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::{BattleKind, BattleSide, Outcome};
    use crate::creature::CreatureInst;
    use crate::metadata::MetadataStore;
    use pretty_assertions::assert_eq;
    use schema::{BaseStats, GrowthCurve, Nature, SpeciesData, SpeciesId};
    use std::collections::BTreeMap;

    fn sample_creature() -> CreatureInst {
        let species = SpeciesData {
            id: SpeciesId(1),
            name: "Testling".to_string(),
            types: vec![schema::ElementType::Normal],
            base_stats: BaseStats {
                hp: 50,
                attack: 50,
                defense: 50,
                sp_attack: 50,
                sp_defense: 50,
                speed: 50,
            },
            growth_curve: GrowthCurve::MediumFast,
            catch_rate: 45,
            base_exp_yield: 60,
            ev_yield: [0; 6],
            learnset: BTreeMap::new(),
            evolutions: Vec::new(),
        };
        // Empty learnset, so no skill templates are needed.
        CreatureInst::new(1, &species, 10, [0; 6], Nature::Hardy, &MetadataStore::new()).unwrap()
    }

    fn sample_state() -> BattleState {
        let player = BattleSide::new(Some("p1".to_string()), "Red")
            .with_roster(vec![sample_creature()]);
        let opponent = BattleSide::new(None, "Wild").with_roster(vec![sample_creature()]);
        BattleState::new("battle-1", BattleKind::Wild, player, opponent)
    }

    #[test]
    fn deal_damage_emits_damage_and_faint_events() {
        let mut state = sample_state();
        let mut bus = EventBus::new();
        let max_hp = state.side(1).active().unwrap().max_hp();
        execute_commands(
            vec![BattleCommand::DealDamage {
                target: SideTarget::Opponent,
                amount: max_hp,
            }],
            &mut state,
            &mut bus,
        )
        .unwrap();
        assert!(state.side(1).active().unwrap().is_fainted());
        assert!(matches!(bus.events()[0], BattleEvent::DamageDealt { .. }));
        assert!(matches!(bus.events()[1], BattleEvent::Fainted { .. }));
    }

    #[test]
    fn finishing_phase_clears_battle_state_and_logs_end() {
        let mut state = sample_state();
        let mut bus = EventBus::new();
        state.side_mut(0).change_stat_stage(StatType::Attack, 2);
        execute_commands(
            vec![BattleCommand::SetPhase(BattlePhase::Finished(Outcome::Win))],
            &mut state,
            &mut bus,
        )
        .unwrap();
        assert_eq!(state.side(0).stat_stage(StatType::Attack), 0);
        assert!(state.is_finished());
        assert!(matches!(
            bus.events().last(),
            Some(BattleEvent::BattleEnded {
                outcome: Outcome::Win
            })
        ));
    }

    #[test]
    fn switch_clears_stages_before_activating_slot() {
        let mut state = sample_state();
        let mut bus = EventBus::new();
        state.side_mut(0).roster[1] = Some(sample_creature());
        state.side_mut(0).change_stat_stage(StatType::Speed, -2);
        execute_commands(
            vec![BattleCommand::SwitchActive {
                target: SideTarget::Player,
                slot: 1,
            }],
            &mut state,
            &mut bus,
        )
        .unwrap();
        assert_eq!(state.side(0).active_index, 1);
        assert_eq!(state.side(0).stat_stage(StatType::Speed), 0);
    }
}
