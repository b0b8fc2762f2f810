//! Pure calculators. Each takes a state snapshot, metadata and the turn RNG
//! and returns the command list describing what should happen. Nothing in
//! this module mutates state.

use crate::battle::commands::{BattleCommand, SideTarget};
use crate::battle::events::{ActionFailureReason, BattleEvent};
use crate::battle::state::{BattlePhase, BattleState, Outcome, TurnRng};
use crate::creature::CreatureInst;
use crate::errors::DataResult;
use crate::formulas;
use crate::metadata::MetadataProvider;
use crate::status::{is_immune_to_status, MajorStatus, VolatileStatus};
use schema::{
    ElementType, ItemEffect, SkillCategory, SkillData, SkillEffect, SkillId, SkillTarget, Stat,
    StatType,
};

/// The fallback attack used when no skill slot has PP. Typeless physical
/// hit that never misses and recoils on the user.
pub fn struggle_skill() -> SkillData {
    SkillData {
        id: SkillId(0),
        name: "Struggle".to_string(),
        element: ElementType::Typeless,
        category: SkillCategory::Physical,
        power: Some(formulas::STRUGGLE_POWER),
        accuracy: None,
        pp: 1,
        priority: 0,
        crit_stage: 0,
        target: SkillTarget::Opponent,
        effects: Vec::new(),
    }
}

/// Effective speed of a side's active combatant: base speed through its
/// stage, quartered under paralysis.
pub fn effective_speed(state: &BattleState, side: SideTarget) -> u16 {
    let Some(creature) = state.side(side.to_index()).active() else {
        return 0;
    };
    let staged = formulas::apply_stat_stage(
        creature.stat(Stat::Speed),
        state.side(side.to_index()).stat_stage(StatType::Speed),
    );
    if matches!(creature.status, Some(MajorStatus::Paralysis)) {
        staged / 4
    } else {
        staged
    }
}

fn staged_stat(state: &BattleState, side: SideTarget, stat: Stat, stage_of: StatType) -> u16 {
    let Some(creature) = state.side(side.to_index()).active() else {
        return 0;
    };
    formulas::apply_stat_stage(
        creature.stat(stat),
        state.side(side.to_index()).stat_stage(stage_of),
    )
}

/// Resolve one use of a skill into commands. `slot` is None for the
/// struggle fallback. Assumes the action was already validated.
pub fn calculate_skill_commands<M: MetadataProvider>(
    state: &BattleState,
    meta: &M,
    attacker_side: SideTarget,
    slot: Option<usize>,
    rng: &mut TurnRng,
) -> DataResult<Vec<BattleCommand>> {
    let attacker_index = attacker_side.to_index();
    let defender_side = attacker_side.opponent();
    let mut commands = Vec::new();

    let Some(attacker) = state.side(attacker_index).active() else {
        return Ok(commands);
    };
    let attacker_name = attacker.name.clone();

    let skill = match slot {
        Some(slot_index) => {
            let instance = attacker.skills[slot_index]
                .as_ref()
                .map(|s| s.skill)
                .unwrap_or(SkillId(0));
            commands.push(BattleCommand::UsePp {
                target: attacker_side,
                slot: slot_index,
            });
            meta.skill(instance)?.clone()
        }
        None => struggle_skill(),
    };

    commands.push(BattleCommand::EmitEvent(BattleEvent::SkillUsed {
        side: attacker_side,
        name: attacker_name.clone(),
        skill: skill.id,
        skill_name: skill.name.clone(),
    }));

    let Some(defender) = state.side(defender_side.to_index()).active() else {
        commands.push(BattleCommand::EmitEvent(BattleEvent::ActionFailed {
            side: attacker_side,
            name: attacker_name,
            reason: ActionFailureReason::NoTargetPresent,
        }));
        return Ok(commands);
    };
    if defender.is_fainted() {
        commands.push(BattleCommand::EmitEvent(BattleEvent::ActionFailed {
            side: attacker_side,
            name: attacker_name,
            reason: ActionFailureReason::NoTargetPresent,
        }));
        return Ok(commands);
    }

    // Accuracy: net stage is attacker accuracy minus defender evasion.
    let net_stage = (state.side(attacker_index).stat_stage(StatType::Accuracy)
        - state
            .side(defender_side.to_index())
            .stat_stage(StatType::Evasion))
    .clamp(-6, 6);
    let accuracy_roll = rng.next_percent("accuracy check");
    if !formulas::check_accuracy(skill.accuracy, net_stage, accuracy_roll) {
        commands.push(BattleCommand::EmitEvent(BattleEvent::SkillMissed {
            side: attacker_side,
            name: attacker_name,
        }));
        return Ok(commands);
    }

    let mut damage_dealt: u16 = 0;
    if skill.is_damaging() {
        let attacker_species = meta.species(attacker.species)?;
        let defender_species = meta.species(defender.species)?;

        let effectiveness = formulas::type_effectiveness(
            meta.type_chart(),
            skill.element,
            &defender_species.types,
        );
        if effectiveness <= 0.0 {
            commands.push(BattleCommand::EmitEvent(BattleEvent::Effectiveness {
                multiplier: 0.0,
            }));
            return Ok(commands);
        }

        let critical =
            formulas::check_critical_hit(skill.crit_stage, 1.0, rng.next_percent("critical hit check"));
        if critical {
            commands.push(BattleCommand::EmitEvent(BattleEvent::CriticalHit));
        }

        let (attack_stat, attack_stage, defense_stat, defense_stage) =
            match skill.category {
                SkillCategory::Special => (
                    Stat::SpAttack,
                    StatType::SpAttack,
                    Stat::SpDefense,
                    StatType::SpDefense,
                ),
                _ => (Stat::Attack, StatType::Attack, Stat::Defense, StatType::Defense),
            };
        let attack = staged_stat(state, attacker_side, attack_stat, attack_stage);
        let defense = staged_stat(state, defender_side, defense_stat, defense_stage);

        let mods = formulas::DamageModifiers {
            random_factor: formulas::random_damage_factor(rng.next_percent("damage roll")),
            stab: attacker_species.has_type(skill.element),
            effectiveness,
            critical,
            field: formulas::field_modifier(
                state.field.weather,
                state.field.terrain,
                skill.element,
            ),
            burned_physical: matches!(attacker.status, Some(MajorStatus::Burn))
                && skill.category == SkillCategory::Physical,
            item: 1.0,
        };
        let damage = formulas::calculate_damage(
            attacker.level,
            skill.power.unwrap_or(0),
            attack,
            defense,
            &mods,
        );
        damage_dealt = damage.min(defender.current_hp);

        commands.push(BattleCommand::DealDamage {
            target: defender_side,
            amount: damage,
        });
        if effectiveness != 1.0 {
            commands.push(BattleCommand::EmitEvent(BattleEvent::Effectiveness {
                multiplier: effectiveness,
            }));
        }
    }

    // Struggle recoil comes out of the user regardless of secondary effects.
    if slot.is_none() && damage_dealt > 0 {
        let recoil = (damage_dealt / formulas::STRUGGLE_RECOIL_DIVISOR).max(1);
        commands.push(BattleCommand::EmitEvent(BattleEvent::StruggleRecoil {
            side: attacker_side,
            name: attacker_name.clone(),
            amount: recoil,
        }));
        commands.push(BattleCommand::DealDamage {
            target: attacker_side,
            amount: recoil,
        });
        return Ok(commands);
    }

    for effect in &skill.effects {
        commands.extend(calculate_effect_commands(
            state,
            meta,
            attacker_side,
            effect,
            damage_dealt,
            rng,
        )?);
    }

    Ok(commands)
}

fn calculate_effect_commands<M: MetadataProvider>(
    state: &BattleState,
    meta: &M,
    attacker_side: SideTarget,
    effect: &SkillEffect,
    damage_dealt: u16,
    rng: &mut TurnRng,
) -> DataResult<Vec<BattleCommand>> {
    let defender_side = attacker_side.opponent();
    let mut commands = Vec::new();

    match effect {
        SkillEffect::InflictStatus { status, chance } => {
            if rng.next_percent("status effect chance") > *chance {
                return Ok(commands);
            }
            let Some(defender) = state.side(defender_side.to_index()).active() else {
                return Ok(commands);
            };
            // Major statuses are mutually exclusive; a second application
            // and an elemental immunity are both silent no-ops.
            if defender.status.is_some() || defender.is_fainted() {
                return Ok(commands);
            }
            if is_immune_to_status(meta.species(defender.species)?, *status) {
                return Ok(commands);
            }
            commands.push(BattleCommand::SetStatus {
                target: defender_side,
                status: Some(MajorStatus::from_kind(*status)),
            });
        }
        SkillEffect::InflictVolatile {
            volatile,
            chance,
            turns,
        } => {
            if rng.next_percent("volatile effect chance") > *chance {
                return Ok(commands);
            }
            let defender = state.side(defender_side.to_index()).active();
            if defender.map(|d| d.is_fainted()).unwrap_or(true) {
                return Ok(commands);
            }
            commands.push(BattleCommand::AddVolatile {
                target: defender_side,
                status: VolatileStatus::from_kind(*volatile, *turns),
            });
        }
        SkillEffect::ChangeStatStage {
            target,
            stat,
            delta,
            chance,
        } => {
            if rng.next_percent("stat stage chance") > *chance {
                return Ok(commands);
            }
            let side = match target {
                SkillTarget::User => attacker_side,
                _ => defender_side,
            };
            if state.side(side.to_index()).active().is_some() {
                commands.push(BattleCommand::ChangeStatStage {
                    target: side,
                    stat: *stat,
                    delta: *delta,
                });
            }
        }
        SkillEffect::HealUser { percent_max_hp } => {
            if let Some(attacker) = state.side(attacker_side.to_index()).active() {
                let amount =
                    (attacker.max_hp() as u32 * *percent_max_hp as u32 / 100).max(1) as u16;
                commands.push(BattleCommand::Heal {
                    target: attacker_side,
                    amount,
                });
            }
        }
        SkillEffect::Recoil { percent_damage } => {
            if damage_dealt > 0 {
                let amount =
                    (damage_dealt as u32 * *percent_damage as u32 / 100).max(1) as u16;
                commands.push(BattleCommand::DealDamage {
                    target: attacker_side,
                    amount,
                });
            }
        }
    }

    Ok(commands)
}

/// Commands for a validated switch.
pub fn calculate_switch_commands(side: SideTarget, slot: usize) -> Vec<BattleCommand> {
    vec![BattleCommand::SwitchActive { target: side, slot }]
}

/// Commands for a validated item use. Ball items go through the capture
/// path instead and never reach this.
pub fn calculate_item_commands(
    side: SideTarget,
    item: &schema::ItemData,
    user: &CreatureInst,
) -> Vec<BattleCommand> {
    let mut commands = vec![
        BattleCommand::ConsumeItem {
            target: side,
            item: item.id,
        },
        BattleCommand::EmitEvent(BattleEvent::ItemUsed {
            side,
            item: item.id,
            item_name: item.name.clone(),
        }),
    ];
    match &item.effect {
        ItemEffect::HealHp { amount } => commands.push(BattleCommand::Heal {
            target: side,
            amount: *amount,
        }),
        ItemEffect::CureStatus { .. } => {
            if user.status.is_some() {
                commands.push(BattleCommand::SetStatus {
                    target: side,
                    status: None,
                });
            }
        }
        ItemEffect::RestorePp { amount } => commands.push(BattleCommand::RestorePp {
            target: side,
            amount: *amount,
        }),
        ItemEffect::StatBoost { stat, delta } => commands.push(BattleCommand::ChangeStatStage {
            target: side,
            stat: *stat,
            delta: *delta,
        }),
        ItemEffect::Ball { .. } | ItemEffect::Evolution => {}
    }
    commands
}

/// Commands for a validated run attempt in a wild battle.
pub fn calculate_run_commands(state: &BattleState, rng: &mut TurnRng) -> Vec<BattleCommand> {
    let player_speed = effective_speed(state, SideTarget::Player);
    let opponent_speed = effective_speed(state, SideTarget::Opponent);
    let probability =
        formulas::escape_probability(player_speed, opponent_speed, state.run_attempts);
    let roll = rng.next_percent("escape check");
    let escaped = (roll as f64) <= probability * 100.0;

    let mut commands = vec![BattleCommand::EmitEvent(BattleEvent::RunAttempted {
        escaped,
    })];
    if escaped {
        commands.push(BattleCommand::SetPhase(BattlePhase::Finished(
            Outcome::Escape,
        )));
    } else {
        commands.push(BattleCommand::IncrementRunAttempts);
    }
    commands
}
