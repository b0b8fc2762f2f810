//! The turn resolver. One call of [`resolve_turn`] takes a validated player
//! action, picks the opponent's response, orders the two, and drives the
//! whole turn through the command executor.

use crate::battle::calculators;
use crate::battle::catch;
use crate::battle::commands::{execute_commands, BattleCommand, SideTarget};
use crate::battle::events::{ActionFailureReason, BattleEvent, EventBus};
use crate::battle::state::{
    BattleKind, BattlePhase, BattleState, Outcome, TurnRng, OPPONENT_SIDE, PLAYER_SIDE,
};
use crate::errors::{ActionError, DataResult};
use crate::formulas;
use crate::metadata::MetadataProvider;
use crate::progression;
use crate::status::{
    MajorStatus, CONFUSION_SELF_HIT_PERCENT, FREEZE_THAW_PERCENT,
    PARALYSIS_IMMOBILIZE_PERCENT, SLEEP_RECOVERY_PERCENT,
};
use schema::{ItemEffect, ItemId, VolatileKind};
use serde::{Deserialize, Serialize};

/// What the player wants to do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    UseSkill { slot: usize },
    Switch { slot: usize },
    UseItem { item: ItemId },
    Run,
    Catch { ball: ItemId },
}

/// Everything a caller needs to know about a resolved turn.
#[derive(Debug)]
pub struct TurnReport {
    pub events: EventBus,
    /// Set when the turn finished the battle.
    pub outcome: Option<Outcome>,
}

/// An action slotted into the turn order. The player's comes validated;
/// the opponent's comes from [`choose_opponent_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnAction {
    /// None means the struggle fallback.
    Skill { slot: Option<usize> },
    Switch { slot: usize },
    Item { item: ItemId },
    Run,
    Catch { ball: ItemId },
}

/// Priority granted to every non-skill action, above any skill priority.
const NON_SKILL_PRIORITY: i16 = 100;

/// Resolve one full turn. Validation failures leave the state untouched and
/// are returned for the caller to correct; data failures force-end the
/// battle with [`Outcome::Error`] inside an `Ok` report.
pub fn resolve_turn<M: MetadataProvider>(
    state: &mut BattleState,
    meta: &M,
    action: PlayerAction,
    rng: &mut TurnRng,
) -> Result<TurnReport, ActionError> {
    validate_action(state, meta, &action)?;

    let mut bus = EventBus::new();
    if let Err(error) = run_turn(state, meta, action, rng, &mut bus) {
        tracing::error!(battle_id = %state.battle_id, %error, "battle data failure, force-ending");
        let _ = execute_commands(
            vec![BattleCommand::SetPhase(BattlePhase::Finished(Outcome::Error))],
            state,
            &mut bus,
        );
    }

    Ok(TurnReport {
        outcome: state.outcome(),
        events: bus,
    })
}

/// Check a player action against the current state without changing it.
pub fn validate_action<M: MetadataProvider>(
    state: &BattleState,
    meta: &M,
    action: &PlayerAction,
) -> Result<(), ActionError> {
    if state.is_finished() {
        return Err(ActionError::BattleFinished);
    }
    let player = state.side(PLAYER_SIDE);

    match *action {
        PlayerAction::UseSkill { slot } => {
            let Some(active) = player.active() else {
                return Err(ActionError::EmptyRosterSlot {
                    slot: player.active_index,
                });
            };
            // With every slot out of PP the skill choice is moot; the turn
            // falls back to struggle whatever the slot says.
            if !active.has_usable_skill() {
                return Ok(());
            }
            if slot >= active.skills.len() {
                return Err(ActionError::InvalidSkillSlot { slot });
            }
            match &active.skills[slot] {
                None => Err(ActionError::EmptySkillSlot { slot }),
                Some(instance) if !instance.has_pp() => {
                    Err(ActionError::NoPpRemaining { slot })
                }
                Some(_) => Ok(()),
            }
        }
        PlayerAction::Switch { slot } => {
            if slot >= player.roster.len() {
                return Err(ActionError::InvalidRosterSlot { slot });
            }
            if slot == player.active_index {
                return Err(ActionError::AlreadyActive { slot });
            }
            match &player.roster[slot] {
                None => Err(ActionError::EmptyRosterSlot { slot }),
                Some(creature) if creature.is_fainted() => {
                    Err(ActionError::FaintedSwitchTarget { slot })
                }
                Some(_) => Ok(()),
            }
        }
        PlayerAction::UseItem { item } => {
            if player.item_count(item) == 0 {
                return Err(ActionError::ItemNotOwned { item });
            }
            let data = meta
                .item(item)
                .map_err(|_| ActionError::ItemNotApplicable { item })?;
            let active = player
                .active()
                .ok_or(ActionError::ItemNotApplicable { item })?;
            match &data.effect {
                ItemEffect::Ball { .. } | ItemEffect::Evolution => {
                    Err(ActionError::ItemNotApplicable { item })
                }
                ItemEffect::HealHp { .. } => {
                    if active.is_fainted() || active.current_hp == active.max_hp() {
                        Err(ActionError::ItemNotApplicable { item })
                    } else {
                        Ok(())
                    }
                }
                ItemEffect::CureStatus { status } => match (status, active.status) {
                    (Some(wanted), Some(current)) if current.kind() == *wanted => Ok(()),
                    (None, Some(_)) => Ok(()),
                    _ => Err(ActionError::ItemNotApplicable { item }),
                },
                ItemEffect::RestorePp { .. } | ItemEffect::StatBoost { .. } => Ok(()),
            }
        }
        PlayerAction::Run => {
            if state.kind == BattleKind::Trainer {
                Err(ActionError::RunInTrainerBattle)
            } else {
                Ok(())
            }
        }
        PlayerAction::Catch { ball } => catch::validate_catch_attempt(state, meta, ball),
    }
}

fn run_turn<M: MetadataProvider>(
    state: &mut BattleState,
    meta: &M,
    action: PlayerAction,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> DataResult<()> {
    execute_commands(vec![BattleCommand::IncrementTurn], state, bus)?;
    bus.push(BattleEvent::TurnStarted {
        turn_number: state.turn_number,
    });

    // Turn-start tick: count down turn-limited volatiles.
    execute_commands(
        vec![
            BattleCommand::TickVolatileCounters {
                target: SideTarget::Player,
            },
            BattleCommand::TickVolatileCounters {
                target: SideTarget::Opponent,
            },
        ],
        state,
        bus,
    )?;

    let player_action = to_turn_action(action);
    let opponent_action = choose_opponent_action(state, rng);

    let player_selected_index = state.side(PLAYER_SIDE).active_index;
    for (side, turn_action) in order_actions(state, meta, player_action, opponent_action)? {
        if state.is_finished() {
            break;
        }
        // The chosen skill belonged to a combatant that has since gone
        // down; the auto-sent replacement waits for its own orders.
        if side == SideTarget::Player
            && matches!(turn_action, TurnAction::Skill { .. })
            && state.side(PLAYER_SIDE).active_index != player_selected_index
        {
            continue;
        }
        perform_action(state, meta, side, turn_action, rng, bus)?;
        settle_hp_changes(state, meta, bus)?;
    }

    if !state.is_finished() {
        end_of_turn(state, meta, bus)?;
    }
    bus.push(BattleEvent::TurnEnded);
    Ok(())
}

fn to_turn_action(action: PlayerAction) -> TurnAction {
    match action {
        PlayerAction::UseSkill { slot } => TurnAction::Skill { slot: Some(slot) },
        PlayerAction::Switch { slot } => TurnAction::Switch { slot },
        PlayerAction::UseItem { item } => TurnAction::Item { item },
        PlayerAction::Run => TurnAction::Run,
        PlayerAction::Catch { ball } => TurnAction::Catch { ball },
    }
}

/// Opponent AI: a uniformly random skill with PP remaining, struggle when
/// there is none. Trainers never run, catch or use items.
fn choose_opponent_action(state: &BattleState, rng: &mut TurnRng) -> TurnAction {
    let Some(active) = state.side(OPPONENT_SIDE).active() else {
        return TurnAction::Skill { slot: None };
    };
    let usable: Vec<usize> = active
        .skills
        .iter()
        .enumerate()
        .filter_map(|(slot, skill)| {
            skill.as_ref().filter(|s| s.has_pp()).map(|_| slot)
        })
        .collect();
    match usable.len() {
        0 => TurnAction::Skill { slot: None },
        1 => TurnAction::Skill {
            slot: Some(usable[0]),
        },
        count => {
            let roll = rng.next_percent("opponent skill choice") as usize;
            TurnAction::Skill {
                slot: Some(usable[(roll - 1) % count]),
            }
        }
    }
}

/// Order the two actions: action-kind priority first (non-skill actions
/// beat skills), then skill priority, then effective speed. The player
/// acts first on a full tie.
fn order_actions<M: MetadataProvider>(
    state: &BattleState,
    meta: &M,
    player_action: TurnAction,
    opponent_action: TurnAction,
) -> DataResult<[(SideTarget, TurnAction); 2]> {
    let player_key = ordering_key(state, meta, SideTarget::Player, player_action)?;
    let opponent_key = ordering_key(state, meta, SideTarget::Opponent, opponent_action)?;

    // Player-first tie-break keeps resolution deterministic.
    if opponent_key > player_key {
        Ok([
            (SideTarget::Opponent, opponent_action),
            (SideTarget::Player, player_action),
        ])
    } else {
        Ok([
            (SideTarget::Player, player_action),
            (SideTarget::Opponent, opponent_action),
        ])
    }
}

fn ordering_key<M: MetadataProvider>(
    state: &BattleState,
    meta: &M,
    side: SideTarget,
    action: TurnAction,
) -> DataResult<(i16, u16)> {
    let priority = match action {
        TurnAction::Skill { slot: Some(slot) } => {
            let skill_id = state
                .side(side.to_index())
                .active()
                .and_then(|c| c.skills.get(slot).copied().flatten())
                .map(|s| s.skill);
            match skill_id {
                Some(id) => meta.skill(id)?.priority as i16,
                None => 0,
            }
        }
        TurnAction::Skill { slot: None } => 0,
        _ => NON_SKILL_PRIORITY,
    };
    Ok((priority, calculators::effective_speed(state, side)))
}

fn perform_action<M: MetadataProvider>(
    state: &mut BattleState,
    meta: &M,
    side: SideTarget,
    action: TurnAction,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> DataResult<()> {
    let actor_ready = state
        .side(side.to_index())
        .active()
        .map(|c| !c.is_fainted())
        .unwrap_or(false);
    if !actor_ready {
        return Ok(());
    }

    let commands = match action {
        TurnAction::Skill { slot } => {
            if !clear_to_act(state, side, rng, bus)? {
                return Ok(());
            }
            // The slot may have gone dry since validation (encore, ganged
            // PP drain); struggle covers it.
            let slot = slot.filter(|&s| {
                state
                    .side(side.to_index())
                    .active()
                    .and_then(|c| c.skills.get(s).copied().flatten())
                    .map(|s| s.has_pp())
                    .unwrap_or(false)
            });
            calculators::calculate_skill_commands(state, meta, side, slot, rng)?
        }
        TurnAction::Switch { slot } => calculators::calculate_switch_commands(side, slot),
        TurnAction::Item { item } => {
            let data = meta.item(item)?.clone();
            let Some(user) = state.side(side.to_index()).active() else {
                return Ok(());
            };
            calculators::calculate_item_commands(side, &data, user)
        }
        TurnAction::Run => calculators::calculate_run_commands(state, rng),
        TurnAction::Catch { ball } => {
            catch::calculate_catch_commands(state, meta, ball, rng)?
        }
    };
    execute_commands(commands, state, bus)
}

/// Pre-action gauntlet: major status, flinch, then confusion. Returns
/// whether the combatant still gets to act.
fn clear_to_act(
    state: &mut BattleState,
    side: SideTarget,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> DataResult<bool> {
    let index = side.to_index();
    let Some(active) = state.side(index).active() else {
        return Ok(false);
    };
    let name = active.name.clone();
    let status = active.status;
    let max_hp = active.max_hp();

    match status {
        Some(MajorStatus::Sleep) => {
            if rng.next_percent("sleep recovery check") <= SLEEP_RECOVERY_PERCENT {
                execute_commands(
                    vec![BattleCommand::SetStatus {
                        target: side,
                        status: None,
                    }],
                    state,
                    bus,
                )?;
            } else {
                bus.push(BattleEvent::ActionFailed {
                    side,
                    name,
                    reason: ActionFailureReason::IsAsleep,
                });
                return Ok(false);
            }
        }
        Some(MajorStatus::Freeze) => {
            if rng.next_percent("freeze thaw check") <= FREEZE_THAW_PERCENT {
                execute_commands(
                    vec![BattleCommand::SetStatus {
                        target: side,
                        status: None,
                    }],
                    state,
                    bus,
                )?;
            } else {
                bus.push(BattleEvent::ActionFailed {
                    side,
                    name,
                    reason: ActionFailureReason::IsFrozen,
                });
                return Ok(false);
            }
        }
        Some(MajorStatus::Paralysis) => {
            if rng.next_percent("paralysis immobilize check") <= PARALYSIS_IMMOBILIZE_PERCENT {
                bus.push(BattleEvent::ActionFailed {
                    side,
                    name,
                    reason: ActionFailureReason::IsParalyzed,
                });
                return Ok(false);
            }
        }
        _ => {}
    }

    if state.side(index).has_volatile(VolatileKind::Flinch) {
        execute_commands(
            vec![BattleCommand::RemoveVolatile {
                target: side,
                kind: VolatileKind::Flinch,
            }],
            state,
            bus,
        )?;
        bus.push(BattleEvent::ActionFailed {
            side,
            name: state
                .side(index)
                .active()
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            reason: ActionFailureReason::IsFlinching,
        });
        return Ok(false);
    }

    if state.side(index).has_volatile(VolatileKind::Confusion)
        && rng.next_percent("confusion self-hit check") <= CONFUSION_SELF_HIT_PERCENT
    {
        let self_damage = (max_hp / 8).max(1);
        let name = state
            .side(index)
            .active()
            .map(|c| c.name.clone())
            .unwrap_or_default();
        execute_commands(
            vec![
                BattleCommand::EmitEvent(BattleEvent::ActionFailed {
                    side,
                    name: name.clone(),
                    reason: ActionFailureReason::IsConfused,
                }),
                BattleCommand::EmitEvent(BattleEvent::ConfusionSelfHit {
                    side,
                    name,
                    amount: self_damage,
                }),
                BattleCommand::DealDamage {
                    target: side,
                    amount: self_damage,
                },
            ],
            state,
            bus,
        )?;
        return Ok(false);
    }

    Ok(true)
}

/// After any HP movement: award experience for a freshly fainted opponent,
/// auto-send replacements, and end the battle when a side is out.
fn settle_hp_changes<M: MetadataProvider>(
    state: &mut BattleState,
    meta: &M,
    bus: &mut EventBus,
) -> DataResult<()> {
    if state.is_finished() {
        return Ok(());
    }

    // Spoils come before the phase change so a battle-winning knockout
    // still pays out.
    let opponent_down = state
        .side(OPPONENT_SIDE)
        .active()
        .map(|c| c.is_fainted())
        .unwrap_or(false);
    if opponent_down {
        award_defeat_spoils(state, meta, bus)?;
    }

    if let Some(outcome) = termination_outcome(state) {
        execute_commands(
            vec![BattleCommand::SetPhase(BattlePhase::Finished(outcome))],
            state,
            bus,
        )?;
        return Ok(());
    }

    // Opponent's active fainted but the battle goes on: send the next
    // combatant.
    if opponent_down {
        if let Some(slot) = state.side(OPPONENT_SIDE).first_healthy_reserve() {
            execute_commands(
                vec![BattleCommand::SwitchActive {
                    target: SideTarget::Opponent,
                    slot,
                }],
                state,
                bus,
            )?;
        }
    }

    // Same replacement rule for the player's side.
    let player_down = state
        .side(PLAYER_SIDE)
        .active()
        .map(|c| c.is_fainted())
        .unwrap_or(false);
    if player_down {
        if let Some(slot) = state.side(PLAYER_SIDE).first_healthy_reserve() {
            execute_commands(
                vec![BattleCommand::SwitchActive {
                    target: SideTarget::Player,
                    slot,
                }],
                state,
                bus,
            )?;
        }
    }

    Ok(())
}

fn award_defeat_spoils<M: MetadataProvider>(
    state: &mut BattleState,
    meta: &M,
    bus: &mut EventBus,
) -> DataResult<()> {
    let Some(defeated) = state.side(OPPONENT_SIDE).active() else {
        return Ok(());
    };
    let defeated_species = meta.species(defeated.species)?;
    let exp = formulas::exp_gain(
        defeated_species.base_exp_yield,
        defeated.level,
        state.kind == BattleKind::Trainer,
    );
    let ev_yield = defeated_species.ev_yield;

    let Some(victor) = state.side_mut(PLAYER_SIDE).active_mut() else {
        return Ok(());
    };
    if victor.is_fainted() {
        return Ok(());
    }
    victor.award_evs(&ev_yield);
    progression::gain_experience(victor, meta, exp, bus)
}

fn termination_outcome(state: &BattleState) -> Option<Outcome> {
    let player_able = state.side(PLAYER_SIDE).has_able_creature();
    let opponent_able = state.side(OPPONENT_SIDE).has_able_creature();
    match (player_able, opponent_able) {
        // Simultaneous wipe is a draw, checked before either single win.
        (false, false) => Some(Outcome::Draw),
        (false, true) => Some(Outcome::Lose),
        (true, false) => Some(Outcome::Win),
        (true, true) => None,
    }
}

fn end_of_turn<M: MetadataProvider>(
    state: &mut BattleState,
    meta: &M,
    bus: &mut EventBus,
) -> DataResult<()> {
    for side in [SideTarget::Player, SideTarget::Opponent] {
        if state.is_finished() {
            return Ok(());
        }
        execute_commands(
            vec![
                BattleCommand::TickStatus { target: side },
                BattleCommand::TickLeechSeed { target: side },
            ],
            state,
            bus,
        )?;
        settle_hp_changes(state, meta, bus)?;
    }

    if !state.is_finished() {
        // Flinch never outlives the turn it was inflicted on.
        execute_commands(
            vec![
                BattleCommand::RemoveVolatile {
                    target: SideTarget::Player,
                    kind: VolatileKind::Flinch,
                },
                BattleCommand::RemoveVolatile {
                    target: SideTarget::Opponent,
                    kind: VolatileKind::Flinch,
                },
            ],
            state,
            bus,
        )?;
    }
    Ok(())
}
