//! Capture resolution: ball throws, the four-shake check, and what a wild
//! combatant does when the ball breaks open.

use crate::battle::commands::{BattleCommand, SideTarget};
use crate::battle::events::BattleEvent;
use crate::battle::state::{BattleKind, BattlePhase, BattleState, Outcome, TurnRng};
use crate::errors::{ActionError, DataError, DataResult};
use crate::formulas;
use crate::metadata::MetadataProvider;
use schema::ItemId;

pub const SHAKES_FOR_CAPTURE: u8 = 4;

/// Validate a ball throw before the turn commits. The state is untouched on
/// any error.
pub fn validate_catch_attempt<M: MetadataProvider>(
    state: &BattleState,
    meta: &M,
    ball: ItemId,
) -> Result<(), ActionError> {
    if state.kind == BattleKind::Trainer {
        return Err(ActionError::CatchInTrainerBattle);
    }
    if state.side(0).item_count(ball) == 0 {
        return Err(ActionError::ItemNotOwned { item: ball });
    }
    let item = meta
        .item(ball)
        .map_err(|_| ActionError::ItemNotOwned { item: ball })?;
    if !item.is_ball() {
        return Err(ActionError::NotABall { item: ball });
    }
    let target = state
        .side(1)
        .active()
        .ok_or(ActionError::CatchOwnedTarget)?;
    if !target.is_wild() {
        return Err(ActionError::CatchOwnedTarget);
    }
    if state.side(0).first_empty_slot().is_none() {
        return Err(ActionError::RosterFull);
    }
    Ok(())
}

/// Resolve a validated ball throw into commands: consume the ball, run the
/// four shake checks, and either capture or let the wild combatant decide
/// whether to flee.
pub fn calculate_catch_commands<M: MetadataProvider>(
    state: &BattleState,
    meta: &M,
    ball: ItemId,
    rng: &mut TurnRng,
) -> DataResult<Vec<BattleCommand>> {
    let item = meta.item(ball)?;
    let target = state
        .side(1)
        .active()
        .ok_or(DataError::NoActiveCombatant { side: 1 })?;
    let species = meta.species(target.species)?;

    let a = formulas::catch_value(
        target.max_hp(),
        target.current_hp,
        species.catch_rate,
        item.ball_modifier().unwrap_or(1.0) as f64,
        formulas::status_catch_multiplier(target.status.map(|s| s.kind())),
    );
    let threshold = formulas::shake_threshold(a);

    let mut shakes = 0u8;
    for _ in 0..SHAKES_FOR_CAPTURE {
        if rng.next_word("capture shake check") < threshold {
            shakes += 1;
        } else {
            break;
        }
    }
    let caught = shakes == SHAKES_FOR_CAPTURE;

    let mut commands = vec![
        BattleCommand::ConsumeItem {
            target: SideTarget::Player,
            item: ball,
        },
        BattleCommand::EmitEvent(BattleEvent::BallThrown {
            item_name: item.name.clone(),
            shakes,
            caught,
        }),
    ];

    if caught {
        let new_owner = state.side(0).player_id.clone().unwrap_or_default();
        commands.push(BattleCommand::CaptureOpponent { new_owner });
        commands.push(BattleCommand::SetPhase(BattlePhase::Finished(
            Outcome::Caught,
        )));
        return Ok(commands);
    }

    // A shaken wild combatant may bolt rather than keep fighting.
    let flee_chance =
        formulas::wild_flee_probability(target.level, target.current_hp, target.max_hp());
    let roll = rng.next_percent("wild flee check");
    if (roll as f64) <= flee_chance * 100.0 {
        commands.push(BattleCommand::EmitEvent(BattleEvent::WildFled {
            name: target.name.clone(),
        }));
        commands.push(BattleCommand::SetPhase(BattlePhase::Finished(
            Outcome::Escape,
        )));
    }

    Ok(commands)
}
