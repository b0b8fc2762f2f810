//! Experience gain and level-ups.

use crate::battle::events::{BattleEvent, EventBus};
use crate::creature::{CreatureInst, SkillInstance};
use crate::errors::{ActionError, DataResult};
use crate::formulas;
use crate::metadata::MetadataProvider;
use schema::SkillId;

pub const MAX_LEVEL: u8 = 100;

/// Add experience and process every level boundary it crosses, one level at
/// a time. Each level-up recalculates stats (preserving the HP deficit),
/// then works through that level's learnset: new skills fill empty slots,
/// and a full set raises a replacement request instead.
pub fn gain_experience<M: MetadataProvider>(
    creature: &mut CreatureInst,
    meta: &M,
    amount: u32,
    bus: &mut EventBus,
) -> DataResult<()> {
    if amount == 0 || creature.level >= MAX_LEVEL {
        return Ok(());
    }
    let species = meta.species(creature.species)?.clone();
    creature.exp = creature.exp.saturating_add(amount);
    bus.push(BattleEvent::ExpGained {
        name: creature.name.clone(),
        amount,
    });

    while creature.level < MAX_LEVEL
        && creature.exp >= formulas::exp_needed(creature.level + 1, species.growth_curve)
    {
        creature.level += 1;
        creature.recalc_stats_preserving_hp(&species);
        bus.push(BattleEvent::LeveledUp {
            name: creature.name.clone(),
            level: creature.level,
        });

        for &skill_id in species.learns_at_level(creature.level) {
            learn_skill(creature, meta, skill_id, bus)?;
        }
    }
    Ok(())
}

fn learn_skill<M: MetadataProvider>(
    creature: &mut CreatureInst,
    meta: &M,
    skill_id: SkillId,
    bus: &mut EventBus,
) -> DataResult<()> {
    if creature
        .skills
        .iter()
        .flatten()
        .any(|slot| slot.skill == skill_id)
    {
        return Ok(());
    }
    let skill = meta.skill(skill_id)?;
    match creature.skills.iter_mut().find(|slot| slot.is_none()) {
        Some(empty) => {
            *empty = Some(SkillInstance::new(skill_id, skill.pp));
            bus.push(BattleEvent::SkillLearned {
                name: creature.name.clone(),
                skill_name: skill.name.clone(),
            });
        }
        None => bus.push(BattleEvent::SkillReplacementRequested {
            creature_id: creature.id,
            name: creature.name.clone(),
            skill: skill_id,
            skill_name: skill.name.clone(),
        }),
    }
    Ok(())
}

/// Answer a replacement request: overwrite `slot` with the new skill at
/// full PP. The forgotten skill is gone.
pub fn replace_skill<M: MetadataProvider>(
    creature: &mut CreatureInst,
    meta: &M,
    slot: usize,
    new_skill: SkillId,
) -> Result<(), ActionError> {
    if slot >= creature.skills.len() {
        return Err(ActionError::InvalidSkillSlot { slot });
    }
    let skill = meta
        .skill(new_skill)
        .map_err(|_| ActionError::UnknownSkill { skill: new_skill })?;
    creature.skills[slot] = Some(SkillInstance::new(new_skill, skill.pp));
    Ok(())
}
