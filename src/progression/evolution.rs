//! Evolution checks and application. Rules are declared on the species and
//! evaluated in order; the first satisfied rule wins, and a combatant
//! evolves at most one step per check.

use crate::battle::events::{BattleEvent, EventBus};
use crate::creature::CreatureInst;
use crate::errors::DataResult;
use crate::metadata::MetadataProvider;
use schema::{EvolutionTrigger, ItemId, SpeciesData, SpeciesId, TimeOfDay};

/// The circumstances an evolution check runs under.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvolutionContext {
    /// Item applied to the combatant, for item-triggered evolutions.
    pub used_item: Option<ItemId>,
    /// Whether the combatant was just traded.
    pub traded: bool,
    pub friendship: u8,
    pub time: Option<TimeOfDay>,
}

/// The species this combatant evolves into right now, if any rule matches.
pub fn check_evolution(
    creature: &CreatureInst,
    species: &SpeciesData,
    ctx: &EvolutionContext,
) -> Option<SpeciesId> {
    species.evolutions.iter().find_map(|rule| {
        let satisfied = match &rule.trigger {
            EvolutionTrigger::Level { min_level } => creature.level >= *min_level,
            EvolutionTrigger::Item { item } => ctx.used_item == Some(*item),
            EvolutionTrigger::Trade => ctx.traded,
            EvolutionTrigger::Friendship { min, time } => {
                ctx.friendship >= *min && time.map(|t| ctx.time == Some(t)).unwrap_or(true)
            }
        };
        satisfied.then_some(rule.into)
    })
}

/// Carry out an evolution decided by [`check_evolution`]. Stats rebuild
/// against the new species and HP resets to the new maximum.
pub fn apply_evolution<M: MetadataProvider>(
    creature: &mut CreatureInst,
    meta: &M,
    into: SpeciesId,
    bus: &mut EventBus,
) -> DataResult<()> {
    let new_species = meta.species(into)?;
    let old_name = creature.name.clone();
    creature.evolve_into(new_species);
    bus.push(BattleEvent::Evolved {
        old_name,
        new_name: creature.name.clone(),
    });
    Ok(())
}
