use crate::element::ElementType;
use crate::ids::{ItemId, SkillId, SpeciesId};
use crate::stats::BaseStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The formula family mapping level to cumulative experience required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthCurve {
    Fast,
    MediumFast,
    MediumSlow,
    Slow,
    Erratic,
    Fluctuating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    Day,
    Night,
}

/// What causes an evolution. Rules are evaluated in declared order;
/// the first satisfied rule wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EvolutionTrigger {
    Level { min_level: u8 },
    Item { item: ItemId },
    Trade,
    Friendship { min: u8, time: Option<TimeOfDay> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionRule {
    pub into: SpeciesId,
    pub trigger: EvolutionTrigger,
}

/// Immutable species template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: SpeciesId,
    pub name: String,
    /// One or two elemental types.
    pub types: Vec<ElementType>,
    pub base_stats: BaseStats,
    pub growth_curve: GrowthCurve,
    /// Base capture difficulty, 3 (hardest) to 255 (easiest).
    pub catch_rate: u8,
    /// Base experience awarded for defeating this species.
    pub base_exp_yield: u16,
    /// Effort values awarded for defeating this species, in stat array order.
    pub ev_yield: [u8; 6],
    /// Level -> skills learned on reaching that level.
    pub learnset: BTreeMap<u8, Vec<SkillId>>,
    pub evolutions: Vec<EvolutionRule>,
}

impl SpeciesData {
    pub fn learns_at_level(&self, level: u8) -> &[SkillId] {
        self.learnset.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_type(&self, element: ElementType) -> bool {
        self.types.contains(&element)
    }
}
