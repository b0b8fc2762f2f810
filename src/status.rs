//! Runtime status conditions: major statuses carried on the combatant and
//! volatile conditions scoped to a single battle.

use schema::{ElementType, SpeciesData, StatusKind, VolatileKind};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Chance per turn that a sleeping combatant wakes before acting.
pub const SLEEP_RECOVERY_PERCENT: u8 = 30;
/// Chance per turn that a frozen combatant thaws before acting.
pub const FREEZE_THAW_PERCENT: u8 = 20;
/// Chance that paralysis prevents the combatant from acting.
pub const PARALYSIS_IMMOBILIZE_PERCENT: u8 = 25;
/// Chance that a confused combatant hits itself instead of acting.
pub const CONFUSION_SELF_HIT_PERCENT: u8 = 50;
/// Toxic damage is maxHP * counter / 16; the counter stops escalating here.
pub const TOXIC_COUNTER_CAP: u8 = 15;

/// A major status condition. At most one may be present at a time; applying
/// a second is rejected as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MajorStatus {
    Burn,
    Poison,
    /// Escalating poison. The counter starts at 1 and increments each
    /// end-of-turn tick up to [`TOXIC_COUNTER_CAP`].
    Toxic { counter: u8 },
    Paralysis,
    Sleep,
    Freeze,
}

impl MajorStatus {
    pub fn from_kind(kind: StatusKind) -> Self {
        match kind {
            StatusKind::Burn => MajorStatus::Burn,
            StatusKind::Poison => MajorStatus::Poison,
            StatusKind::Toxic => MajorStatus::Toxic { counter: 1 },
            StatusKind::Paralysis => MajorStatus::Paralysis,
            StatusKind::Sleep => MajorStatus::Sleep,
            StatusKind::Freeze => MajorStatus::Freeze,
        }
    }

    pub fn kind(&self) -> StatusKind {
        match self {
            MajorStatus::Burn => StatusKind::Burn,
            MajorStatus::Poison => StatusKind::Poison,
            MajorStatus::Toxic { .. } => StatusKind::Toxic,
            MajorStatus::Paralysis => StatusKind::Paralysis,
            MajorStatus::Sleep => StatusKind::Sleep,
            MajorStatus::Freeze => StatusKind::Freeze,
        }
    }

    /// End-of-turn chip damage for this status, plus the status as it stands
    /// after the tick (toxic escalates). Returns 0 for statuses without a
    /// damage tick.
    pub fn end_of_turn_damage(&self, max_hp: u16) -> (u16, MajorStatus) {
        match *self {
            MajorStatus::Burn => ((max_hp / 16).max(1), *self),
            MajorStatus::Poison => ((max_hp / 8).max(1), *self),
            MajorStatus::Toxic { counter } => {
                let damage = (max_hp as u32 * counter as u32 / 16).max(1) as u16;
                let next = counter.saturating_add(1).min(TOXIC_COUNTER_CAP);
                (damage, MajorStatus::Toxic { counter: next })
            }
            _ => (0, *self),
        }
    }

    /// Whether this status prevents the combatant from acting outright
    /// (subject to the per-turn recovery roll).
    pub fn blocks_action(&self) -> bool {
        matches!(self, MajorStatus::Sleep | MajorStatus::Freeze)
    }
}

/// Elemental immunity to a major status. Checked before application; an
/// immune target rejects the status silently.
pub fn is_immune_to_status(species: &SpeciesData, kind: StatusKind) -> bool {
    match kind {
        StatusKind::Burn => species.has_type(ElementType::Fire),
        StatusKind::Freeze => species.has_type(ElementType::Ice),
        StatusKind::Paralysis => species.has_type(ElementType::Electric),
        StatusKind::Poison | StatusKind::Toxic => {
            species.has_type(ElementType::Poison) || species.has_type(ElementType::Steel)
        }
        StatusKind::Sleep => false,
    }
}

/// A volatile condition on an active combatant. Keyed by kind: a side holds
/// at most one of each, and all of them evaporate when the battle ends or
/// the combatant leaves the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatileStatus {
    Confusion { turns_remaining: u8 },
    Flinch,
    LeechSeed,
    Taunt { turns_remaining: u8 },
    Protect,
    Encore { turns_remaining: u8 },
}

impl VolatileStatus {
    pub fn kind(&self) -> VolatileKind {
        match self {
            VolatileStatus::Confusion { .. } => VolatileKind::Confusion,
            VolatileStatus::Flinch => VolatileKind::Flinch,
            VolatileStatus::LeechSeed => VolatileKind::LeechSeed,
            VolatileStatus::Taunt { .. } => VolatileKind::Taunt,
            VolatileStatus::Protect => VolatileKind::Protect,
            VolatileStatus::Encore { .. } => VolatileKind::Encore,
        }
    }

    pub fn from_kind(kind: VolatileKind, turns: Option<u8>) -> Self {
        match kind {
            VolatileKind::Confusion => VolatileStatus::Confusion {
                turns_remaining: turns.unwrap_or(3),
            },
            VolatileKind::Flinch => VolatileStatus::Flinch,
            VolatileKind::LeechSeed => VolatileStatus::LeechSeed,
            VolatileKind::Taunt => VolatileStatus::Taunt {
                turns_remaining: turns.unwrap_or(3),
            },
            VolatileKind::Protect => VolatileStatus::Protect,
            VolatileKind::Encore => VolatileStatus::Encore {
                turns_remaining: turns.unwrap_or(3),
            },
        }
    }

    /// Tick a turn-counted condition down by one. Returns None when the
    /// condition expires. Conditions without a counter persist unchanged;
    /// flinch is cleared separately at end of turn regardless of this.
    pub fn tick(&self) -> Option<VolatileStatus> {
        let decrement = |turns: u8| turns.checked_sub(1).filter(|t| *t > 0);
        match *self {
            VolatileStatus::Confusion { turns_remaining } => {
                decrement(turns_remaining).map(|t| VolatileStatus::Confusion { turns_remaining: t })
            }
            VolatileStatus::Taunt { turns_remaining } => {
                decrement(turns_remaining).map(|t| VolatileStatus::Taunt { turns_remaining: t })
            }
            VolatileStatus::Encore { turns_remaining } => {
                decrement(turns_remaining).map(|t| VolatileStatus::Encore { turns_remaining: t })
            }
            other => Some(other),
        }
    }
}

// Hash by discriminant only, so a HashSet of volatiles keys on the kind of
// condition and not on its counters.
impl Hash for VolatileStatus {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::{BaseStats, SpeciesId};
    use std::collections::BTreeMap;

    fn species_with_types(types: Vec<ElementType>) -> SpeciesData {
        SpeciesData {
            id: SpeciesId(1),
            name: "Testling".to_string(),
            types,
            base_stats: BaseStats {
                hp: 50,
                attack: 50,
                defense: 50,
                sp_attack: 50,
                sp_defense: 50,
                speed: 50,
            },
            growth_curve: schema::GrowthCurve::MediumFast,
            catch_rate: 45,
            base_exp_yield: 60,
            ev_yield: [0; 6],
            learnset: BTreeMap::new(),
            evolutions: Vec::new(),
        }
    }

    #[test]
    fn burn_and_poison_tick_fractions_of_max_hp() {
        let (burn, _) = MajorStatus::Burn.end_of_turn_damage(160);
        assert_eq!(burn, 10);
        let (poison, _) = MajorStatus::Poison.end_of_turn_damage(160);
        assert_eq!(poison, 20);
    }

    #[test]
    fn toxic_escalates_and_caps() {
        let mut status = MajorStatus::from_kind(StatusKind::Toxic);
        let (first, next) = status.end_of_turn_damage(160);
        assert_eq!(first, 10);
        status = next;
        let (second, next) = status.end_of_turn_damage(160);
        assert_eq!(second, 20);
        status = next;
        // Run the counter past its cap.
        for _ in 0..20 {
            let (_, next) = status.end_of_turn_damage(160);
            status = next;
        }
        assert_eq!(status, MajorStatus::Toxic { counter: TOXIC_COUNTER_CAP });
        let (capped, _) = status.end_of_turn_damage(160);
        assert_eq!(capped, 160 * 15 / 16);
    }

    #[test]
    fn chip_damage_is_at_least_one() {
        let (damage, _) = MajorStatus::Burn.end_of_turn_damage(10);
        assert_eq!(damage, 1);
    }

    #[test]
    fn elemental_immunities() {
        let fire = species_with_types(vec![ElementType::Fire]);
        assert!(is_immune_to_status(&fire, StatusKind::Burn));
        assert!(!is_immune_to_status(&fire, StatusKind::Poison));

        let steel = species_with_types(vec![ElementType::Steel, ElementType::Flying]);
        assert!(is_immune_to_status(&steel, StatusKind::Poison));
        assert!(is_immune_to_status(&steel, StatusKind::Toxic));

        let electric = species_with_types(vec![ElementType::Electric]);
        assert!(is_immune_to_status(&electric, StatusKind::Paralysis));

        let ice = species_with_types(vec![ElementType::Ice]);
        assert!(is_immune_to_status(&ice, StatusKind::Freeze));
        assert!(!is_immune_to_status(&ice, StatusKind::Sleep));
    }

    #[test]
    fn confusion_counts_down_to_expiry() {
        let mut status = VolatileStatus::Confusion { turns_remaining: 2 };
        status = status.tick().unwrap();
        assert_eq!(status, VolatileStatus::Confusion { turns_remaining: 1 });
        assert_eq!(status.tick(), None);
    }

    #[test]
    fn uncounted_volatiles_persist_through_tick() {
        assert_eq!(
            VolatileStatus::LeechSeed.tick(),
            Some(VolatileStatus::LeechSeed)
        );
        assert_eq!(VolatileStatus::Flinch.tick(), Some(VolatileStatus::Flinch));
    }

    #[test]
    fn volatiles_hash_by_kind_not_counter() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(VolatileStatus::Confusion { turns_remaining: 3 });
        assert!(set.contains(&VolatileStatus::Confusion { turns_remaining: 3 }));
        // Same discriminant hashes the same; equality still compares counters.
        let other = VolatileStatus::Confusion { turns_remaining: 1 };
        assert!(!set.contains(&other));
        set.insert(other);
        assert_eq!(set.len(), 2);
    }
}
