use crate::element::ElementType;
use crate::ids::SkillId;
use crate::stats::StatType;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// Major status conditions, payload-free. The engine tracks counters
/// (toxic escalation, sleep turns) on its own runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum StatusKind {
    Burn,
    Poison,
    Toxic,
    Paralysis,
    Sleep,
    Freeze,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusKind::Burn => "burn",
            StatusKind::Poison => "poison",
            StatusKind::Toxic => "toxic poison",
            StatusKind::Paralysis => "paralysis",
            StatusKind::Sleep => "sleep",
            StatusKind::Freeze => "freeze",
        };
        write!(f, "{}", name)
    }
}

/// Volatile (battle-only) condition kinds, payload-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum VolatileKind {
    Confusion,
    Flinch,
    LeechSeed,
    Taunt,
    Protect,
    Encore,
}

impl fmt::Display for VolatileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VolatileKind::Confusion => "confusion",
            VolatileKind::Flinch => "flinching",
            VolatileKind::LeechSeed => "leech seed",
            VolatileKind::Taunt => "taunt",
            VolatileKind::Protect => "protection",
            VolatileKind::Encore => "encore",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillCategory {
    Physical,
    Special,
    Status,
}

/// Who a skill (or one of its secondary effects) applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillTarget {
    User,
    Opponent,
    AllOpponents,
}

/// A secondary effect rider on a skill. `chance` is a percentage in 1..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkillEffect {
    InflictStatus {
        status: StatusKind,
        chance: u8,
    },
    InflictVolatile {
        volatile: VolatileKind,
        chance: u8,
        /// Duration in turns for conditions that count down; None for
        /// conditions cleared by their own rules (flinch, leech seed).
        turns: Option<u8>,
    },
    ChangeStatStage {
        target: SkillTarget,
        stat: StatType,
        delta: i8,
        chance: u8,
    },
    /// Heal the user by a percentage of its max HP.
    HealUser {
        percent_max_hp: u8,
    },
    /// Recoil to the user as a percentage of damage dealt.
    Recoil {
        percent_damage: u8,
    },
}

/// Immutable skill template. A combatant's copy tracks current PP separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillData {
    pub id: SkillId,
    pub name: String,
    pub element: ElementType,
    pub category: SkillCategory,
    /// None for status skills.
    pub power: Option<u16>,
    /// None means the skill never misses.
    pub accuracy: Option<u8>,
    pub pp: u8,
    pub priority: i8,
    /// Index into the critical-hit chance table; 0 for ordinary skills.
    pub crit_stage: u8,
    pub target: SkillTarget,
    pub effects: Vec<SkillEffect>,
}

impl SkillData {
    pub fn is_damaging(&self) -> bool {
        self.power.is_some() && self.category != SkillCategory::Status
    }
}
