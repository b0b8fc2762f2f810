use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// The six persistent stats of a combatant, in canonical array order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
}

impl Stat {
    /// Index into `[u16; 6]` stat arrays.
    pub fn index(self) -> usize {
        match self {
            Stat::Hp => 0,
            Stat::Attack => 1,
            Stat::Defense => 2,
            Stat::SpAttack => 3,
            Stat::SpDefense => 4,
            Stat::Speed => 5,
        }
    }
}

/// Stats that can carry a battle stage modifier. HP has no stage; accuracy and
/// evasion exist only as stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum StatType {
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatType::Attack => "Attack",
            StatType::Defense => "Defense",
            StatType::SpAttack => "Special Attack",
            StatType::SpDefense => "Special Defense",
            StatType::Speed => "Speed",
            StatType::Accuracy => "accuracy",
            StatType::Evasion => "evasiveness",
        };
        write!(f, "{}", name)
    }
}

/// Species base stats, the template half of stat calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    pub fn as_array(&self) -> [u8; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.sp_attack,
            self.sp_defense,
            self.speed,
        ]
    }
}

/// A combatant's nature: +10% on one non-HP stat, -10% on another.
/// Neutral natures raise and lower the same stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    pub fn raised(self) -> Stat {
        use Nature::*;
        match self {
            Hardy | Lonely | Brave | Adamant | Naughty => Stat::Attack,
            Bold | Docile | Relaxed | Impish | Lax => Stat::Defense,
            Timid | Hasty | Serious | Jolly | Naive => Stat::Speed,
            Modest | Mild | Quiet | Bashful | Rash => Stat::SpAttack,
            Calm | Gentle | Sassy | Careful | Quirky => Stat::SpDefense,
        }
    }

    pub fn lowered(self) -> Stat {
        use Nature::*;
        match self {
            Hardy | Bold | Timid | Modest | Calm => Stat::Attack,
            Lonely | Docile | Hasty | Mild | Gentle => Stat::Defense,
            Brave | Relaxed | Serious | Quiet | Sassy => Stat::Speed,
            Adamant | Impish | Jolly | Bashful | Careful => Stat::SpAttack,
            Naughty | Lax | Naive | Rash | Quirky => Stat::SpDefense,
        }
    }

    /// Multiplier applied to a stat during stat calculation.
    /// HP is never affected by nature.
    pub fn multiplier(self, stat: Stat) -> f64 {
        if stat == Stat::Hp || self.raised() == self.lowered() {
            return 1.0;
        }
        if self.raised() == stat {
            1.1
        } else if self.lowered() == stat {
            0.9
        } else {
            1.0
        }
    }
}
