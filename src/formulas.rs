//! Pure numeric formulas. No side effects; every function works on
//! snapshots of combatant state and returns a value.

use schema::{
    BaseStats, ElementType, GrowthCurve, Nature, Stat, StatusKind, Terrain, TypeChart, Weather,
};

/// Fallback attack used when every skill slot is out of PP.
pub const STRUGGLE_POWER: u16 = 50;
/// Struggle recoil is damage dealt divided by this, minimum 1.
pub const STRUGGLE_RECOIL_DIVISOR: u16 = 4;

/// Derive the six persistent stats from species base stats, level, IVs, EVs
/// and nature.
///
/// HP = floor(((2*base + IV + floor(EV/4)) * level) / 100) + level + 10
/// Other = floor((floor(((2*base + IV + floor(EV/4)) * level) / 100) + 5) * nature)
pub fn calculate_stats(
    base: &BaseStats,
    level: u8,
    ivs: &[u8; 6],
    evs: &[u8; 6],
    nature: Nature,
) -> [u16; 6] {
    let base = base.as_array();
    let mut stats = [0u16; 6];

    for (i, stat) in [
        Stat::Hp,
        Stat::Attack,
        Stat::Defense,
        Stat::SpAttack,
        Stat::SpDefense,
        Stat::Speed,
    ]
    .into_iter()
    .enumerate()
    {
        let core =
            (2 * base[i] as u32 + ivs[i] as u32 + evs[i] as u32 / 4) * level as u32 / 100;
        stats[i] = if stat == Stat::Hp {
            (core + level as u32 + 10) as u16
        } else {
            ((core + 5) as f64 * nature.multiplier(stat)).floor() as u16
        };
    }

    stats
}

/// Inputs to the damage pipeline beyond the level/power/attack/defense core.
#[derive(Debug, Clone)]
pub struct DamageModifiers {
    /// Uniform in [0.85, 1.0]; see [`random_damage_factor`].
    pub random_factor: f64,
    pub stab: bool,
    /// Additive type effectiveness; see [`type_effectiveness`].
    pub effectiveness: f64,
    pub critical: bool,
    /// Combined weather/terrain modifier; see [`field_modifier`].
    pub field: f64,
    /// Burned attacker using a physical skill.
    pub burned_physical: bool,
    /// Held-item damage modifier, 1.0 when none applies.
    pub item: f64,
}

impl Default for DamageModifiers {
    fn default() -> Self {
        Self {
            random_factor: 1.0,
            stab: false,
            effectiveness: 1.0,
            critical: false,
            field: 1.0,
            burned_physical: false,
            item: 1.0,
        }
    }
}

/// Full damage pipeline. The core term is integer arithmetic, the modifiers
/// are applied as floats and the result is floored. Damage is forced to a
/// minimum of 1 whenever the skill has power and the target is not immune.
pub fn calculate_damage(
    level: u8,
    power: u16,
    attack: u16,
    defense: u16,
    mods: &DamageModifiers,
) -> u16 {
    if power == 0 || mods.effectiveness <= 0.0 {
        return 0;
    }

    let defense = defense.max(1) as u64;
    let base =
        (2 * level as u64 / 5 + 2) * power as u64 * attack as u64 / defense / 50 + 2;

    let mut damage = base as f64;
    damage *= mods.random_factor;
    if mods.stab {
        damage *= 1.5;
    }
    damage *= mods.effectiveness;
    if mods.critical {
        damage *= 1.5;
    }
    damage *= mods.field;
    if mods.burned_physical {
        damage *= 0.5;
    }
    damage *= mods.item;

    (damage.floor() as u16).max(1)
}

/// Map a 1..=100 roll to the uniform damage spread [0.85, 1.0].
/// A roll of 100 is exactly 1.0, which keeps scripted tests exact.
pub fn random_damage_factor(roll: u8) -> f64 {
    0.85 + (roll.clamp(1, 100) - 1) as f64 * (0.15 / 99.0)
}

/// Type effectiveness against a 1-2 type defender.
///
/// Contributions are SUMMED, not multiplied: each defending type contributes
/// its chart value independently. This is intentional and load-bearing; see
/// DESIGN.md before touching it.
pub fn type_effectiveness(
    chart: &TypeChart,
    attacking: ElementType,
    defender_types: &[ElementType],
) -> f64 {
    defender_types
        .iter()
        .map(|&defending| chart.contribution(attacking, defending) as f64)
        .sum()
}

/// Multiplier for a regular stat stage in [-6, +6]:
/// (2+s)/2 when s >= 0, else 2/(2-s).
pub fn stat_stage_multiplier(stage: i8) -> f64 {
    let stage = stage.clamp(-6, 6);
    if stage >= 0 {
        (2 + stage) as f64 / 2.0
    } else {
        2.0 / (2 - stage) as f64
    }
}

/// Multiplier for an accuracy/evasion stage in [-6, +6]:
/// (3+s)/3 when s >= 0, else 3/(3-s).
pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    let stage = stage.clamp(-6, 6);
    if stage >= 0 {
        (3 + stage) as f64 / 3.0
    } else {
        3.0 / (3 - stage) as f64
    }
}

/// Apply a regular stat stage to a stat value, rounding to nearest.
pub fn apply_stat_stage(stat: u16, stage: i8) -> u16 {
    (stat as f64 * stat_stage_multiplier(stage)).round() as u16
}

/// Whether a skill hits, given its base accuracy (None = always hits) and the
/// net accuracy/evasion stage. `roll` is uniform in 1..=100.
pub fn check_accuracy(base_accuracy: Option<u8>, net_stage: i8, roll: u8) -> bool {
    let Some(base) = base_accuracy else {
        return true;
    };
    let modified = (base as f64 * accuracy_stage_multiplier(net_stage)).round();
    roll as f64 <= modified.clamp(1.0, 100.0)
}

/// Critical-hit chance for a skill crit stage, scaled by any item bonus and
/// capped at 50%.
pub fn critical_hit_chance(crit_stage: u8, item_bonus: f64) -> f64 {
    let base = match crit_stage {
        0 => 1.0 / 16.0,
        1 => 1.0 / 8.0,
        2 => 1.0 / 4.0,
        3 => 1.0 / 3.0,
        _ => 1.0 / 2.0,
    };
    (base * item_bonus).min(0.5)
}

/// Whether a 1..=100 roll lands a critical hit for the given chance.
pub fn check_critical_hit(crit_stage: u8, item_bonus: f64, roll: u8) -> bool {
    roll as f64 <= critical_hit_chance(crit_stage, item_bonus) * 100.0
}

/// Capture value A, clamped to [1, 255]:
/// A = (3*maxHP - 2*curHP) * rate * ball * status / (3*maxHP)
pub fn catch_value(
    max_hp: u16,
    current_hp: u16,
    base_catch_rate: u8,
    ball_modifier: f64,
    status_modifier: f64,
) -> f64 {
    let max_hp = max_hp.max(1) as f64;
    let current_hp = current_hp as f64;
    let a = (3.0 * max_hp - 2.0 * current_hp) * base_catch_rate as f64 * ball_modifier
        * status_modifier
        / (3.0 * max_hp);
    a.clamp(1.0, 255.0)
}

/// Shake threshold b = 1048560 / sqrt(sqrt(16711680 / A)). Each of the four
/// shakes succeeds when a uniform 0..=65535 roll is below b.
pub fn shake_threshold(catch_value: f64) -> u16 {
    let b = 1048560.0 / (16711680.0 / catch_value).sqrt().sqrt();
    b.min(65535.0) as u16
}

/// Closed-form overall capture probability, (b/65535)^4. Used by tests and
/// by anything that wants to display odds without rolling.
pub fn catch_probability(catch_value: f64) -> f64 {
    let p = shake_threshold(catch_value) as f64 / 65535.0;
    p.powi(4)
}

/// Catch-rate multiplier from the target's major status.
pub fn status_catch_multiplier(status: Option<StatusKind>) -> f64 {
    match status {
        Some(StatusKind::Sleep) | Some(StatusKind::Freeze) => 2.0,
        Some(_) => 1.5,
        None => 1.0,
    }
}

/// Total experience required to reach `level` on a growth curve.
pub fn exp_needed(level: u8, curve: GrowthCurve) -> u32 {
    if level <= 1 {
        return 0;
    }
    let n = level as i64;
    let cubed = n * n * n;
    let exp = match curve {
        GrowthCurve::Fast => 4 * cubed / 5,
        GrowthCurve::MediumFast => cubed,
        GrowthCurve::MediumSlow => 6 * cubed / 5 - 15 * n * n + 100 * n - 140,
        GrowthCurve::Slow => 5 * cubed / 4,
        GrowthCurve::Erratic => match n {
            n if n < 50 => cubed * (100 - n) / 50,
            n if n < 68 => cubed * (150 - n) / 100,
            n if n < 98 => cubed * ((1911 - 10 * n) / 3) / 500,
            _ => cubed * (160 - n) / 100,
        },
        GrowthCurve::Fluctuating => match n {
            n if n < 15 => cubed * ((n + 1) / 3 + 24) / 50,
            n if n < 36 => cubed * (n + 14) / 50,
            _ => cubed * (n / 2 + 32) / 50,
        },
    };
    exp.max(0) as u32
}

/// Experience awarded for defeating a combatant:
/// floor(base_yield * level / 7), *1.5 for trainer battles, minimum 1.
pub fn exp_gain(base_exp_yield: u16, defeated_level: u8, trainer_battle: bool) -> u32 {
    let mut exp = base_exp_yield as u32 * defeated_level as u32 / 7;
    if trainer_battle {
        exp = exp * 3 / 2;
    }
    exp.max(1)
}

/// Escape probability for a flee attempt. The index is capped at 255; a
/// nonpositive opponent speed guarantees escape.
pub fn escape_probability(player_speed: u16, opponent_speed: u16, attempts: u8) -> f64 {
    if opponent_speed == 0 {
        return 1.0;
    }
    let index = (player_speed as u32 * 128 / opponent_speed as u32
        + 30 * attempts as u32)
        .min(255);
    index as f64 / 255.0
}

/// Chance that a wild combatant flees after a failed capture. Higher level
/// and lower remaining HP both make it flightier; capped at 50%.
pub fn wild_flee_probability(level: u8, current_hp: u16, max_hp: u16) -> f64 {
    let hp_ratio = current_hp as f64 / max_hp.max(1) as f64;
    (0.1 + 0.3 * level as f64 / 100.0 + 0.2 * (1.0 - hp_ratio)).min(0.5)
}

/// Combined weather/terrain damage modifier for a skill's elemental type.
pub fn field_modifier(weather: Weather, terrain: Terrain, element: ElementType) -> f64 {
    let weather_mod = match (weather, element) {
        (Weather::Sun, ElementType::Fire) => 1.5,
        (Weather::Sun, ElementType::Water) => 0.5,
        (Weather::Rain, ElementType::Water) => 1.5,
        (Weather::Rain, ElementType::Fire) => 0.5,
        _ => 1.0,
    };
    let terrain_mod = match (terrain, element) {
        (Terrain::Electric, ElementType::Electric) => 1.5,
        (Terrain::Grassy, ElementType::Grass) => 1.5,
        (Terrain::Psychic, ElementType::Psychic) => 1.5,
        (Terrain::Misty, ElementType::Dragon) => 0.5,
        _ => 1.0,
    };
    weather_mod * terrain_mod
}
