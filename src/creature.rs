//! A combatant instance: the mutable pairing of a species template with
//! level, stats, skills and status that persists outside any one battle.

use crate::errors::DataResult;
use crate::formulas;
use crate::metadata::MetadataProvider;
use crate::status::MajorStatus;
use schema::{Nature, SkillId, SpeciesData, SpeciesId, Stat};
use serde::{Deserialize, Serialize};

/// Per-stat effort cap.
pub const EV_STAT_CAP: u8 = 252;
/// Total effort cap across all six stats.
pub const EV_TOTAL_CAP: u16 = 510;

/// A skill slot: which skill, and how many uses remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillInstance {
    pub skill: SkillId,
    pub pp: u8,
    pub max_pp: u8,
}

impl SkillInstance {
    pub fn new(skill: SkillId, max_pp: u8) -> Self {
        Self {
            skill,
            pp: max_pp,
            max_pp,
        }
    }

    pub fn has_pp(&self) -> bool {
        self.pp > 0
    }

    pub fn use_pp(&mut self) {
        self.pp = self.pp.saturating_sub(1);
    }

    pub fn restore_pp(&mut self, amount: u8) {
        self.pp = self.pp.saturating_add(amount).min(self.max_pp);
    }
}

/// A live combatant. Species data stays in the metadata store; this carries
/// everything that varies per individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureInst {
    pub id: u32,
    pub species: SpeciesId,
    /// None marks a wild combatant; capture sets the new owner.
    pub owner: Option<String>,
    pub name: String,
    pub level: u8,
    /// Cumulative experience.
    pub exp: u32,
    pub ivs: [u8; 6],
    pub evs: [u8; 6],
    pub nature: Nature,
    /// Derived stats in canonical order; recomputed on level-up and evolution.
    pub curr_stats: [u16; 6],
    pub current_hp: u16,
    pub skills: [Option<SkillInstance>; 4],
    pub status: Option<MajorStatus>,
}

impl CreatureInst {
    /// Build a fresh combatant at `level`, learning the most recent skills
    /// from the species learnset (up to four, newest first). Each slot's PP
    /// cap comes from the skill template.
    pub fn new<M: MetadataProvider>(
        id: u32,
        species: &SpeciesData,
        level: u8,
        ivs: [u8; 6],
        nature: Nature,
        meta: &M,
    ) -> DataResult<Self> {
        let mut learned: Vec<SkillId> = Vec::new();
        for (_, skills) in species.learnset.range(..=level) {
            for &skill in skills {
                learned.push(skill);
            }
        }
        let mut slots: [Option<SkillInstance>; 4] = [None; 4];
        for (slot, &skill) in learned.iter().rev().take(4).enumerate() {
            slots[slot] = Some(SkillInstance::new(skill, meta.skill(skill)?.pp));
        }

        let evs = [0u8; 6];
        let curr_stats = formulas::calculate_stats(&species.base_stats, level, &ivs, &evs, nature);
        Ok(Self {
            id,
            species: species.id,
            owner: None,
            name: species.name.clone(),
            level,
            exp: formulas::exp_needed(level, species.growth_curve),
            ivs,
            evs,
            nature,
            curr_stats,
            current_hp: curr_stats[Stat::Hp.index()],
            skills: slots,
            status: None,
        })
    }

    pub fn max_hp(&self) -> u16 {
        self.curr_stats[Stat::Hp.index()]
    }

    pub fn stat(&self, stat: Stat) -> u16 {
        self.curr_stats[stat.index()]
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn is_wild(&self) -> bool {
        self.owner.is_none()
    }

    /// Apply damage, saturating at zero. Returns true if this faints the
    /// combatant.
    pub fn take_damage(&mut self, damage: u16) -> bool {
        self.current_hp = self.current_hp.saturating_sub(damage);
        self.current_hp == 0
    }

    /// Heal, capped at max HP. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp());
        self.current_hp - before
    }

    /// Award effort values, honoring the 252 per-stat and 510 total caps.
    pub fn award_evs(&mut self, yield_: &[u8; 6]) {
        for (i, &gain) in yield_.iter().enumerate() {
            let total: u16 = self.evs.iter().map(|&e| e as u16).sum();
            let headroom_total = EV_TOTAL_CAP.saturating_sub(total);
            let headroom_stat = EV_STAT_CAP.saturating_sub(self.evs[i]);
            let granted = (gain as u16).min(headroom_total).min(headroom_stat as u16);
            self.evs[i] += granted as u8;
        }
    }

    /// Recompute stats after a level change, preserving the current HP
    /// deficit rather than the HP fraction.
    pub fn recalc_stats_preserving_hp(&mut self, species: &SpeciesData) {
        let lost = self.max_hp().saturating_sub(self.current_hp);
        self.curr_stats = formulas::calculate_stats(
            &species.base_stats,
            self.level,
            &self.ivs,
            &self.evs,
            self.nature,
        );
        self.current_hp = self.max_hp().saturating_sub(lost);
    }

    /// Rebuild stats for a new species after evolution. HP is reset to the
    /// new maximum and the display name follows the new species.
    pub fn evolve_into(&mut self, new_species: &SpeciesData) {
        self.name = new_species.name.clone();
        self.species = new_species.id;
        self.curr_stats = formulas::calculate_stats(
            &new_species.base_stats,
            self.level,
            &self.ivs,
            &self.evs,
            self.nature,
        );
        self.current_hp = self.max_hp();
    }

    /// First skill slot with PP remaining, if any. No usable slot means the
    /// combatant must resort to its fallback attack.
    pub fn first_usable_skill(&self) -> Option<usize> {
        self.skills
            .iter()
            .position(|s| s.map(|s| s.has_pp()).unwrap_or(false))
    }

    pub fn has_usable_skill(&self) -> bool {
        self.first_usable_skill().is_some()
    }
}
