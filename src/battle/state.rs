//! Battle state: two sides, their rosters and transient battle-only state,
//! plus the injectable RNG every turn resolves against.

use crate::creature::CreatureInst;
use crate::status::VolatileStatus;
use schema::{ItemId, StatType, Terrain, VolatileKind, Weather};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const ROSTER_SIZE: usize = 6;

/// Wild encounters allow running and capture; trainer battles allow neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleKind {
    Wild,
    Trainer,
}

/// How a finished battle ended, from the player side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
    Escape,
    Caught,
    Draw,
    /// A data-integrity failure force-ended the battle.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    Ongoing,
    Finished(Outcome),
}

/// Weather and terrain. Both persist until something replaces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldState {
    pub weather: Weather,
    pub terrain: Terrain,
}

/// One side of the battle: a roster, the active slot, and state that lives
/// only as long as the battle does (stages, volatiles, bag).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleSide {
    /// None for the wild side of a wild encounter.
    pub player_id: Option<String>,
    pub name: String,
    pub roster: Vec<Option<CreatureInst>>,
    pub active_index: usize,
    pub stat_stages: HashMap<StatType, i8>,
    pub volatiles: HashMap<VolatileKind, VolatileStatus>,
    pub bag: HashMap<ItemId, u16>,
}

impl BattleSide {
    pub fn new(player_id: Option<String>, name: impl Into<String>) -> Self {
        Self {
            player_id,
            name: name.into(),
            roster: vec![None; ROSTER_SIZE],
            active_index: 0,
            stat_stages: HashMap::new(),
            volatiles: HashMap::new(),
            bag: HashMap::new(),
        }
    }

    pub fn with_roster(mut self, creatures: Vec<CreatureInst>) -> Self {
        for (slot, creature) in creatures.into_iter().take(ROSTER_SIZE).enumerate() {
            self.roster[slot] = Some(creature);
        }
        self
    }

    pub fn active(&self) -> Option<&CreatureInst> {
        self.roster.get(self.active_index).and_then(Option::as_ref)
    }

    pub fn active_mut(&mut self) -> Option<&mut CreatureInst> {
        self.roster
            .get_mut(self.active_index)
            .and_then(Option::as_mut)
    }

    /// Current stage for a stat, 0 when never modified.
    pub fn stat_stage(&self, stat: StatType) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    /// Apply a stage delta, clamping to [-6, +6]. Returns the actual change.
    pub fn change_stat_stage(&mut self, stat: StatType, delta: i8) -> i8 {
        let current = self.stat_stage(stat);
        let next = current.saturating_add(delta).clamp(-6, 6);
        self.stat_stages.insert(stat, next);
        next - current
    }

    pub fn has_volatile(&self, kind: VolatileKind) -> bool {
        self.volatiles.contains_key(&kind)
    }

    /// Add a volatile. Duplicates of the same kind are rejected, except
    /// confusion, whose duration refreshes on re-application.
    pub fn add_volatile(&mut self, status: VolatileStatus) -> bool {
        let kind = status.kind();
        if self.has_volatile(kind) && kind != VolatileKind::Confusion {
            return false;
        }
        self.volatiles.insert(kind, status);
        true
    }

    pub fn remove_volatile(&mut self, kind: VolatileKind) -> bool {
        self.volatiles.remove(&kind).is_some()
    }

    /// Drop all battle-scoped state. Called when the battle ends and when
    /// the active combatant leaves the field.
    pub fn clear_battle_state(&mut self) {
        self.stat_stages.clear();
        self.volatiles.clear();
    }

    pub fn has_able_creature(&self) -> bool {
        self.roster
            .iter()
            .flatten()
            .any(|creature| !creature.is_fainted())
    }

    /// First roster slot holding a non-fainted combatant other than the
    /// active one.
    pub fn first_healthy_reserve(&self) -> Option<usize> {
        self.roster.iter().enumerate().position(|(slot, entry)| {
            slot != self.active_index
                && entry.as_ref().map(|c| !c.is_fainted()).unwrap_or(false)
        })
    }

    /// First empty roster slot, if the roster has room.
    pub fn first_empty_slot(&self) -> Option<usize> {
        self.roster.iter().position(Option::is_none)
    }

    pub fn item_count(&self, item: ItemId) -> u16 {
        self.bag.get(&item).copied().unwrap_or(0)
    }

    pub fn consume_item(&mut self, item: ItemId) -> bool {
        match self.bag.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.bag.remove(&item);
                }
                true
            }
            _ => false,
        }
    }
}

pub const PLAYER_SIDE: usize = 0;
pub const OPPONENT_SIDE: usize = 1;

/// The full state of one battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub battle_id: String,
    pub kind: BattleKind,
    pub sides: [BattleSide; 2],
    pub turn_number: u32,
    pub field: FieldState,
    /// Failed run attempts this battle; feeds the escape formula.
    pub run_attempts: u8,
    pub phase: BattlePhase,
}

impl BattleState {
    pub fn new(
        battle_id: impl Into<String>,
        kind: BattleKind,
        player: BattleSide,
        opponent: BattleSide,
    ) -> Self {
        Self {
            battle_id: battle_id.into(),
            kind,
            sides: [player, opponent],
            turn_number: 0,
            field: FieldState::default(),
            run_attempts: 0,
            phase: BattlePhase::Ongoing,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, BattlePhase::Finished(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            BattlePhase::Finished(outcome) => Some(outcome),
            BattlePhase::Ongoing => None,
        }
    }

    pub fn side(&self, index: usize) -> &BattleSide {
        &self.sides[index]
    }

    pub fn side_mut(&mut self, index: usize) -> &mut BattleSide {
        &mut self.sides[index]
    }
}

/// Source of randomness for a turn. Production battles use the thread RNG;
/// tests script exact outcomes and panic loudly if the script runs dry or
/// a test over-provisions.
#[derive(Debug)]
pub enum TurnRng {
    Scripted { outcomes: Vec<u16>, index: usize },
    Random(rand::rngs::ThreadRng),
}

impl TurnRng {
    pub fn new_random() -> Self {
        TurnRng::Random(rand::rng())
    }

    pub fn new_for_test(outcomes: Vec<u16>) -> Self {
        TurnRng::Scripted { outcomes, index: 0 }
    }

    /// A roll in 1..=100. `reason` names the decision being rolled, so a
    /// scripted test that runs dry fails with a useful message.
    pub fn next_percent(&mut self, reason: &str) -> u8 {
        match self {
            TurnRng::Scripted { outcomes, index } => {
                let value = outcomes.get(*index).copied().unwrap_or_else(|| {
                    panic!("scripted rng exhausted at roll {} ({})", index, reason)
                });
                *index += 1;
                value.clamp(1, 100) as u8
            }
            TurnRng::Random(rng) => rand::Rng::random_range(rng, 1..=100),
        }
    }

    /// A roll in 0..=65535, used by capture shake checks.
    pub fn next_word(&mut self, reason: &str) -> u16 {
        match self {
            TurnRng::Scripted { outcomes, index } => {
                let value = outcomes.get(*index).copied().unwrap_or_else(|| {
                    panic!("scripted rng exhausted at roll {} ({})", index, reason)
                });
                *index += 1;
                value
            }
            TurnRng::Random(rng) => rand::Rng::random_range(rng, 0..=65535),
        }
    }
}
