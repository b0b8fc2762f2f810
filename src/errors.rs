use schema::{ItemId, SkillId, SpeciesId};
use thiserror::Error;

/// Recoverable validation failures. The battle state is left untouched and
/// the turn does not advance; the caller may submit a corrected action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("skill slot {slot} is out of bounds")]
    InvalidSkillSlot { slot: usize },
    #[error("no skill in slot {slot}")]
    EmptySkillSlot { slot: usize },
    #[error("skill in slot {slot} has no PP remaining")]
    NoPpRemaining { slot: usize },
    #[error("roster slot {slot} is out of bounds")]
    InvalidRosterSlot { slot: usize },
    #[error("no combatant in roster slot {slot}")]
    EmptyRosterSlot { slot: usize },
    #[error("combatant in roster slot {slot} is already active")]
    AlreadyActive { slot: usize },
    #[error("cannot switch to the fainted combatant in slot {slot}")]
    FaintedSwitchTarget { slot: usize },
    #[error("{item} is not in the bag")]
    ItemNotOwned { item: ItemId },
    #[error("{item} cannot be used on that target")]
    ItemNotApplicable { item: ItemId },
    #[error("{item} is not a capture device")]
    NotABall { item: ItemId },
    #[error("cannot run from a trainer battle")]
    RunInTrainerBattle,
    #[error("cannot throw a ball in a trainer battle")]
    CatchInTrainerBattle,
    #[error("the target is not a wild combatant")]
    CatchOwnedTarget,
    #[error("the roster is full")]
    RosterFull,
    #[error("{skill} is not a known skill")]
    UnknownSkill { skill: SkillId },
    #[error("the battle is already over")]
    BattleFinished,
}

/// Data-integrity failures. These are fatal to the battle: the engine
/// force-ends it with outcome `Error` and records the failure in the log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("no metadata for {0}")]
    MissingSpecies(SpeciesId),
    #[error("no metadata for {0}")]
    MissingSkill(SkillId),
    #[error("no metadata for {0}")]
    MissingItem(ItemId),
    #[error("side {side} has no active combatant")]
    NoActiveCombatant { side: usize },
}

/// Failures at the battle-store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("player {player} already has a battle in progress")]
    BattleInProgress { player: String },
    #[error("player {player} has no battle in progress")]
    NoBattle { player: String },
    #[error(transparent)]
    Action(#[from] ActionError),
}

pub type DataResult<T> = Result<T, DataError>;
