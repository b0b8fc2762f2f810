//! The battle event log. Every observable thing that happens in a turn is
//! recorded as a typed event; presentation is a separate, optional step.

use crate::battle::commands::SideTarget;
use crate::battle::state::{BattleState, Outcome};
use schema::{ItemId, SkillId, StatType, StatusKind, VolatileKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an intended action did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionFailureReason {
    IsAsleep,
    IsFrozen,
    IsParalyzed,
    IsFlinching,
    IsConfused,
    NoTargetPresent,
}

/// One observable occurrence during a battle. Events carry the combatant
/// display name at the time they fired, so the log reads correctly even
/// after switches and evolutions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded,
    SkillUsed {
        side: SideTarget,
        name: String,
        skill: SkillId,
        skill_name: String,
    },
    SkillMissed {
        side: SideTarget,
        name: String,
    },
    CriticalHit,
    /// Logged after damage for non-neutral matchups.
    Effectiveness {
        multiplier: f64,
    },
    DamageDealt {
        side: SideTarget,
        name: String,
        amount: u16,
        remaining_hp: u16,
    },
    Healed {
        side: SideTarget,
        name: String,
        amount: u16,
    },
    Fainted {
        side: SideTarget,
        name: String,
    },
    StatusApplied {
        side: SideTarget,
        name: String,
        status: StatusKind,
    },
    StatusRemoved {
        side: SideTarget,
        name: String,
        status: StatusKind,
    },
    StatusDamage {
        side: SideTarget,
        name: String,
        status: StatusKind,
        amount: u16,
    },
    VolatileApplied {
        side: SideTarget,
        name: String,
        volatile: VolatileKind,
    },
    VolatileRemoved {
        side: SideTarget,
        name: String,
        volatile: VolatileKind,
    },
    ConfusionSelfHit {
        side: SideTarget,
        name: String,
        amount: u16,
    },
    LeechSeedDrain {
        side: SideTarget,
        name: String,
        amount: u16,
    },
    StatStageChanged {
        side: SideTarget,
        name: String,
        stat: StatType,
        delta: i8,
    },
    StatChangeBlocked {
        side: SideTarget,
        name: String,
        stat: StatType,
        rising: bool,
    },
    Switched {
        side: SideTarget,
        name: String,
    },
    ItemUsed {
        side: SideTarget,
        item: ItemId,
        item_name: String,
    },
    RunAttempted {
        escaped: bool,
    },
    BallThrown {
        item_name: String,
        shakes: u8,
        caught: bool,
    },
    WildFled {
        name: String,
    },
    ActionFailed {
        side: SideTarget,
        name: String,
        reason: ActionFailureReason,
    },
    StruggleRecoil {
        side: SideTarget,
        name: String,
        amount: u16,
    },
    ExpGained {
        name: String,
        amount: u32,
    },
    LeveledUp {
        name: String,
        level: u8,
    },
    SkillLearned {
        name: String,
        skill_name: String,
    },
    /// All four slots are full; the caller must decide what to forget.
    SkillReplacementRequested {
        creature_id: u32,
        name: String,
        skill: SkillId,
        skill_name: String,
    },
    Evolved {
        old_name: String,
        new_name: String,
    },
    BattleEnded {
        outcome: Outcome,
    },
}

impl BattleEvent {
    /// Human-readable rendering of this event, or None for bookkeeping
    /// events that have no narration.
    pub fn format(&self, state: &BattleState) -> Option<String> {
        use BattleEvent::*;
        let text = match self {
            TurnStarted { turn_number } => format!("--- Turn {} ---", turn_number),
            TurnEnded => return None,
            SkillUsed {
                name, skill_name, ..
            } => format!("{} used {}!", name, skill_name),
            SkillMissed { name, .. } => format!("{}'s attack missed!", name),
            CriticalHit => "A critical hit!".to_string(),
            Effectiveness { multiplier } => {
                if *multiplier > 1.0 {
                    "It's super effective!".to_string()
                } else if *multiplier == 0.0 {
                    "It had no effect...".to_string()
                } else if *multiplier < 1.0 {
                    "It's not very effective...".to_string()
                } else {
                    return None;
                }
            }
            DamageDealt { name, amount, .. } => {
                format!("{} took {} damage!", name, amount)
            }
            Healed { name, amount, .. } => format!("{} recovered {} HP!", name, amount),
            Fainted { name, .. } => format!("{} fainted!", name),
            StatusApplied { name, status, .. } => match status {
                StatusKind::Burn => format!("{} was burned!", name),
                StatusKind::Poison => format!("{} was poisoned!", name),
                StatusKind::Toxic => format!("{} was badly poisoned!", name),
                StatusKind::Paralysis => format!("{} is paralyzed!", name),
                StatusKind::Sleep => format!("{} fell asleep!", name),
                StatusKind::Freeze => format!("{} was frozen solid!", name),
            },
            StatusRemoved { name, status, .. } => match status {
                StatusKind::Sleep => format!("{} woke up!", name),
                StatusKind::Freeze => format!("{} thawed out!", name),
                other => format!("{} was cured of {}!", name, other),
            },
            StatusDamage {
                name,
                status,
                amount,
                ..
            } => format!("{} took {} damage from {}!", name, amount, status),
            VolatileApplied { name, volatile, .. } => match volatile {
                VolatileKind::Confusion => format!("{} became confused!", name),
                VolatileKind::Flinch => format!("{} flinched!", name),
                VolatileKind::LeechSeed => format!("{} was seeded!", name),
                other => format!("{} is affected by {}!", name, other),
            },
            VolatileRemoved { name, volatile, .. } => match volatile {
                VolatileKind::Confusion => format!("{} snapped out of confusion!", name),
                VolatileKind::Flinch => return None,
                other => format!("{} is no longer affected by {}.", name, other),
            },
            ConfusionSelfHit { name, amount, .. } => {
                format!("{} hurt itself in confusion for {} damage!", name, amount)
            }
            LeechSeedDrain { name, amount, .. } => {
                format!("{}'s health was sapped by leech seed ({} HP)!", name, amount)
            }
            StatStageChanged {
                name, stat, delta, ..
            } => {
                let direction = match delta {
                    d if *d >= 2 => "rose sharply",
                    d if *d == 1 => "rose",
                    d if *d == -1 => "fell",
                    _ => "fell harshly",
                };
                format!("{}'s {} {}!", name, stat, direction)
            }
            StatChangeBlocked { name, stat, rising, .. } => {
                if *rising {
                    format!("{}'s {} won't go any higher!", name, stat)
                } else {
                    format!("{}'s {} won't go any lower!", name, stat)
                }
            }
            Switched { side, name } => {
                let trainer = &state.side(side.to_index()).name;
                format!("{} sent out {}!", trainer, name)
            }
            ItemUsed { side, item_name, .. } => {
                let trainer = &state.side(side.to_index()).name;
                format!("{} used a {}!", trainer, item_name)
            }
            RunAttempted { escaped } => {
                if *escaped {
                    "Got away safely!".to_string()
                } else {
                    "Can't escape!".to_string()
                }
            }
            BallThrown {
                item_name,
                shakes,
                caught,
            } => {
                if *caught {
                    format!("Gotcha! It was caught with the {}!", item_name)
                } else {
                    format!("The {} shook {} times, but it broke free!", item_name, shakes)
                }
            }
            WildFled { name } => format!("The wild {} fled!", name),
            ActionFailed { name, reason, .. } => match reason {
                ActionFailureReason::IsAsleep => format!("{} is fast asleep.", name),
                ActionFailureReason::IsFrozen => format!("{} is frozen solid!", name),
                ActionFailureReason::IsParalyzed => {
                    format!("{} is paralyzed! It can't move!", name)
                }
                ActionFailureReason::IsFlinching => format!("{} flinched and couldn't move!", name),
                ActionFailureReason::IsConfused => format!("{} is confused!", name),
                ActionFailureReason::NoTargetPresent => "But there was no target...".to_string(),
            },
            StruggleRecoil { name, amount, .. } => {
                format!("{} is hit with recoil for {} damage!", name, amount)
            }
            ExpGained { name, amount } => format!("{} gained {} experience!", name, amount),
            LeveledUp { name, level } => format!("{} grew to level {}!", name, level),
            SkillLearned { name, skill_name } => format!("{} learned {}!", name, skill_name),
            SkillReplacementRequested {
                name, skill_name, ..
            } => format!(
                "{} wants to learn {}, but already knows four skills.",
                name, skill_name
            ),
            Evolved { old_name, new_name } => {
                format!("What? {} is evolving... into {}!", old_name, new_name)
            }
            BattleEnded { outcome } => match outcome {
                Outcome::Win => "You won the battle!".to_string(),
                Outcome::Lose => "You lost the battle...".to_string(),
                Outcome::Escape => return None,
                Outcome::Caught => return None,
                Outcome::Draw => "Neither side can continue. The battle is a draw.".to_string(),
                Outcome::Error => "The battle ended due to an internal error.".to_string(),
            },
        };
        Some(text)
    }
}

/// Ordered log of everything that happened. Push-only during resolution.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Render every narrated event, one per line, against a state snapshot.
    pub fn format_all(&self, state: &BattleState) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| event.format(state))
            .collect()
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{:?}", event)?;
        }
        Ok(())
    }
}
