use crate::ids::ItemId;
use crate::skills::StatusKind;
use crate::stats::StatType;
use serde::{Deserialize, Serialize};

/// What an item does when used. One effect per item; the engine validates
/// applicability per category before consuming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Restore a fixed amount of HP to the active combatant.
    HealHp { amount: u16 },
    /// Cure a specific major status, or any major status if None.
    CureStatus { status: Option<StatusKind> },
    /// Restore PP to every skill slot.
    RestorePp { amount: u8 },
    /// Raise a battle stat stage on the active combatant.
    StatBoost { stat: StatType, delta: i8 },
    /// Capture device. The modifier scales the capture value.
    Ball { modifier: f32 },
    /// Triggers item-based evolution when applied outside combat.
    Evolution,
}

/// Immutable item template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    pub id: ItemId,
    pub name: String,
    pub effect: ItemEffect,
}

impl ItemData {
    pub fn is_ball(&self) -> bool {
        matches!(self.effect, ItemEffect::Ball { .. })
    }

    pub fn ball_modifier(&self) -> Option<f32> {
        match self.effect {
            ItemEffect::Ball { modifier } => Some(modifier),
            _ => None,
        }
    }
}
