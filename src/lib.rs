//! Turn-based combat core for a creature-collecting RPG: deterministic
//! formulas, a typed event log, a command-based battle engine, and the
//! capture and growth subsystems around it.
//!
//! Battles resolve through a strict pipeline: pure calculators read a state
//! snapshot and produce [`battle::commands::BattleCommand`] lists, a single
//! executor applies them, and every observable change lands in the
//! [`battle::events::EventBus`]. Randomness is injected per turn through
//! [`battle::state::TurnRng`], so tests script exact outcomes.

pub mod battle;
pub mod creature;
pub mod errors;
pub mod formulas;
pub mod metadata;
pub mod progression;
pub mod status;
pub mod store;

pub use battle::engine::{resolve_turn, validate_action, PlayerAction, TurnReport};
pub use battle::events::{BattleEvent, EventBus};
pub use battle::state::{
    BattleKind, BattlePhase, BattleSide, BattleState, FieldState, Outcome, TurnRng,
};
pub use creature::{CreatureInst, SkillInstance};
pub use errors::{ActionError, DataError, StoreError};
pub use metadata::{MetadataProvider, MetadataStore};
pub use status::{MajorStatus, VolatileStatus};
pub use store::{BattleStore, PlayerId};
