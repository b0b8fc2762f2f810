//! Growth outside the turn loop: experience, level-ups, skill learning and
//! evolution.

mod evolution;
mod growth;

pub use evolution::{apply_evolution, check_evolution, EvolutionContext};
pub use growth::{gain_experience, replace_skill};
