//! The battle engine: state, the event log, the command executor, the pure
//! calculators, capture resolution and the turn resolver.

pub mod calculators;
pub mod catch;
pub mod commands;
pub mod engine;
pub mod events;
pub mod state;

#[cfg(test)]
pub mod tests;
