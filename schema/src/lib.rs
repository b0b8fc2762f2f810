// Combat Schema - Shared type definitions
// This crate contains the data templates and core enums that are shared between
// the combat engine and whatever loads game metadata into it. Everything here
// is plain data: no battle logic, no I/O.

pub use element::*;
pub use field::*;
pub use ids::*;
pub use items::*;
pub use skills::*;
pub use species::*;
pub use stats::*;
pub use type_chart::*;

pub mod element;
pub mod field;
pub mod ids;
pub mod items;
pub mod skills;
pub mod species;
pub mod stats;
pub mod type_chart;
