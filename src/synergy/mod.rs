//! Composition-triggered team bonuses.

pub mod definitions;
pub mod logic;

pub use definitions::*;
pub use logic::*;
