//! Combat state machine and the per-turn damage pipeline.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
