//! GuildMaster - idle combat game core
//!
//! Combat state machine, the synergy / equipment / boss damage pipeline,
//! rank progression and the shop. Presentation lives elsewhere; everything
//! here is plain data plus functions over [`core::GameState`], driven
//! through [`core::GameSession`].

pub mod bonuses;
pub mod boss;
pub mod combat;
pub mod core;
pub mod items;
pub mod ranks;
pub mod shop;
pub mod synergy;
pub mod units;

pub use crate::core::{GameConfig, GameError, GameResult, GameSession, GameState};
