//! Game state, configuration, errors, notifications and persistence.

pub mod config;
pub mod constants;
pub mod error;
pub mod game_state;
pub mod notify;
pub mod persistence;
pub mod session;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use game_state::*;
pub use notify::*;
pub use persistence::*;
pub use session::*;
