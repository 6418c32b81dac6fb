//! Unit archetypes, instances and the squad.

pub mod catalog;
pub mod pool;
pub mod types;

pub use catalog::*;
pub use pool::*;
pub use types::*;
