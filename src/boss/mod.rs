//! Boss encounters.

pub mod catalog;
pub mod mechanics;

pub use catalog::*;
pub use mechanics::*;
