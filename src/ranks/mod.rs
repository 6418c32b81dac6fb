//! Rank ladder and progression.

pub mod data;
pub mod progression;

pub use data::*;
pub use progression::*;
