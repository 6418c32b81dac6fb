//! Equipment bonuses bought in the shop.

pub mod catalog;
pub mod equipment;

pub use catalog::*;
pub use equipment::*;
