//! Item metadata shared by every shop category.

pub mod rarity;

pub use rarity::*;
