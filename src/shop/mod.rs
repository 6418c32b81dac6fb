//! Shop generation, selection, pricing and consumables.

pub mod consumables;
pub mod generation;
pub mod pricing;
pub mod selection;
pub mod types;

pub use consumables::*;
pub use generation::*;
pub use pricing::*;
pub use selection::*;
pub use types::*;
