use thiserror::Error;

use crate::shop::ConsumableId;
use crate::units::UnitId;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Not enough gold: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("Unknown bonus id: {0}")]
    InvalidBonusId(String),

    #[error("Bonus not owned: {0}")]
    BonusNotOwned(String),

    #[error("Already bought in this shop: {0}")]
    DuplicatePurchaseInSession(String),

    #[error("No combat is active")]
    CombatNotActive,

    #[error("A combat is already active")]
    CombatAlreadyActive,

    #[error("Unit not found: {0:?}")]
    UnknownUnit(UnitId),

    #[error("Unknown unit archetype: {0}")]
    UnknownArchetype(String),

    #[error("Unknown synergy: {0}")]
    UnknownSynergy(String),

    #[error("Consumable not found: {0}")]
    UnknownConsumable(ConsumableId),

    #[error("Consumable inventory full (capacity {capacity})")]
    InventoryFull { capacity: usize },

    #[error("No shop item in slot {0}")]
    InvalidShopSlot(usize),

    #[error("No rerolls left this rank")]
    NoRerollsLeft,

    #[error("Blocked by boss mechanic: {0}")]
    BlockedByBoss(String),

    #[error("This consumable needs a target")]
    MissingTarget,

    #[error("The game is already completed")]
    GameCompleted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type GameResult<T> = std::result::Result<T, GameError>;
