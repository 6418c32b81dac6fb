// Ranks and damage targets
pub const BASE_DAMAGE: u64 = 2000;
pub const DAMAGE_INCREMENT_PER_RANK: u64 = 500;
pub const MAX_ROUNDS: u32 = 5;

// Combat pools
pub const COMBAT_POOL_SIZE: usize = 7;
pub const MAX_SELECTED_UNITS: usize = 5;
pub const BASE_REROLLS_PER_RANK: u32 = 3;
/// Zero-based squad slot boosted by the position bonus (the 4th unit).
pub const POSITION_BONUS_SLOT: usize = 3;

// Rewards
pub const STARTING_GOLD: u64 = 100;
pub const NORMAL_VICTORY_GOLD: u64 = 59;
pub const BOSS_VICTORY_GOLD: u64 = 89;
pub const WEALTH_BONUS_STEP: u64 = 100;
pub const WEALTH_BONUS_PER_STEP: u64 = 5;

// Pricing, as percentages so every formula stays integral
pub const PRICE_MARKUP_PERCENT: u64 = 175;
pub const SELL_RATIO_PERCENT: u64 = 50;
pub const CONSUMABLE_BASE_PRICE: u64 = 15;

// Shop
pub const SHOP_SLOTS: usize = 5;
pub const SHOP_UNIT_WEIGHT: f64 = 1.0;
pub const SHOP_BONUS_WEIGHT: f64 = 1.0;
pub const SHOP_CONSUMABLE_WEIGHT: f64 = 4.0;
pub const SHOP_WEIGHT_DECAY: f64 = 0.7;
pub const SHOP_MIN_WEIGHT: f64 = 1.0;
pub const SHOP_MIN_CONSUMABLES: usize = 2;
pub const SHOP_MAX_CONSUMABLES: usize = 3;
pub const SYNERGY_CRYSTAL_SHOP_CHANCE: f64 = 0.25;
pub const REFRESH_BASE_COST: u64 = 10;
pub const REFRESH_COST_STEP: u64 = 5;
pub const CONSUMABLE_CAPACITY: usize = 3;

// Dynamic bonus triggers
pub const TRIGGER_MELEE_FORMATION: &str = "Melee Formation";
pub const TRIGGER_END_OF_COMBAT: &str = "end_of_combat";

// Persistence
pub const SAVE_VERSION: u32 = 1;
pub const SAVE_DIR_NAME: &str = ".guildmaster";
pub const SAVE_FILE_NAME: &str = "save.json";
