//! Tunable game rules.
//!
//! Every field falls back to its default when missing, so a config file
//! only needs to name the values it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::error::GameResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Gold the player starts a new game with
    pub starting_gold: u64,

    /// Turns allowed per combat before it counts as a defeat
    pub max_rounds: u32,

    /// Units drawn from the squad into the combat pool
    pub combat_pool_size: usize,

    /// Units that may act in a single turn
    pub max_selected: usize,

    /// Items offered per shop
    pub shop_slots: usize,

    /// Rerolls granted per rank before bonuses
    pub base_rerolls: u32,

    /// Cost of the first paid shop refresh
    pub refresh_base_cost: u64,

    /// Added to the refresh cost for every paid refresh since the last combat
    pub refresh_cost_step: u64,

    /// Consumables the player may carry
    pub consumable_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_gold: STARTING_GOLD,
            max_rounds: MAX_ROUNDS,
            combat_pool_size: COMBAT_POOL_SIZE,
            max_selected: MAX_SELECTED_UNITS,
            shop_slots: SHOP_SLOTS,
            base_rerolls: BASE_REROLLS_PER_RANK,
            refresh_base_cost: REFRESH_BASE_COST,
            refresh_cost_step: REFRESH_COST_STEP,
            consumable_capacity: CONSUMABLE_CAPACITY,
        }
    }
}

impl GameConfig {
    /// Parses a (possibly partial) JSON config document.
    pub fn from_json_str(json: &str) -> GameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a config file, returning the defaults if it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json_str(&json).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}
