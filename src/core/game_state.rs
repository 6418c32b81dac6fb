//! The single source of truth for a game in progress.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

use super::config::GameConfig;
use super::error::{GameError, GameResult};
use crate::bonuses::{compute_equipment_bonuses, extra_rerolls, BonusEffect, BonusLedger};
use crate::combat::CombatState;
use crate::ranks::Rank;
use crate::shop::{ConsumableInstance, ShopSession};
use crate::synergy::get_synergy_definition;
use crate::units::Roster;

/// Plain-data game state. Every field defaults when missing from a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub session_id: Uuid,
    pub config: GameConfig,
    pub gold: u64,
    pub rank: Rank,
    pub roster: Roster,
    pub bonuses: BonusLedger,
    /// Upgrade level per synergy name; absent means level 1.
    pub synergy_levels: BTreeMap<String, u32>,
    pub consumables: Vec<ConsumableInstance>,
    pub combat: CombatState,
    /// Current shop offer, generated lazily and dropped after each combat.
    pub shop: Option<ShopSession>,
    /// Paid refreshes since the last combat ended.
    pub shop_refresh_count: u32,
    /// Reroll actions spent at the current rank.
    pub rerolls_used: u32,
    /// Boss picked for the current boss rank, kept until the rank changes.
    pub displayed_boss: Option<String>,
    pub game_completed: bool,
    pub combats_won: u32,
    pub combats_lost: u32,
}

impl Default for GameState {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            session_id: Uuid::nil(),
            gold: config.starting_gold,
            config,
            rank: Rank::FIRST,
            roster: Roster::new(),
            bonuses: BonusLedger::new(),
            synergy_levels: BTreeMap::new(),
            consumables: Vec::new(),
            combat: CombatState::default(),
            shop: None,
            shop_refresh_count: 0,
            rerolls_used: 0,
            displayed_boss: None,
            game_completed: false,
            combats_won: 0,
            combats_lost: 0,
        }
    }
}

impl GameState {
    /// Starts a new game: starting gold, rank F-, and the seeded squad.
    pub fn new_game(config: GameConfig, rng: &mut impl Rng) -> Self {
        let session_id = Builder::from_random_bytes(rng.gen()).into_uuid();
        let mut roster = Roster::new();
        roster.seed_starting_squad(rng);
        Self {
            session_id,
            gold: config.starting_gold,
            combat: CombatState {
                max_rounds: config.max_rounds,
                ..CombatState::default()
            },
            config,
            roster,
            ..Self::default()
        }
    }

    pub fn equipment_effects(&self) -> Vec<BonusEffect> {
        compute_equipment_bonuses(&self.bonuses)
    }

    /// Rerolls granted at each rank, including bonus rerolls.
    pub fn reroll_budget(&self) -> u32 {
        self.config.base_rerolls + extra_rerolls(&self.equipment_effects())
    }

    pub fn remaining_rerolls(&self) -> u32 {
        self.reroll_budget().saturating_sub(self.rerolls_used)
    }

    pub fn synergy_level(&self, name: &str) -> u32 {
        self.synergy_levels.get(name).copied().unwrap_or(1).max(1)
    }

    /// Raises a synergy's level by one and returns the new level.
    pub fn upgrade_synergy(&mut self, name: &str) -> GameResult<u32> {
        let def = get_synergy_definition(name)
            .ok_or_else(|| GameError::UnknownSynergy(name.to_string()))?;
        let level = self.synergy_level(def.name) + 1;
        self.synergy_levels.insert(def.name.to_string(), level);
        Ok(level)
    }

    pub fn spend_gold(&mut self, amount: u64) -> GameResult<()> {
        if self.gold < amount {
            return Err(GameError::InsufficientFunds {
                needed: amount,
                available: self.gold,
            });
        }
        self.gold -= amount;
        Ok(())
    }

    /// Moves to a new rank and clears everything tracked per rank.
    pub fn enter_rank(&mut self, rank: Rank) {
        if rank == self.rank {
            return;
        }
        self.rank = rank;
        self.rerolls_used = 0;
        self.displayed_boss = None;
        self.combat.used_unit_ids.clear();
    }

    /// Restores invariants after loading possibly damaged data. Returns a
    /// description of each fix applied.
    pub fn repair(&mut self) -> Vec<String> {
        let mut fixes = Vec::new();

        for id in self.bonuses.repair() {
            fixes.push(format!("removed unknown bonus '{}'", id));
        }

        let unknown: Vec<String> = self
            .synergy_levels
            .keys()
            .filter(|name| get_synergy_definition(name).is_none())
            .cloned()
            .collect();
        for name in unknown {
            self.synergy_levels.remove(&name);
            fixes.push(format!("removed unknown synergy '{}'", name));
        }
        for level in self.synergy_levels.values_mut() {
            if *level == 0 {
                *level = 1;
                fixes.push("raised synergy level 0 to 1".to_string());
            }
        }

        let reassigned = self.roster.repair();
        if reassigned > 0 {
            fixes.push(format!("reassigned {} duplicate unit ids", reassigned));
        }

        let roster = &self.roster;
        let before = self.combat.combat_pool.len();
        self.combat.combat_pool.retain(|id| roster.contains(*id));
        if self.combat.combat_pool.len() != before {
            fixes.push("dropped unknown units from the combat pool".to_string());
        }

        if self.combat.max_rounds == 0 {
            self.combat.max_rounds = self.config.max_rounds;
            fixes.push("restored combat round limit".to_string());
        }

        for fix in &fixes {
            tracing::warn!(fix = %fix, "Repaired save data");
        }
        fixes
    }
}
