use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::boss::BossMechanicKind;
use crate::bonuses::BonusEffect;
use crate::ranks::Rank;
use crate::synergy::ActiveSynergy;
use crate::units::UnitId;

/// The boss of the current fight, with its mechanic already decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossEncounter {
    pub name: String,
    pub mechanic: BossMechanicKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatOutcome {
    Victory,
    Defeat,
}

/// State of the current (or last) combat.
///
/// `is_active` holds only between start and resolution. `total_damage`
/// never decreases within a combat and `round` grows by one per turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatState {
    pub target_damage: u64,
    pub total_damage: u64,
    pub round: u32,
    pub max_rounds: u32,
    pub is_active: bool,
    pub boss: Option<BossEncounter>,
    /// Set by selling a bonus mid-combat; cleared only when a combat starts.
    pub bonus_sold_this_combat: bool,
    /// Units available to act this turn, in draw order.
    pub combat_pool: Vec<UnitId>,
    pub used_unit_ids: BTreeSet<UnitId>,
    pub outcome: Option<CombatOutcome>,
}

impl Default for CombatState {
    fn default() -> Self {
        Self {
            target_damage: 0,
            total_damage: 0,
            round: 0,
            max_rounds: crate::core::constants::MAX_ROUNDS,
            is_active: false,
            boss: None,
            bonus_sold_this_combat: false,
            combat_pool: Vec::new(),
            used_unit_ids: BTreeSet::new(),
            outcome: None,
        }
    }
}

impl CombatState {
    pub fn is_boss_fight(&self) -> bool {
        self.boss.is_some()
    }

    pub fn boss_name(&self) -> Option<&str> {
        self.boss.as_ref().map(|b| b.name.as_str())
    }

    pub fn boss_mechanic(&self) -> Option<&BossMechanicKind> {
        self.boss.as_ref().map(|b| &b.mechanic)
    }

    /// Whether an unsold sealing boss currently blocks damage and rerolls.
    pub fn is_sealed(&self) -> bool {
        self.boss_mechanic()
            .is_some_and(|m| crate::boss::suppresses_turn(m, self.bonus_sold_this_combat))
    }

    pub fn remaining_damage(&self) -> u64 {
        self.target_damage.saturating_sub(self.total_damage)
    }
}

/// Final damage and multiplier of one unit after the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitContribution {
    pub unit_id: UnitId,
    pub name: String,
    pub damage: u64,
    pub multiplier: u64,
}

/// Gold and rank changes from a won combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictoryRewards {
    pub base_gold: u64,
    pub wealth_bonus: u64,
    pub equipment_gold: u64,
    pub previous_rank: Rank,
    pub new_rank: Rank,
    pub game_completed: bool,
}

impl VictoryRewards {
    pub fn total_gold(&self) -> u64 {
        self.base_gold + self.wealth_bonus + self.equipment_gold
    }
}

/// Everything a caller needs to present one resolved turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub round: u32,
    pub turn_damage: u64,
    pub total_damage: u64,
    pub target_damage: u64,
    pub synergies_active: Vec<ActiveSynergy>,
    pub bonuses_active: Vec<BonusEffect>,
    pub contributions: Vec<UnitContribution>,
    /// The turn was zeroed by a sealing boss.
    pub suppressed: bool,
    pub combat_over: bool,
    pub victory: Option<bool>,
    pub rewards: Option<VictoryRewards>,
}
