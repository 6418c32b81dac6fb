//! The composition root: owns the state, the random source and the
//! notification sink, and exposes every player-facing operation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::GameConfig;
use super::error::{GameError, GameResult};
use super::game_state::GameState;
use super::notify::{Notification, NotificationSink, TracingSink};
use super::persistence::{deserialize_state, serialize_state, SaveStore};
use crate::bonuses::{apply_element_fusions, element_fusions, get_bonus_definition, UnlockOutcome};
use crate::combat::{self, CombatState, TurnReport};
use crate::shop::{
    bonus_price, generate_shop, refresh_cost, sell_price, ConsumableId, ConsumableInstance,
    ConsumableKind, ConsumableTarget, ShopItem, ShopOffer,
};
use crate::synergy::{compute_synergies, ActiveSynergy};
use crate::units::{get_unit_template, UnitId, UnitInstance};

/// What a successful purchase granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseReceipt {
    Unit { unit_id: UnitId, price: u64 },
    Bonus { outcome: UnlockOutcome, price: u64 },
    Consumable { id: ConsumableId, price: u64 },
}

impl PurchaseReceipt {
    pub fn price(&self) -> u64 {
        match self {
            PurchaseReceipt::Unit { price, .. }
            | PurchaseReceipt::Bonus { price, .. }
            | PurchaseReceipt::Consumable { price, .. } => *price,
        }
    }
}

/// What using a consumable did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumableOutcome {
    ShopRefreshed,
    Transformed { from: UnitId, to: UnitId },
    SynergyUpgraded { name: String, level: u32 },
    Duplicated { original: UnitId, copy: UnitId },
}

pub struct GameSession<R: Rng = StdRng, S: NotificationSink = TracingSink> {
    state: GameState,
    rng: R,
    sink: S,
}

impl GameSession<StdRng, TracingSink> {
    /// New game with a seeded random source and tracing notifications.
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed), TracingSink)
    }
}

impl<R: Rng, S: NotificationSink> GameSession<R, S> {
    pub fn new(config: GameConfig, mut rng: R, sink: S) -> Self {
        let state = GameState::new_game(config, &mut rng);
        tracing::info!(session = %state.session_id, units = state.roster.len(), "New game");
        Self { state, rng, sink }
    }

    /// Resumes from an existing state.
    pub fn from_state(state: GameState, rng: R, sink: S) -> Self {
        Self { state, rng, sink }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    fn notify(&mut self, notification: Notification) {
        self.sink.notify(notification);
    }

    /// Reports a failed action to the sink and hands the error back.
    fn reject<T>(&mut self, action: &str, error: GameError) -> GameResult<T> {
        tracing::warn!(action, error = %error, "Action rejected");
        self.notify(Notification::rejected(action, &error));
        Err(error)
    }

    // ---- Combat ----

    /// Starts a combat. `boss_override` forces a boss (`Some(true)`) or a
    /// normal fight (`Some(false)`); `None` lets the rank decide.
    pub fn start_combat(&mut self, boss_override: Option<bool>) -> GameResult<CombatState> {
        match combat::start_combat(&mut self.state, boss_override, &mut self.rng) {
            Ok(combat) => {
                self.notify(Notification::CombatStarted {
                    target_damage: combat.target_damage,
                    boss: combat.boss_name().map(str::to_string),
                });
                Ok(combat)
            }
            Err(e) => self.reject("Start combat", e),
        }
    }

    /// Units currently available to act, in pool order.
    pub fn combat_pool(&self) -> Vec<&UnitInstance> {
        self.state
            .combat
            .combat_pool
            .iter()
            .filter_map(|id| self.state.roster.get(*id))
            .collect()
    }

    /// Synergies the current combat pool would trigger, for display.
    pub fn preview_synergies(&self) -> Vec<ActiveSynergy> {
        let pool: Vec<UnitInstance> = self.combat_pool().into_iter().cloned().collect();
        let fusions = element_fusions(&self.state.equipment_effects());
        compute_synergies(&apply_element_fusions(&pool, &fusions), &self.state.synergy_levels)
    }

    /// Resolves one turn; victory or defeat is applied as soon as the
    /// combat ends.
    pub fn resolve_turn(&mut self, selected: &[UnitId]) -> GameResult<TurnReport> {
        let previous_rank = self.state.rank;
        let report = match combat::resolve_turn(&mut self.state, selected, &mut self.rng) {
            Ok(report) => report,
            Err(e) => return self.reject("Resolve turn", e),
        };

        self.notify(Notification::TurnResolved {
            round: report.round,
            turn_damage: report.turn_damage,
            total_damage: report.total_damage,
        });
        match (&report.victory, &report.rewards) {
            (Some(true), Some(rewards)) => {
                self.notify(Notification::CombatWon {
                    gold_gained: rewards.total_gold(),
                    new_rank: rewards.new_rank.to_string(),
                });
                if rewards.new_rank != previous_rank {
                    self.notify(Notification::RankUp {
                        from: previous_rank.to_string(),
                        to: rewards.new_rank.to_string(),
                    });
                }
                if rewards.game_completed {
                    self.notify(Notification::GameCompleted);
                }
            }
            (Some(false), _) => self.notify(Notification::CombatLost {
                total_damage: report.total_damage,
                target_damage: report.target_damage,
            }),
            _ => {}
        }
        Ok(report)
    }

    /// Swaps pool units for random unused squad units.
    pub fn reroll(&mut self, ids: &[UnitId]) -> GameResult<Vec<UnitId>> {
        match combat::reroll(&mut self.state, ids, &mut self.rng) {
            Ok(replaced) => {
                self.notify(Notification::Rerolled {
                    count: replaced.len(),
                    remaining: self.state.remaining_rerolls(),
                });
                Ok(replaced)
            }
            Err(e) => self.reject("Reroll", e),
        }
    }

    // ---- Shop ----

    /// The current shop offer, generating one if none is cached.
    pub fn generate_shop(&mut self) -> Vec<ShopItem> {
        if self.state.shop.is_none() {
            let slots = self.state.config.shop_slots;
            self.state.shop = Some(generate_shop(slots, &mut self.rng));
        }
        self.state
            .shop
            .as_ref()
            .map(|s| s.items.clone())
            .unwrap_or_default()
    }

    /// Cost of the next paid refresh.
    pub fn next_refresh_cost(&self) -> u64 {
        refresh_cost(&self.state.config, self.state.shop_refresh_count)
    }

    /// Pays for a new shop offer and returns the cost.
    pub fn refresh_shop(&mut self) -> GameResult<u64> {
        let cost = self.next_refresh_cost();
        if let Err(e) = self.state.spend_gold(cost) {
            return self.reject("Refresh shop", e);
        }
        self.state.shop_refresh_count += 1;
        let slots = self.state.config.shop_slots;
        self.state.shop = Some(generate_shop(slots, &mut self.rng));
        self.notify(Notification::ShopRefreshed { cost });
        Ok(cost)
    }

    /// Buys the item in `slot` of the current shop.
    pub fn purchase(&mut self, slot: usize) -> GameResult<PurchaseReceipt> {
        match self.try_purchase(slot) {
            Ok(receipt) => Ok(receipt),
            Err(e) => self.reject("Purchase", e),
        }
    }

    fn try_purchase(&mut self, slot: usize) -> GameResult<PurchaseReceipt> {
        self.generate_shop();
        let shop = self
            .state
            .shop
            .as_ref()
            .ok_or(GameError::InvalidShopSlot(slot))?;
        let item = shop
            .items
            .get(slot)
            .cloned()
            .ok_or(GameError::InvalidShopSlot(slot))?;
        if shop.is_purchased(&item) {
            return Err(GameError::DuplicatePurchaseInSession(item.name.clone()));
        }

        // Validate everything before any gold moves.
        match &item.offer {
            ShopOffer::Unit { name, .. } => {
                get_unit_template(name).ok_or_else(|| GameError::UnknownArchetype(name.clone()))?;
            }
            ShopOffer::Bonus { bonus_id } => {
                get_bonus_definition(bonus_id)
                    .ok_or_else(|| GameError::InvalidBonusId(bonus_id.clone()))?;
            }
            ShopOffer::Consumable { .. } => {
                let capacity = self.state.config.consumable_capacity;
                if self.state.consumables.len() >= capacity {
                    return Err(GameError::InventoryFull { capacity });
                }
            }
        }
        self.state.spend_gold(item.price)?;

        let receipt = match &item.offer {
            ShopOffer::Unit { name, element } => {
                let template =
                    get_unit_template(name).ok_or_else(|| GameError::UnknownArchetype(name.clone()))?;
                let unit_id = self.state.roster.recruit(template, *element);
                PurchaseReceipt::Unit {
                    unit_id,
                    price: item.price,
                }
            }
            ShopOffer::Bonus { bonus_id } => {
                let outcome = self.state.bonuses.unlock(bonus_id)?;
                PurchaseReceipt::Bonus {
                    outcome,
                    price: item.price,
                }
            }
            ShopOffer::Consumable { kind } => {
                let consumable = ConsumableInstance::new(kind.clone(), &mut self.rng);
                let id = consumable.id;
                self.state.consumables.push(consumable);
                PurchaseReceipt::Consumable {
                    id,
                    price: item.price,
                }
            }
        };

        if let Some(shop) = self.state.shop.as_mut() {
            shop.record_purchase(&item);
        }
        tracing::info!(item = %item.name, price = item.price, gold = self.state.gold, "Purchased");
        self.notify(Notification::Purchased {
            name: item.name.clone(),
            price: item.price,
        });
        Ok(receipt)
    }

    /// Sells one copy of an owned bonus for half its price. Selling during
    /// a combat lifts a sealing boss for the rest of that combat.
    pub fn sell_bonus(&mut self, bonus_id: &str) -> GameResult<u64> {
        let Some(price) = bonus_price(bonus_id) else {
            return self.reject("Sell bonus", GameError::InvalidBonusId(bonus_id.to_string()));
        };
        if let Err(e) = self.state.bonuses.remove_copy(bonus_id) {
            return self.reject("Sell bonus", e);
        }
        let gold = sell_price(price);
        self.state.gold += gold;
        if self.state.combat.is_active {
            self.state.combat.bonus_sold_this_combat = true;
        }
        let name = get_bonus_definition(bonus_id)
            .map(|d| d.name.to_string())
            .unwrap_or_else(|| bonus_id.to_string());
        tracing::info!(bonus = bonus_id, gold, "Sold bonus");
        self.notify(Notification::BonusSold { name, gold });
        Ok(gold)
    }

    // ---- Consumables ----

    /// Uses a consumable from the inventory. It is removed only on success.
    pub fn use_consumable(
        &mut self,
        id: ConsumableId,
        target: ConsumableTarget,
    ) -> GameResult<ConsumableOutcome> {
        match self.try_use_consumable(id, target) {
            Ok(outcome) => Ok(outcome),
            Err(e) => self.reject("Use consumable", e),
        }
    }

    fn try_use_consumable(
        &mut self,
        id: ConsumableId,
        target: ConsumableTarget,
    ) -> GameResult<ConsumableOutcome> {
        let index = self
            .state
            .consumables
            .iter()
            .position(|c| c.id == id)
            .ok_or(GameError::UnknownConsumable(id))?;
        let kind = self.state.consumables[index].kind.clone();

        let outcome = match (&kind, target) {
            (ConsumableKind::ShopRefresh, _) => {
                let slots = self.state.config.shop_slots;
                self.state.shop = Some(generate_shop(slots, &mut self.rng));
                self.state.shop_refresh_count = 0;
                ConsumableOutcome::ShopRefreshed
            }
            (ConsumableKind::Transform { unit }, ConsumableTarget::Unit(unit_id)) => {
                let template =
                    get_unit_template(unit).ok_or_else(|| GameError::UnknownArchetype(unit.clone()))?;
                let to = self
                    .state
                    .roster
                    .transform(unit_id, template)
                    .ok_or(GameError::UnknownUnit(unit_id))?;
                self.replace_in_pool(unit_id, to);
                ConsumableOutcome::Transformed { from: unit_id, to }
            }
            (ConsumableKind::SynergyCrystal, ConsumableTarget::Synergy(name)) => {
                let level = self.state.upgrade_synergy(&name)?;
                ConsumableOutcome::SynergyUpgraded { name, level }
            }
            (ConsumableKind::DuplicationMirror, ConsumableTarget::Unit(unit_id)) => {
                let copy = self
                    .state
                    .roster
                    .duplicate(unit_id)
                    .ok_or(GameError::UnknownUnit(unit_id))?;
                ConsumableOutcome::Duplicated {
                    original: unit_id,
                    copy,
                }
            }
            _ => return Err(GameError::MissingTarget),
        };

        self.state.consumables.remove(index);
        self.notify(Notification::ConsumableUsed { name: kind.name() });
        Ok(outcome)
    }

    /// Keeps a transformed unit's place in the combat pool, and keeps it
    /// spent if it already acted this combat.
    fn replace_in_pool(&mut self, from: UnitId, to: UnitId) {
        let combat = &mut self.state.combat;
        for id in combat.combat_pool.iter_mut() {
            if *id == from {
                *id = to;
            }
        }
        if combat.used_unit_ids.remove(&from) {
            combat.used_unit_ids.insert(to);
        }
    }

    // ---- Persistence ----

    pub fn serialize_state(&self) -> GameResult<String> {
        serialize_state(&self.state)
    }

    /// Replaces the current state with a deserialized one.
    pub fn deserialize_state(&mut self, blob: &str) -> GameResult<()> {
        match deserialize_state(blob) {
            Ok(state) => {
                self.state = state;
                Ok(())
            }
            Err(e) => self.reject("Load", e),
        }
    }

    pub fn save(&self, store: &mut impl SaveStore) -> GameResult<()> {
        store.save(&self.serialize_state()?)
    }

    /// Loads from the store. Returns false when it holds no save.
    pub fn load(&mut self, store: &impl SaveStore) -> GameResult<bool> {
        match store.load()? {
            Some(blob) => {
                self.deserialize_state(&blob)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
