//! Samples a fixed-size shop offer from the generated universe.
//!
//! Slots are drawn by category weight without replacement; each pick makes
//! its category 30% less likely for the following draws (never below 1).
//! Any slots still empty are filled by rarity-weighted draws.

use rand::Rng;

use super::types::{ShopCategory, ShopItem};
use crate::core::constants::{
    SHOP_BONUS_WEIGHT, SHOP_CONSUMABLE_WEIGHT, SHOP_MIN_WEIGHT, SHOP_UNIT_WEIGHT, SHOP_WEIGHT_DECAY,
};
use crate::items::{roll_rarity, Rarity};

fn category_weight(category: ShopCategory) -> f64 {
    match category {
        ShopCategory::Unit => SHOP_UNIT_WEIGHT,
        ShopCategory::Bonus => SHOP_BONUS_WEIGHT,
        ShopCategory::Consumable => SHOP_CONSUMABLE_WEIGHT,
    }
}

/// Index into `weights` chosen proportionally to weight.
fn weighted_index(weights: &[f64], rng: &mut impl Rng) -> usize {
    let total: f64 = weights.iter().sum();
    let mut roll = rng.gen::<f64>() * total;
    for (i, weight) in weights.iter().enumerate() {
        if roll < *weight {
            return i;
        }
        roll -= weight;
    }
    weights.len() - 1
}

/// Makes every remaining candidate of `category` less likely, down to the floor.
fn decay_category(candidates: &mut [(&ShopItem, f64)], category: ShopCategory) {
    for (item, weight) in candidates.iter_mut() {
        if item.category() == category {
            *weight = (*weight * SHOP_WEIGHT_DECAY).max(SHOP_MIN_WEIGHT);
        }
    }
}

/// Picks up to `slots` items. Returns exactly `slots` items whenever the
/// universe holds at least that many.
pub fn select_shop_items(universe: &[ShopItem], slots: usize, rng: &mut impl Rng) -> Vec<ShopItem> {
    let mut candidates: Vec<(&ShopItem, f64)> = universe
        .iter()
        .map(|item| (item, category_weight(item.category())))
        .collect();
    let mut selected: Vec<ShopItem> = Vec::with_capacity(slots);

    while selected.len() < slots && !candidates.is_empty() {
        let weights: Vec<f64> = candidates.iter().map(|(_, w)| *w).collect();
        let index = weighted_index(&weights, rng);
        let (item, _) = candidates.remove(index);
        decay_category(&mut candidates, item.category());
        selected.push(item.clone());
    }

    fill_remaining_slots(&mut selected, universe, slots, rng);
    selected
}

/// Fills empty slots by rolling a rarity, falling back to common items and
/// then to any item. Units and bonuses already offered are never repeated.
fn fill_remaining_slots(
    selected: &mut Vec<ShopItem>,
    universe: &[ShopItem],
    slots: usize,
    rng: &mut impl Rng,
) {
    while selected.len() < slots {
        let pool: Vec<&ShopItem> = universe
            .iter()
            .filter(|item| {
                item.category() == ShopCategory::Consumable
                    || !selected.iter().any(|s| s.same_offer_as(item))
            })
            .collect();
        if pool.is_empty() {
            tracing::debug!(filled = selected.len(), "Shop universe exhausted");
            return;
        }

        let rarity = roll_rarity(rng);
        let of_rarity = |r: Rarity| -> Vec<&ShopItem> {
            pool.iter().copied().filter(|item| item.rarity == r).collect()
        };
        let mut tier = of_rarity(rarity);
        if tier.is_empty() {
            tier = of_rarity(Rarity::Common);
        }
        let item = if tier.is_empty() {
            pool[0]
        } else {
            tier[rng.gen_range(0..tier.len())]
        };
        selected.push(item.clone());
    }
}
