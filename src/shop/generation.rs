//! Builds the full set of purchasable items for a shop refresh.

use rand::Rng;

use super::consumables::{roll_shop_consumable, ConsumableKind};
use super::pricing::{bonus_definition_price, consumable_price, unit_template_price};
use super::selection::select_shop_items;
use super::types::{ShopItem, ShopOffer, ShopSession};
use crate::bonuses::{all_bonus_definitions, BonusDefinition};
use crate::core::constants::{SHOP_MAX_CONSUMABLES, SHOP_MIN_CONSUMABLES};
use crate::units::{all_unit_templates, random_element, TypeTag, UnitTemplate};

pub fn unit_item(template: &UnitTemplate, element: TypeTag) -> ShopItem {
    ShopItem {
        name: template.name.to_string(),
        icon: template.icon.to_string(),
        rarity: template.rarity,
        price: unit_template_price(template),
        offer: ShopOffer::Unit {
            name: template.name.to_string(),
            element,
        },
    }
}

pub fn bonus_item(def: &BonusDefinition) -> ShopItem {
    ShopItem {
        name: def.name.to_string(),
        icon: def.icon.to_string(),
        rarity: def.rarity,
        price: bonus_definition_price(def),
        offer: ShopOffer::Bonus {
            bonus_id: def.id.to_string(),
        },
    }
}

pub fn consumable_item(kind: ConsumableKind) -> ShopItem {
    let rarity = kind.rarity();
    ShopItem {
        name: kind.name(),
        icon: kind.icon().to_string(),
        rarity,
        price: consumable_price(rarity),
        offer: ShopOffer::Consumable { kind },
    }
}

/// Every catalog unit (each with a random element), every catalog bonus,
/// and 2–3 rolled consumables.
pub fn generate_shop_universe(rng: &mut impl Rng) -> Vec<ShopItem> {
    let mut items: Vec<ShopItem> = all_unit_templates()
        .iter()
        .map(|template| {
            let element = random_element(rng);
            unit_item(template, element)
        })
        .collect();

    items.extend(all_bonus_definitions().iter().map(bonus_item));

    let consumable_count = rng.gen_range(SHOP_MIN_CONSUMABLES..=SHOP_MAX_CONSUMABLES);
    for _ in 0..consumable_count {
        items.push(consumable_item(roll_shop_consumable(rng)));
    }
    items
}

/// Generates a fresh shop session with `slots` items.
pub fn generate_shop(slots: usize, rng: &mut impl Rng) -> ShopSession {
    let universe = generate_shop_universe(rng);
    let items = select_shop_items(&universe, slots, rng);
    tracing::debug!(
        offered = items.len(),
        universe = universe.len(),
        "Generated shop"
    );
    ShopSession::new(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::ShopCategory;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_universe_contains_every_unit_and_bonus() {
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let universe = generate_shop_universe(&mut rng);
        let units = universe
            .iter()
            .filter(|i| i.category() == ShopCategory::Unit)
            .count();
        let bonuses = universe
            .iter()
            .filter(|i| i.category() == ShopCategory::Bonus)
            .count();
        let consumables = universe
            .iter()
            .filter(|i| i.category() == ShopCategory::Consumable)
            .count();
        assert_eq!(units, all_unit_templates().len());
        assert_eq!(bonuses, all_bonus_definitions().len());
        assert!((2..=3).contains(&consumables));
    }

    #[test]
    fn test_items_are_priced() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let universe = generate_shop_universe(&mut rng);
        assert!(universe.iter().all(|i| i.price > 0));
    }

    #[test]
    fn test_generate_shop_fills_slots() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let session = generate_shop(5, &mut rng);
        assert_eq!(session.items.len(), 5);
        assert!(session.purchased_bonus_ids.is_empty());
    }
}
