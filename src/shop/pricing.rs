//! Buy, sell and refresh prices. Buying rounds up and selling rounds down.

use crate::bonuses::{get_bonus_definition, BonusDefinition};
use crate::core::config::GameConfig;
use crate::core::constants::{CONSUMABLE_BASE_PRICE, PRICE_MARKUP_PERCENT, SELL_RATIO_PERCENT};
use crate::items::Rarity;
use crate::units::{UnitInstance, UnitTemplate};

/// Applies the shop markup (×1.75), rounding up.
pub fn apply_markup(value: u64) -> u64 {
    (value * PRICE_MARKUP_PERCENT).div_ceil(100)
}

/// `ceil((rarity base + floor((damage + multiplier) / 2)) × 1.75)`
pub fn unit_price(rarity: Rarity, damage: u64, multiplier: u64) -> u64 {
    apply_markup(rarity.base_price() + (damage + multiplier) / 2)
}

pub fn unit_template_price(template: &UnitTemplate) -> u64 {
    unit_price(template.rarity, template.damage, template.multiplier)
}

pub fn unit_instance_price(unit: &UnitInstance) -> u64 {
    unit_price(unit.rarity, unit.base_damage, unit.base_multiplier)
}

pub fn bonus_definition_price(def: &BonusDefinition) -> u64 {
    apply_markup(def.base_price)
}

/// Price of a bonus by id, `None` for ids not in the catalog.
pub fn bonus_price(bonus_id: &str) -> Option<u64> {
    get_bonus_definition(bonus_id).map(bonus_definition_price)
}

/// `ceil(15 × rarity factor)`
pub fn consumable_price(rarity: Rarity) -> u64 {
    (CONSUMABLE_BASE_PRICE * rarity.price_factor_percent()).div_ceil(100)
}

/// Half the buy price, rounded down.
pub fn sell_price(buy_price: u64) -> u64 {
    buy_price * SELL_RATIO_PERCENT / 100
}

/// Cost of the next paid refresh after `refresh_count` paid refreshes.
pub fn refresh_cost(config: &GameConfig, refresh_count: u32) -> u64 {
    config.refresh_base_cost + config.refresh_cost_step * u64::from(refresh_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::get_unit_template;

    #[test]
    fn test_unit_price_formula() {
        // Swordsman: ceil((10 + floor(7/2)) * 1.75) = ceil(22.75) = 23
        let swordsman = get_unit_template("Swordsman").unwrap();
        assert_eq!(unit_template_price(swordsman), 23);
        // Champion: ceil((80 + floor(25/2)) * 1.75) = ceil(161.0) = 161
        let champion = get_unit_template("Champion").unwrap();
        assert_eq!(unit_template_price(champion), 161);
    }

    #[test]
    fn test_bonus_price() {
        assert_eq!(bonus_price("gold_bonus"), Some(53));
        assert_eq!(bonus_price("ancient_relic"), Some(175));
        assert_eq!(bonus_price("missing"), None);
    }

    #[test]
    fn test_consumable_price() {
        assert_eq!(consumable_price(Rarity::Common), 15);
        assert_eq!(consumable_price(Rarity::Uncommon), 23);
        assert_eq!(consumable_price(Rarity::Legendary), 75);
    }

    #[test]
    fn test_sell_price_rounds_down() {
        assert_eq!(sell_price(53), 26);
        assert_eq!(sell_price(0), 0);
        assert_eq!(sell_price(1), 0);
    }

    #[test]
    fn test_buy_price_monotone_in_rarity() {
        for pair in Rarity::ALL.windows(2) {
            assert!(unit_price(pair[0], 5, 3) <= unit_price(pair[1], 5, 3));
            assert!(consumable_price(pair[0]) <= consumable_price(pair[1]));
        }
    }

    #[test]
    fn test_refresh_cost_escalates() {
        let config = GameConfig::default();
        assert_eq!(refresh_cost(&config, 0), 10);
        assert_eq!(refresh_cost(&config, 1), 15);
        assert_eq!(refresh_cost(&config, 4), 30);
    }
}
