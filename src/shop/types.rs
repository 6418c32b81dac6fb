use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::consumables::ConsumableKind;
use crate::items::Rarity;
use crate::units::TypeTag;

/// Broad item category, used for type-balanced selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopCategory {
    Unit,
    Bonus,
    Consumable,
}

/// What buying a shop item grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopOffer {
    Unit { name: String, element: TypeTag },
    Bonus { bonus_id: String },
    Consumable { kind: ConsumableKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub rarity: Rarity,
    pub price: u64,
    pub offer: ShopOffer,
}

impl ShopItem {
    pub fn category(&self) -> ShopCategory {
        match self.offer {
            ShopOffer::Unit { .. } => ShopCategory::Unit,
            ShopOffer::Bonus { .. } => ShopCategory::Bonus,
            ShopOffer::Consumable { .. } => ShopCategory::Consumable,
        }
    }

    /// True when both items grant the same unit archetype, bonus or consumable kind.
    pub fn same_offer_as(&self, other: &ShopItem) -> bool {
        match (&self.offer, &other.offer) {
            (ShopOffer::Unit { name: a, .. }, ShopOffer::Unit { name: b, .. }) => a == b,
            (ShopOffer::Bonus { bonus_id: a }, ShopOffer::Bonus { bonus_id: b }) => a == b,
            (ShopOffer::Consumable { kind: a }, ShopOffer::Consumable { kind: b }) => a == b,
            _ => false,
        }
    }
}

/// One generated shop offer plus what has been bought from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopSession {
    pub items: Vec<ShopItem>,
    pub purchased_bonus_ids: BTreeSet<String>,
    pub purchased_unit_names: BTreeSet<String>,
    pub purchased_consumables: BTreeSet<ConsumableKind>,
}

impl ShopSession {
    pub fn new(items: Vec<ShopItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn is_purchased(&self, item: &ShopItem) -> bool {
        match &item.offer {
            ShopOffer::Unit { name, .. } => self.purchased_unit_names.contains(name),
            ShopOffer::Bonus { bonus_id } => self.purchased_bonus_ids.contains(bonus_id),
            ShopOffer::Consumable { kind } => self.purchased_consumables.contains(kind),
        }
    }

    pub fn record_purchase(&mut self, item: &ShopItem) {
        match &item.offer {
            ShopOffer::Unit { name, .. } => {
                self.purchased_unit_names.insert(name.clone());
            }
            ShopOffer::Bonus { bonus_id } => {
                self.purchased_bonus_ids.insert(bonus_id.clone());
            }
            ShopOffer::Consumable { kind } => {
                self.purchased_consumables.insert(kind.clone());
            }
        }
    }
}
