//! Single-use shop items.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

use crate::core::constants::SYNERGY_CRYSTAL_SHOP_CHANCE;
use crate::items::Rarity;
use crate::units::UnitId;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConsumableKind {
    /// Rerolls the shop for free and resets the refresh cost.
    ShopRefresh,
    /// Turns a squad unit into a fresh unit of the named archetype.
    Transform { unit: String },
    /// Raises one synergy's level by one.
    SynergyCrystal,
    /// Clones a squad unit.
    DuplicationMirror,
}

/// Transform consumables: (archetype, item name, icon, rarity).
pub const TRANSFORM_TARGETS: &[(&str, &str, &str, Rarity)] = &[
    ("Swordsman", "Sword", "⚔️", Rarity::Common),
    ("Archer", "Bow", "🏹", Rarity::Common),
    ("Lancer", "Spear", "🔱", Rarity::Common),
    ("Peasant", "Pitchfork", "🧑‍🌾", Rarity::Common),
    ("Blue Mage", "Blue Tome", "📘", Rarity::Uncommon),
    ("Red Mage", "Red Tome", "📕", Rarity::Uncommon),
    ("Barbarian", "War Axe", "🪓", Rarity::Rare),
    ("Sorcerer", "Sorcerer's Orb", "🔮", Rarity::Epic),
    ("Slinger", "Sling", "🪨", Rarity::Epic),
];

fn transform_entry(unit: &str) -> Option<&'static (&'static str, &'static str, &'static str, Rarity)> {
    TRANSFORM_TARGETS.iter().find(|(name, ..)| *name == unit)
}

impl ConsumableKind {
    pub fn transform(unit: &str) -> Self {
        ConsumableKind::Transform {
            unit: unit.to_string(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            ConsumableKind::ShopRefresh => "Shop Refresh".to_string(),
            ConsumableKind::Transform { unit } => transform_entry(unit)
                .map(|(_, item, ..)| item.to_string())
                .unwrap_or_else(|| format!("{} Token", unit)),
            ConsumableKind::SynergyCrystal => "Synergy Crystal".to_string(),
            ConsumableKind::DuplicationMirror => "Duplication Mirror".to_string(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ConsumableKind::ShopRefresh => "🔄",
            ConsumableKind::Transform { unit } => {
                transform_entry(unit).map(|(_, _, icon, _)| *icon).unwrap_or("🎭")
            }
            ConsumableKind::SynergyCrystal => "💠",
            ConsumableKind::DuplicationMirror => "🪞",
        }
    }

    pub fn rarity(&self) -> Rarity {
        match self {
            ConsumableKind::ShopRefresh => Rarity::Common,
            ConsumableKind::Transform { unit } => transform_entry(unit)
                .map(|(.., rarity)| *rarity)
                .unwrap_or(Rarity::Common),
            ConsumableKind::SynergyCrystal => Rarity::Rare,
            ConsumableKind::DuplicationMirror => Rarity::Legendary,
        }
    }

    pub fn description(&self) -> String {
        match self {
            ConsumableKind::ShopRefresh => "Refreshes the shop for free".to_string(),
            ConsumableKind::Transform { unit } => format!("Turns a unit into a {}", unit),
            ConsumableKind::SynergyCrystal => "Raises a synergy by one level".to_string(),
            ConsumableKind::DuplicationMirror => "Duplicates a unit".to_string(),
        }
    }

    /// Whether using it needs a follow-up choice of unit or synergy.
    pub fn needs_target(&self) -> bool {
        !matches!(self, ConsumableKind::ShopRefresh)
    }
}

/// Every consumable except the synergy crystal, which has its own shop roll.
pub fn regular_consumable_kinds() -> Vec<ConsumableKind> {
    let mut kinds = vec![ConsumableKind::ShopRefresh];
    kinds.extend(
        TRANSFORM_TARGETS
            .iter()
            .map(|(unit, ..)| ConsumableKind::transform(unit)),
    );
    kinds.push(ConsumableKind::DuplicationMirror);
    kinds
}

/// Picks a consumable for a shop: the crystal on a fixed chance, otherwise
/// uniformly among the rest.
pub fn roll_shop_consumable(rng: &mut impl Rng) -> ConsumableKind {
    if rng.gen::<f64>() < SYNERGY_CRYSTAL_SHOP_CHANCE {
        return ConsumableKind::SynergyCrystal;
    }
    let kinds = regular_consumable_kinds();
    let index = rng.gen_range(0..kinds.len());
    kinds[index].clone()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsumableId(pub Uuid);

impl ConsumableId {
    /// Random id drawn from the game's RNG so seeded runs repeat exactly.
    pub fn random(rng: &mut impl Rng) -> Self {
        ConsumableId(Builder::from_random_bytes(rng.gen()).into_uuid())
    }
}

impl fmt::Display for ConsumableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableInstance {
    pub id: ConsumableId,
    pub kind: ConsumableKind,
    #[serde(default)]
    pub rarity: Rarity,
}

impl ConsumableInstance {
    pub fn new(kind: ConsumableKind, rng: &mut impl Rng) -> Self {
        Self {
            id: ConsumableId::random(rng),
            rarity: kind.rarity(),
            kind,
        }
    }
}

/// The follow-up choice some consumables need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumableTarget {
    None,
    Unit(UnitId),
    Synergy(String),
}
