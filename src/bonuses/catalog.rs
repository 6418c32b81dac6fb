//! Equipment bonus definitions.

use serde::{Deserialize, Serialize};

use crate::core::constants::{TRIGGER_END_OF_COMBAT, TRIGGER_MELEE_FORMATION};
use crate::items::Rarity;
use crate::units::TagTarget::{self, All, Tag};
use crate::units::TypeTag::{self, *};

/// What a dynamic bonus grows into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DynamicYield {
    Multiplier(TagTarget),
    Gold,
}

/// A single-copy bonus whose value is `base + counter × per_trigger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicSpec {
    pub trigger: &'static str,
    pub base: u64,
    pub per_trigger: u64,
    pub yields: DynamicYield,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusKind {
    /// Per-copy flat damage and multiplier for matching units.
    Stats {
        damage: u64,
        multiplier: u64,
        target: TagTarget,
    },
    /// Per-copy gold at the end of a won combat.
    Gold { amount: u64 },
    /// One extra reroll per copy, every rank.
    ExtraReroll,
    /// Per-copy damage to every unit for each reroll still available.
    DamagePerReroll { damage: u64 },
    /// Multiplies the multiplier of the unit in a fixed squad slot by `1 + copies`.
    PositionMultiplier { slot: usize },
    /// Units of either element also count as the other.
    ElementFusion { first: TypeTag, second: TypeTag },
    Dynamic(DynamicSpec),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonusDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub rarity: Rarity,
    pub base_price: u64,
    pub kind: BonusKind,
}

impl BonusDefinition {
    pub fn is_dynamic(&self) -> bool {
        matches!(self.kind, BonusKind::Dynamic(_))
    }

    pub fn description(&self) -> String {
        match self.kind {
            BonusKind::Stats {
                damage,
                multiplier,
                target,
            } => match (damage, multiplier) {
                (0, m) => format!("+{} multiplier for {}", m, target),
                (d, 0) => format!("+{} damage for {}", d, target),
                (d, m) => format!("+{} damage and +{} multiplier for {}", d, m, target),
            },
            BonusKind::Gold { amount } => format!("+{} gold per won combat", amount),
            BonusKind::ExtraReroll => "+1 reroll per rank".to_string(),
            BonusKind::DamagePerReroll { damage } => {
                format!("+{} damage for all units per remaining reroll", damage)
            }
            BonusKind::PositionMultiplier { slot } => {
                format!("Multiplier of the unit in slot {} doubles per copy", slot + 1)
            }
            BonusKind::ElementFusion { first, second } => {
                format!("{} and {} units count as both elements", first, second)
            }
            BonusKind::Dynamic(spec) => match spec.yields {
                DynamicYield::Multiplier(target) => format!(
                    "+{} multiplier for {}, +{} each time {} triggers",
                    spec.base, target, spec.per_trigger, spec.trigger
                ),
                DynamicYield::Gold => format!(
                    "+{} gold per won combat, +{} after every won combat",
                    spec.base, spec.per_trigger
                ),
            },
        }
    }
}

const fn stats(damage: u64, multiplier: u64, target: TagTarget) -> BonusKind {
    BonusKind::Stats {
        damage,
        multiplier,
        target,
    }
}

const fn bonus(
    id: &'static str,
    name: &'static str,
    icon: &'static str,
    rarity: Rarity,
    base_price: u64,
    kind: BonusKind,
) -> BonusDefinition {
    BonusDefinition {
        id,
        name,
        icon,
        rarity,
        base_price,
        kind,
    }
}

const fn fusion(first: TypeTag, second: TypeTag) -> BonusKind {
    BonusKind::ElementFusion { first, second }
}

pub const BONUS_DEFINITIONS: &[BonusDefinition] = &[
    // Common
    bonus("gold_bonus", "Gold Bonus", "💰", Rarity::Common, 30, BonusKind::Gold { amount: 25 }),
    bonus("melee_bonus", "Melee Training", "⚔️", Rarity::Common, 30, stats(10, 0, Tag(Melee))),
    bonus("ranged_bonus", "Ranged Training", "🏹", Rarity::Common, 30, stats(10, 0, Tag(Ranged))),
    bonus("magic_bonus", "Arcane Training", "🔮", Rarity::Common, 30, stats(10, 0, Tag(Magic))),
    bonus(
        "attack_per_reroll",
        "Patient Blade",
        "🎲",
        Rarity::Common,
        35,
        BonusKind::DamagePerReroll { damage: 2 },
    ),
    bonus("sharp_sword", "Sharp Sword", "🗡️", Rarity::Common, 25, stats(2, 0, Tag(Melee))),
    bonus("reinforced_bow", "Reinforced Bow", "🎯", Rarity::Common, 25, stats(2, 0, Tag(Ranged))),
    bonus("magic_grimoire", "Magic Grimoire", "📖", Rarity::Common, 25, stats(2, 0, Tag(Magic))),
    // Uncommon
    bonus("strength_amulet", "Strength Amulet", "📿", Rarity::Uncommon, 40, stats(0, 1, Tag(Melee))),
    bonus("precision_crystal", "Precision Crystal", "💎", Rarity::Uncommon, 40, stats(0, 1, Tag(Ranged))),
    bonus("mystic_orb", "Mystic Orb", "🔵", Rarity::Uncommon, 40, stats(0, 1, Tag(Magic))),
    bonus("strength_potion", "Strength Potion", "🧪", Rarity::Uncommon, 40, stats(3, 0, All)),
    bonus("power_elixir", "Power Elixir", "⚗️", Rarity::Uncommon, 40, stats(0, 1, All)),
    bonus("extra_reroll", "Lucky Die", "🎰", Rarity::Uncommon, 50, BonusKind::ExtraReroll),
    // Rare
    bonus("legendary_armor", "Legendary Armor", "🛡️", Rarity::Rare, 60, stats(5, 2, Tag(Melee))),
    bonus("divine_bow", "Divine Bow", "🏹", Rarity::Rare, 60, stats(5, 2, Tag(Ranged))),
    bonus("supreme_wand", "Supreme Wand", "🪄", Rarity::Rare, 60, stats(5, 2, Tag(Magic))),
    bonus("fire_bonus", "Fire Sigil", "🔥", Rarity::Rare, 60, stats(0, 4, Tag(Fire))),
    bonus("water_bonus", "Water Sigil", "💧", Rarity::Rare, 60, stats(0, 4, Tag(Water))),
    bonus("earth_bonus", "Earth Sigil", "🪨", Rarity::Rare, 60, stats(0, 4, Tag(Earth))),
    bonus("air_bonus", "Air Sigil", "🌪️", Rarity::Rare, 60, stats(0, 4, Tag(Air))),
    bonus("darkness_bonus", "Darkness Sigil", "🌑", Rarity::Rare, 60, stats(0, 4, Tag(Darkness))),
    bonus("light_bonus", "Light Sigil", "☀️", Rarity::Rare, 60, stats(0, 4, Tag(Light))),
    // Epic
    bonus(
        "melee_is_life",
        "Melee Is Life",
        "❤️‍🔥",
        Rarity::Epic,
        80,
        BonusKind::Dynamic(DynamicSpec {
            trigger: TRIGGER_MELEE_FORMATION,
            base: 1,
            per_trigger: 2,
            yields: DynamicYield::Multiplier(Tag(Melee)),
        }),
    ),
    bonus(
        "lifetime_savings",
        "Lifetime Savings",
        "🏦",
        Rarity::Epic,
        80,
        BonusKind::Dynamic(DynamicSpec {
            trigger: TRIGGER_END_OF_COMBAT,
            base: 7,
            per_trigger: 3,
            yields: DynamicYield::Gold,
        }),
    ),
    bonus("fusion_fire_water", "Steam Fusion", "♨️", Rarity::Epic, 120, fusion(Fire, Water)),
    bonus("fusion_earth_air", "Dust Fusion", "🌫️", Rarity::Epic, 120, fusion(Earth, Air)),
    bonus(
        "fusion_light_darkness",
        "Twilight Fusion",
        "🌗",
        Rarity::Epic,
        120,
        fusion(Light, Darkness),
    ),
    // Legendary
    bonus("ancient_relic", "Ancient Relic", "🏺", Rarity::Legendary, 100, stats(10, 3, All)),
    bonus(
        "position_four",
        "Fourth Banner",
        "🚩",
        Rarity::Legendary,
        120,
        BonusKind::PositionMultiplier {
            slot: crate::core::constants::POSITION_BONUS_SLOT,
        },
    ),
];

pub fn all_bonus_definitions() -> &'static [BonusDefinition] {
    BONUS_DEFINITIONS
}

pub fn get_bonus_definition(id: &str) -> Option<&'static BonusDefinition> {
    BONUS_DEFINITIONS.iter().find(|b| b.id == id)
}

pub fn is_valid_bonus_id(id: &str) -> bool {
    get_bonus_definition(id).is_some()
}
