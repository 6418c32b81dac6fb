//! Recruitable unit archetypes.

use std::collections::BTreeSet;

use rand::Rng;

use super::types::TypeTag::{Healer, Magic, Melee, Physical, Ranged};
use super::types::{TypeTag, UnitId, UnitInstance};
use crate::items::Rarity;

/// Static definition of a unit archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitTemplate {
    pub name: &'static str,
    pub icon: &'static str,
    pub tags: &'static [TypeTag],
    pub damage: u64,
    pub multiplier: u64,
    pub rarity: Rarity,
    /// Copies seeded into a new squad.
    pub base_quantity: u32,
}

impl UnitTemplate {
    /// Builds an instance carrying this archetype's tags plus one element.
    pub fn instantiate(&self, id: UnitId, element: TypeTag) -> UnitInstance {
        let mut tags: BTreeSet<TypeTag> = self.tags.iter().copied().collect();
        tags.insert(element);
        UnitInstance {
            id,
            name: self.name.to_string(),
            tags,
            base_damage: self.damage,
            base_multiplier: self.multiplier,
            rarity: self.rarity,
            icon: self.icon.to_string(),
        }
    }
}

const fn unit(
    name: &'static str,
    icon: &'static str,
    tags: &'static [TypeTag],
    damage: u64,
    multiplier: u64,
    rarity: Rarity,
    base_quantity: u32,
) -> UnitTemplate {
    UnitTemplate {
        name,
        icon,
        tags,
        damage,
        multiplier,
        rarity,
        base_quantity,
    }
}

pub const UNIT_TEMPLATES: &[UnitTemplate] = &[
    unit("Swordsman", "⚔️", &[Melee, Physical], 5, 2, Rarity::Common, 5),
    unit("Archer", "🏹", &[Ranged, Physical], 4, 3, Rarity::Common, 5),
    unit("Blue Mage", "🔮", &[Ranged, Magic], 3, 4, Rarity::Uncommon, 5),
    unit("Lancer", "🔱", &[Melee, Physical], 4, 3, Rarity::Common, 5),
    unit("Peasant", "👨‍🌾", &[Melee], 2, 2, Rarity::Common, 5),
    unit("Healer", "💚", &[Magic, Healer], 1, 1, Rarity::Common, 5),
    unit("Red Mage", "🔥", &[Ranged], 6, 2, Rarity::Uncommon, 0),
    unit("Barbarian", "🪓", &[Physical], 7, 3, Rarity::Uncommon, 0),
    unit("Viking", "🛡️", &[Melee], 6, 3, Rarity::Uncommon, 0),
    unit("Paladin", "⚜️", &[Melee], 8, 4, Rarity::Rare, 0),
    unit("Assassin", "🗡️", &[Physical], 3, 6, Rarity::Rare, 0),
    unit("Mage", "🧙", &[Magic], 5, 4, Rarity::Rare, 0),
    unit("Slinger", "🪨", &[Ranged], 3, 5, Rarity::Rare, 0),
    unit("Knight", "🐎", &[Melee], 10, 3, Rarity::Epic, 0),
    unit("Crossbowman", "🎯", &[Ranged], 7, 4, Rarity::Epic, 0),
    unit("Sorcerer", "🌀", &[Magic], 5, 5, Rarity::Epic, 0),
    unit("Berserker", "😡", &[Physical], 9, 3, Rarity::Epic, 0),
    unit("Elite Archer", "🏹", &[Physical], 11, 6, Rarity::Legendary, 0),
    unit("Supreme Mage", "✨", &[Magic], 17, 4, Rarity::Legendary, 0),
    unit("Champion", "🏆", &[Melee], 22, 3, Rarity::Legendary, 0),
];

pub fn all_unit_templates() -> &'static [UnitTemplate] {
    UNIT_TEMPLATES
}

/// Looks up an archetype by name.
pub fn get_unit_template(name: &str) -> Option<&'static UnitTemplate> {
    UNIT_TEMPLATES.iter().find(|t| t.name == name)
}

pub fn random_element(rng: &mut impl Rng) -> TypeTag {
    TypeTag::ELEMENTS[rng.gen_range(0..TypeTag::ELEMENTS.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_unique() {
        let names: HashSet<&str> = UNIT_TEMPLATES.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), UNIT_TEMPLATES.len());
    }

    #[test]
    fn test_every_rarity_represented() {
        for rarity in Rarity::ALL {
            assert!(
                UNIT_TEMPLATES.iter().any(|t| t.rarity == rarity),
                "no unit of rarity {:?}",
                rarity
            );
        }
    }

    #[test]
    fn test_starting_supply_is_thirty_units() {
        let total: u32 = UNIT_TEMPLATES.iter().map(|t| t.base_quantity).sum();
        assert_eq!(total, 30);
    }

    #[test]
    fn test_templates_carry_no_element() {
        for template in UNIT_TEMPLATES {
            assert!(template.tags.iter().all(|t| !t.is_element()), "{}", template.name);
        }
    }

    #[test]
    fn test_instantiate_adds_element() {
        let template = get_unit_template("Swordsman").unwrap();
        let unit = template.instantiate(UnitId(7), TypeTag::Water);
        assert_eq!(unit.id, UnitId(7));
        assert_eq!(unit.base_damage, 5);
        assert_eq!(unit.base_multiplier, 2);
        assert!(unit.has_type(TypeTag::Melee));
        assert!(unit.has_type(TypeTag::Physical));
        assert_eq!(unit.element(), Some(TypeTag::Water));
    }

    #[test]
    fn test_unknown_template() {
        assert!(get_unit_template("Dragon Rider").is_none());
    }
}
