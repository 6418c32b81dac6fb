use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::items::Rarity;

/// A unit's combat role or element. Every unit carries a set of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Melee,
    Ranged,
    Magic,
    Physical,
    Healer,
    Fire,
    Water,
    Earth,
    Air,
    Darkness,
    Light,
}

impl TypeTag {
    pub const ELEMENTS: [TypeTag; 6] = [
        TypeTag::Fire,
        TypeTag::Water,
        TypeTag::Earth,
        TypeTag::Air,
        TypeTag::Darkness,
        TypeTag::Light,
    ];

    pub fn is_element(&self) -> bool {
        Self::ELEMENTS.contains(self)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Melee => "Melee",
            TypeTag::Ranged => "Ranged",
            TypeTag::Magic => "Magic",
            TypeTag::Physical => "Physical",
            TypeTag::Healer => "Healer",
            TypeTag::Fire => "Fire",
            TypeTag::Water => "Water",
            TypeTag::Earth => "Earth",
            TypeTag::Air => "Air",
            TypeTag::Darkness => "Darkness",
            TypeTag::Light => "Light",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which units a synergy or bonus applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagTarget {
    All,
    Tag(TypeTag),
}

impl TagTarget {
    pub fn matches(&self, unit: &UnitInstance) -> bool {
        match self {
            TagTarget::All => true,
            TagTarget::Tag(tag) => has_type(unit, *tag),
        }
    }
}

impl fmt::Display for TagTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagTarget::All => f.write_str("all units"),
            TagTarget::Tag(tag) => write!(f, "{} units", tag),
        }
    }
}

/// Identity of a unit instance. Never reused within a save.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnitId(pub u64);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A concrete squad member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitInstance {
    pub id: UnitId,
    pub name: String,
    pub tags: BTreeSet<TypeTag>,
    pub base_damage: u64,
    pub base_multiplier: u64,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub icon: String,
}

impl UnitInstance {
    pub fn has_type(&self, tag: TypeTag) -> bool {
        has_type(self, tag)
    }

    /// The unit's element, if it has one.
    pub fn element(&self) -> Option<TypeTag> {
        self.tags.iter().copied().find(TypeTag::is_element)
    }

    /// Raw power used for pricing and greedy ordering.
    pub fn power(&self) -> u64 {
        self.base_damage * self.base_multiplier
    }
}

/// The one tag predicate used by synergies, bonuses and boss mechanics.
pub fn has_type(unit: &UnitInstance, tag: TypeTag) -> bool {
    unit.tags.contains(&tag)
}
