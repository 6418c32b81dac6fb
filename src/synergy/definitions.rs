//! Team synergy definitions, in display and application order.

use serde::{Deserialize, Serialize};

use crate::core::constants::TRIGGER_MELEE_FORMATION;
use crate::units::TagTarget::{self, All, Tag};
use crate::units::TypeTag::{self, *};

/// How a synergy's bonus grows with its upgrade level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scaling {
    /// `base × level`
    Linear,
    /// `base + (level - 1)` on every non-zero component
    Stepped,
    /// Level is ignored
    Fixed,
}

impl Scaling {
    pub fn scale(&self, base: u64, level: u32) -> u64 {
        let level = u64::from(level.max(1));
        match self {
            Scaling::Linear => base * level,
            Scaling::Stepped if base > 0 => base + (level - 1),
            Scaling::Stepped | Scaling::Fixed => base,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynergyDefinition {
    pub name: &'static str,
    /// Every `(tag, minimum count)` pair must hold for the synergy to fire.
    pub requirements: &'static [(TypeTag, usize)],
    pub damage: u64,
    pub multiplier: u64,
    pub target: TagTarget,
    pub scaling: Scaling,
}

const fn synergy(
    name: &'static str,
    requirements: &'static [(TypeTag, usize)],
    damage: u64,
    multiplier: u64,
    target: TagTarget,
    scaling: Scaling,
) -> SynergyDefinition {
    SynergyDefinition {
        name,
        requirements,
        damage,
        multiplier,
        target,
        scaling,
    }
}

pub const SYNERGY_DEFINITIONS: &[SynergyDefinition] = &[
    synergy(TRIGGER_MELEE_FORMATION, &[(Melee, 2)], 1, 0, Tag(Melee), Scaling::Linear),
    synergy("Ranged Formation", &[(Ranged, 3)], 0, 3, Tag(Ranged), Scaling::Stepped),
    synergy("Magic Formation", &[(Magic, 3)], 0, 4, Tag(Magic), Scaling::Stepped),
    synergy(
        "Holy Trinity",
        &[(Melee, 1), (Ranged, 1), (Healer, 1)],
        2,
        2,
        All,
        Scaling::Fixed,
    ),
    synergy("Melee Horde", &[(Melee, 5)], 5, 3, Tag(Melee), Scaling::Stepped),
    synergy("Arrow Volley", &[(Ranged, 5)], 8, 4, Tag(Ranged), Scaling::Stepped),
    synergy("Magic Storm", &[(Magic, 5)], 10, 5, Tag(Magic), Scaling::Stepped),
    synergy("Mixed Tactics", &[(Melee, 3), (Ranged, 3)], 3, 0, All, Scaling::Stepped),
    synergy("Physical Might", &[(Physical, 6)], 4, 0, Tag(Physical), Scaling::Stepped),
    synergy(
        "Elemental",
        &[(Fire, 1), (Water, 1), (Earth, 1), (Air, 1)],
        4,
        5,
        All,
        Scaling::Stepped,
    ),
    synergy("Chaos", &[(Light, 2), (Darkness, 2)], 5, 5, All, Scaling::Stepped),
];

pub fn all_synergy_definitions() -> &'static [SynergyDefinition] {
    SYNERGY_DEFINITIONS
}

pub fn get_synergy_definition(name: &str) -> Option<&'static SynergyDefinition> {
    SYNERGY_DEFINITIONS.iter().find(|s| s.name == name)
}
