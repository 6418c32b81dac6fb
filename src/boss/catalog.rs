//! Boss encounters and their mechanics.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::units::TypeTag;

/// A boss's damage-modifying rule, decoded once when the boss is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossMechanicKind {
    /// Scales damage of units with `tag` to `percent`% (50 halves, 150 boosts).
    DamagePercent { tag: TypeTag, percent: u64 },
    /// Subtracts a flat amount from the damage of units with `tag`, floored at 0.
    FlatDamageReduction { tag: TypeTag, amount: u64 },
    /// Halves every unit's multiplier, rounding up.
    HalveMultiplier,
    /// No damage at all until the player sells a bonus during this combat.
    SealedUntilBonusSold,
}

impl BossMechanicKind {
    pub fn description(&self) -> String {
        match self {
            BossMechanicKind::DamagePercent { tag, percent } if *percent < 100 => {
                format!("{} units deal {}% less damage", tag, 100 - percent)
            }
            BossMechanicKind::DamagePercent { tag, percent } => {
                format!("{} units deal {}% more damage", tag, percent - 100)
            }
            BossMechanicKind::FlatDamageReduction { tag, amount } => {
                format!("{} units deal {} less damage", tag, amount)
            }
            BossMechanicKind::HalveMultiplier => "All multipliers are halved".to_string(),
            BossMechanicKind::SealedUntilBonusSold => {
                "Blocks all damage and rerolls until a bonus is sold".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossDefinition {
    pub name: &'static str,
    pub icon: &'static str,
    /// Target before the rank's major multiplier.
    pub target_damage: u64,
    pub mechanic: BossMechanicKind,
}

pub const BOSS_POOL: &[BossDefinition] = &[
    BossDefinition {
        name: "Stone Golem",
        icon: "🗿",
        target_damage: 4000,
        mechanic: BossMechanicKind::DamagePercent {
            tag: TypeTag::Melee,
            percent: 50,
        },
    },
    BossDefinition {
        name: "Ice Dragon",
        icon: "🐉",
        target_damage: 5000,
        mechanic: BossMechanicKind::DamagePercent {
            tag: TypeTag::Ranged,
            percent: 70,
        },
    },
    BossDefinition {
        name: "Lich",
        icon: "💀",
        target_damage: 4500,
        mechanic: BossMechanicKind::FlatDamageReduction {
            tag: TypeTag::Melee,
            amount: 2,
        },
    },
    BossDefinition {
        name: "Titan",
        icon: "🗻",
        target_damage: 6000,
        mechanic: BossMechanicKind::HalveMultiplier,
    },
    BossDefinition {
        name: "Demon",
        icon: "👹",
        target_damage: 5500,
        mechanic: BossMechanicKind::DamagePercent {
            tag: TypeTag::Magic,
            percent: 150,
        },
    },
];

/// The unique boss guarding the highest rank.
pub const FINAL_BOSS: BossDefinition = BossDefinition {
    name: "Quilegan",
    icon: "👑",
    target_damage: 10000,
    mechanic: BossMechanicKind::SealedUntilBonusSold,
};

pub fn get_boss(name: &str) -> Option<&'static BossDefinition> {
    if name == FINAL_BOSS.name {
        return Some(&FINAL_BOSS);
    }
    BOSS_POOL.iter().find(|b| b.name == name)
}

pub fn random_boss(rng: &mut impl Rng) -> &'static BossDefinition {
    &BOSS_POOL[rng.gen_range(0..BOSS_POOL.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_boss_includes_final() {
        assert_eq!(get_boss("Quilegan"), Some(&FINAL_BOSS));
        assert_eq!(get_boss("Lich").unwrap().target_damage, 4500);
        assert!(get_boss("Slime King").is_none());
    }

    #[test]
    fn test_final_boss_not_in_random_pool() {
        assert!(BOSS_POOL.iter().all(|b| b.name != FINAL_BOSS.name));
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(
            BOSS_POOL[0].mechanic.description(),
            "Melee units deal 50% less damage"
        );
        assert_eq!(
            BOSS_POOL[4].mechanic.description(),
            "Magic units deal 50% more damage"
        );
    }
}
