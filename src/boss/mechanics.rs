use crate::boss::catalog::BossMechanicKind;
use crate::units::UnitInstance;

/// Applies a boss mechanic to one unit's damage and multiplier.
///
/// Proportional changes round up. Flat reductions never go below zero.
/// The sealing mechanic zeroes damage until `bonus_sold` is set.
pub fn apply_boss_mechanic(
    mechanic: &BossMechanicKind,
    bonus_sold: bool,
    damage: u64,
    multiplier: u64,
    unit: &UnitInstance,
) -> (u64, u64) {
    match *mechanic {
        BossMechanicKind::DamagePercent { tag, percent } if unit.has_type(tag) => {
            ((damage * percent).div_ceil(100), multiplier)
        }
        BossMechanicKind::FlatDamageReduction { tag, amount } if unit.has_type(tag) => {
            (damage.saturating_sub(amount), multiplier)
        }
        BossMechanicKind::HalveMultiplier => (damage, multiplier.div_ceil(2)),
        BossMechanicKind::SealedUntilBonusSold if !bonus_sold => (0, multiplier),
        _ => (damage, multiplier),
    }
}

/// True while the mechanic forces a whole turn to zero damage.
pub fn suppresses_turn(mechanic: &BossMechanicKind, bonus_sold: bool) -> bool {
    matches!(mechanic, BossMechanicKind::SealedUntilBonusSold) && !bonus_sold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::catalog::{BOSS_POOL, FINAL_BOSS};
    use crate::items::Rarity;
    use crate::units::{TypeTag, UnitId};

    fn unit(tags: &[TypeTag]) -> UnitInstance {
        UnitInstance {
            id: UnitId(1),
            name: "Test".to_string(),
            tags: tags.iter().copied().collect(),
            base_damage: 5,
            base_multiplier: 3,
            rarity: Rarity::Common,
            icon: String::new(),
        }
    }

    #[test]
    fn test_melee_halved_rounds_up() {
        let golem = BOSS_POOL[0].mechanic;
        let melee = unit(&[TypeTag::Melee]);
        assert_eq!(apply_boss_mechanic(&golem, false, 5, 2, &melee), (3, 2));
    }

    #[test]
    fn test_mechanic_ignores_other_tags() {
        let golem = BOSS_POOL[0].mechanic;
        let archer = unit(&[TypeTag::Ranged]);
        assert_eq!(apply_boss_mechanic(&golem, false, 5, 2, &archer), (5, 2));
    }

    #[test]
    fn test_ranged_reduced_to_seventy_percent() {
        let dragon = BOSS_POOL[1].mechanic;
        let archer = unit(&[TypeTag::Ranged]);
        // 4 * 0.7 = 2.8 -> 3
        assert_eq!(apply_boss_mechanic(&dragon, false, 4, 3, &archer), (3, 3));
    }

    #[test]
    fn test_flat_reduction_floors_at_zero() {
        let lich = BOSS_POOL[2].mechanic;
        let melee = unit(&[TypeTag::Melee]);
        assert_eq!(apply_boss_mechanic(&lich, false, 5, 2, &melee), (3, 2));
        assert_eq!(apply_boss_mechanic(&lich, false, 1, 2, &melee), (0, 2));
    }

    #[test]
    fn test_halve_multiplier_rounds_up() {
        let titan = BOSS_POOL[3].mechanic;
        let any = unit(&[TypeTag::Physical]);
        assert_eq!(apply_boss_mechanic(&titan, false, 5, 3, &any), (5, 2));
        assert_eq!(apply_boss_mechanic(&titan, false, 5, 4, &any), (5, 2));
    }

    #[test]
    fn test_magic_weakness_rounds_up() {
        let demon = BOSS_POOL[4].mechanic;
        let mage = unit(&[TypeTag::Magic]);
        // 5 * 1.5 = 7.5 -> 8
        assert_eq!(apply_boss_mechanic(&demon, false, 5, 4, &mage), (8, 4));
    }

    #[test]
    fn test_sealed_until_bonus_sold() {
        let seal = FINAL_BOSS.mechanic;
        let any = unit(&[TypeTag::Melee]);
        assert_eq!(apply_boss_mechanic(&seal, false, 9, 4, &any), (0, 4));
        assert!(suppresses_turn(&seal, false));
        assert_eq!(apply_boss_mechanic(&seal, true, 9, 4, &any), (9, 4));
        assert!(!suppresses_turn(&seal, true));
        assert!(!suppresses_turn(&BOSS_POOL[0].mechanic, false));
    }
}
