//! Owned bonuses, dynamic counters and their aggregated effects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::{
    all_bonus_definitions, get_bonus_definition, BonusDefinition, BonusKind, DynamicYield,
};
use crate::core::error::{GameError, GameResult};
use crate::units::{TagTarget, TypeTag, UnitInstance};

/// The player's unlocked-bonus multiset plus dynamic counters.
///
/// Dynamic bonuses are held at most once; their strength lives in
/// `counters[bonus_id][trigger]`, which only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusLedger {
    pub copies: BTreeMap<String, u32>,
    pub counters: BTreeMap<String, BTreeMap<String, u64>>,
}

/// What happened when a bonus was unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// A new copy was added; holds the copy count afterwards.
    Added(u32),
    /// The dynamic bonus was already owned; its counter grew instead.
    CounterIncreased(u64),
}

impl BonusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copies_of(&self, bonus_id: &str) -> u32 {
        self.copies.get(bonus_id).copied().unwrap_or(0)
    }

    pub fn owns(&self, bonus_id: &str) -> bool {
        self.copies_of(bonus_id) > 0
    }

    pub fn counter(&self, bonus_id: &str, trigger: &str) -> u64 {
        self.counters
            .get(bonus_id)
            .and_then(|c| c.get(trigger))
            .copied()
            .unwrap_or(0)
    }

    /// Adds a copy of a bonus. A second unlock of a dynamic bonus bumps its
    /// trigger counter instead of adding a copy.
    pub fn unlock(&mut self, bonus_id: &str) -> GameResult<UnlockOutcome> {
        let def = get_bonus_definition(bonus_id)
            .ok_or_else(|| GameError::InvalidBonusId(bonus_id.to_string()))?;

        if let BonusKind::Dynamic(spec) = def.kind {
            if self.owns(bonus_id) {
                let value = self.increment_counter(bonus_id, spec.trigger);
                return Ok(UnlockOutcome::CounterIncreased(value));
            }
        }

        let copies = self.copies.entry(bonus_id.to_string()).or_insert(0);
        *copies += 1;
        Ok(UnlockOutcome::Added(*copies))
    }

    /// Removes one copy. Counters are kept so a re-bought dynamic bonus
    /// resumes where it left off.
    pub fn remove_copy(&mut self, bonus_id: &str) -> GameResult<u32> {
        let Some(copies) = self.copies.get_mut(bonus_id) else {
            return Err(GameError::BonusNotOwned(bonus_id.to_string()));
        };
        *copies = copies.saturating_sub(1);
        let remaining = *copies;
        if remaining == 0 {
            self.copies.remove(bonus_id);
        }
        Ok(remaining)
    }

    fn increment_counter(&mut self, bonus_id: &str, trigger: &str) -> u64 {
        let value = self
            .counters
            .entry(bonus_id.to_string())
            .or_default()
            .entry(trigger.to_string())
            .or_insert(0);
        *value += 1;
        *value
    }

    /// Bumps the counter of every owned dynamic bonus listening to `trigger`.
    /// Returns the ids that grew.
    pub fn fire_trigger(&mut self, trigger: &str) -> Vec<String> {
        let listeners: Vec<&'static str> = all_bonus_definitions()
            .iter()
            .filter(|def| match def.kind {
                BonusKind::Dynamic(spec) => spec.trigger == trigger,
                _ => false,
            })
            .filter(|def| self.owns(def.id))
            .map(|def| def.id)
            .collect();
        for id in &listeners {
            self.increment_counter(id, trigger);
        }
        listeners.into_iter().map(str::to_string).collect()
    }

    /// Drops unknown ids and collapses extra dynamic copies. Returns the
    /// ids that were removed.
    pub fn repair(&mut self) -> Vec<String> {
        let mut invalid: Vec<String> = self
            .copies
            .keys()
            .chain(self.counters.keys())
            .filter(|id| get_bonus_definition(id).is_none())
            .cloned()
            .collect();
        invalid.sort();
        invalid.dedup();
        for id in &invalid {
            self.copies.remove(id);
            self.counters.remove(id);
        }
        self.copies.retain(|_, copies| *copies > 0);
        for (id, copies) in self.copies.iter_mut() {
            if get_bonus_definition(id).is_some_and(BonusDefinition::is_dynamic) {
                *copies = (*copies).min(1);
            }
        }
        invalid
    }
}

/// The aggregated effect of one owned bonus id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusEffect {
    pub bonus_id: String,
    pub name: String,
    pub copies: u32,
    pub effect: EffectKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Stats {
        damage: u64,
        multiplier: u64,
        target: TagTarget,
    },
    Gold { amount: u64 },
    ExtraRerolls { count: u32 },
    DamagePerReroll { damage: u64 },
    PositionMultiplier { slot: usize, factor: u64 },
    ElementFusion { first: TypeTag, second: TypeTag },
}

/// Aggregates every owned bonus into its current effect.
///
/// Static bonuses scale with copies; dynamic bonuses contribute
/// `base + Σ counter × per_trigger` once. Unknown ids are skipped.
pub fn compute_equipment_bonuses(ledger: &BonusLedger) -> Vec<BonusEffect> {
    let mut effects = Vec::new();
    for (id, &copies) in &ledger.copies {
        if copies == 0 {
            continue;
        }
        let Some(def) = get_bonus_definition(id) else {
            continue;
        };
        let n = u64::from(copies);
        let effect = match def.kind {
            BonusKind::Stats {
                damage,
                multiplier,
                target,
            } => EffectKind::Stats {
                damage: damage * n,
                multiplier: multiplier * n,
                target,
            },
            BonusKind::Gold { amount } => EffectKind::Gold { amount: amount * n },
            BonusKind::ExtraReroll => EffectKind::ExtraRerolls { count: copies },
            BonusKind::DamagePerReroll { damage } => EffectKind::DamagePerReroll { damage: damage * n },
            BonusKind::PositionMultiplier { slot } => EffectKind::PositionMultiplier {
                slot,
                factor: 1 + n,
            },
            BonusKind::ElementFusion { first, second } => {
                EffectKind::ElementFusion { first, second }
            }
            BonusKind::Dynamic(spec) => {
                let value = spec.base + ledger.counter(id, spec.trigger) * spec.per_trigger;
                match spec.yields {
                    DynamicYield::Multiplier(target) => EffectKind::Stats {
                        damage: 0,
                        multiplier: value,
                        target,
                    },
                    DynamicYield::Gold => EffectKind::Gold { amount: value },
                }
            }
        };
        effects.push(BonusEffect {
            bonus_id: id.clone(),
            name: def.name.to_string(),
            copies,
            effect,
        });
    }
    effects
}

/// Total end-of-combat gold from the given effects.
pub fn total_gold(effects: &[BonusEffect]) -> u64 {
    effects
        .iter()
        .map(|e| match e.effect {
            EffectKind::Gold { amount } => amount,
            _ => 0,
        })
        .sum()
}

pub fn extra_rerolls(effects: &[BonusEffect]) -> u32 {
    effects
        .iter()
        .map(|e| match e.effect {
            EffectKind::ExtraRerolls { count } => count,
            _ => 0,
        })
        .sum()
}

/// Element pairs that count as each other.
pub fn element_fusions(effects: &[BonusEffect]) -> Vec<(TypeTag, TypeTag)> {
    effects
        .iter()
        .filter_map(|e| match e.effect {
            EffectKind::ElementFusion { first, second } => Some((first, second)),
            _ => None,
        })
        .collect()
}

/// Adds the fused partner element to every unit holding one side of a fusion.
pub fn apply_element_fusions(
    squad: &[UnitInstance],
    fusions: &[(TypeTag, TypeTag)],
) -> Vec<UnitInstance> {
    squad
        .iter()
        .map(|unit| {
            let mut unit = unit.clone();
            for &(first, second) in fusions {
                if unit.has_type(first) || unit.has_type(second) {
                    unit.tags.insert(first);
                    unit.tags.insert(second);
                }
            }
            unit
        })
        .collect()
}

/// Applies the order-independent bonuses to one unit's running totals.
/// Position bonuses are handled by the combat pipeline after boss mechanics.
pub fn apply_equipment_to_unit(
    effects: &[BonusEffect],
    unit: &UnitInstance,
    remaining_rerolls: u32,
    damage: &mut u64,
    multiplier: &mut u64,
) {
    for effect in effects {
        match effect.effect {
            EffectKind::Stats {
                damage: d,
                multiplier: m,
                target,
            } if target.matches(unit) => {
                *damage += d;
                *multiplier += m;
            }
            EffectKind::DamagePerReroll { damage: d } => {
                *damage += d * u64::from(remaining_rerolls);
            }
            _ => {}
        }
    }
}

/// Multiplier factor for the unit at `slot`, 1 when no position bonus applies.
pub fn position_factor(effects: &[BonusEffect], slot: usize) -> u64 {
    effects
        .iter()
        .filter_map(|e| match e.effect {
            EffectKind::PositionMultiplier { slot: s, factor } if s == slot => Some(factor),
            _ => None,
        })
        .product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{TRIGGER_END_OF_COMBAT, TRIGGER_MELEE_FORMATION};
    use crate::items::Rarity;
    use crate::units::UnitId;

    fn unit(tags: &[TypeTag]) -> UnitInstance {
        UnitInstance {
            id: UnitId(1),
            name: "Test".to_string(),
            tags: tags.iter().copied().collect(),
            base_damage: 5,
            base_multiplier: 2,
            rarity: Rarity::Common,
            icon: String::new(),
        }
    }

    fn effect_for<'a>(effects: &'a [BonusEffect], id: &str) -> &'a BonusEffect {
        effects.iter().find(|e| e.bonus_id == id).unwrap()
    }

    #[test]
    fn test_empty_ledger_has_no_effects() {
        assert!(compute_equipment_bonuses(&BonusLedger::new()).is_empty());
    }

    #[test]
    fn test_unlock_invalid_id_is_rejected() {
        let mut ledger = BonusLedger::new();
        assert!(matches!(
            ledger.unlock("nope"),
            Err(GameError::InvalidBonusId(_))
        ));
        assert!(ledger.copies.is_empty());
    }

    #[test]
    fn test_static_bonus_scales_with_copies() {
        let mut ledger = BonusLedger::new();
        ledger.unlock("sharp_sword").unwrap();
        assert_eq!(ledger.unlock("sharp_sword").unwrap(), UnlockOutcome::Added(2));
        let effects = compute_equipment_bonuses(&ledger);
        assert_eq!(
            effect_for(&effects, "sharp_sword").effect,
            EffectKind::Stats {
                damage: 4,
                multiplier: 0,
                target: TagTarget::Tag(TypeTag::Melee)
            }
        );
    }

    #[test]
    fn test_second_dynamic_unlock_bumps_counter() {
        let mut ledger = BonusLedger::new();
        assert_eq!(ledger.unlock("melee_is_life").unwrap(), UnlockOutcome::Added(1));
        assert_eq!(
            ledger.unlock("melee_is_life").unwrap(),
            UnlockOutcome::CounterIncreased(1)
        );
        assert_eq!(ledger.copies_of("melee_is_life"), 1);
        assert_eq!(ledger.counter("melee_is_life", TRIGGER_MELEE_FORMATION), 1);

        let effects = compute_equipment_bonuses(&ledger);
        assert_eq!(
            effect_for(&effects, "melee_is_life").effect,
            EffectKind::Stats {
                damage: 0,
                multiplier: 3,
                target: TagTarget::Tag(TypeTag::Melee)
            }
        );
    }

    #[test]
    fn test_fire_trigger_only_touches_owned_listeners() {
        let mut ledger = BonusLedger::new();
        ledger.unlock("lifetime_savings").unwrap();
        let grown = ledger.fire_trigger(TRIGGER_END_OF_COMBAT);
        assert_eq!(grown, vec!["lifetime_savings".to_string()]);
        assert!(ledger.fire_trigger(TRIGGER_MELEE_FORMATION).is_empty());

        let effects = compute_equipment_bonuses(&ledger);
        assert_eq!(total_gold(&effects), 7 + 3);
    }

    #[test]
    fn test_remove_copy_keeps_counters() {
        let mut ledger = BonusLedger::new();
        ledger.unlock("lifetime_savings").unwrap();
        ledger.fire_trigger(TRIGGER_END_OF_COMBAT);
        assert_eq!(ledger.remove_copy("lifetime_savings").unwrap(), 0);
        assert!(!ledger.owns("lifetime_savings"));
        assert_eq!(ledger.counter("lifetime_savings", TRIGGER_END_OF_COMBAT), 1);
        assert!(matches!(
            ledger.remove_copy("lifetime_savings"),
            Err(GameError::BonusNotOwned(_))
        ));
    }

    #[test]
    fn test_repair_drops_unknown_and_collapses_dynamic() {
        let mut ledger = BonusLedger::new();
        ledger.copies.insert("ghost_bonus".to_string(), 2);
        ledger.copies.insert("melee_is_life".to_string(), 3);
        ledger.copies.insert("gold_bonus".to_string(), 0);
        ledger
            .counters
            .entry("ghost_bonus".to_string())
            .or_default()
            .insert("x".to_string(), 4);

        let removed = ledger.repair();
        assert!(removed.contains(&"ghost_bonus".to_string()));
        assert!(!ledger.counters.contains_key("ghost_bonus"));
        assert_eq!(ledger.copies_of("melee_is_life"), 1);
        assert!(!ledger.copies.contains_key("gold_bonus"));
    }

    #[test]
    fn test_gold_and_rerolls_aggregate() {
        let mut ledger = BonusLedger::new();
        ledger.unlock("gold_bonus").unwrap();
        ledger.unlock("gold_bonus").unwrap();
        ledger.unlock("extra_reroll").unwrap();
        let effects = compute_equipment_bonuses(&ledger);
        assert_eq!(total_gold(&effects), 50);
        assert_eq!(extra_rerolls(&effects), 1);
    }

    #[test]
    fn test_apply_equipment_respects_target_and_rerolls() {
        let mut ledger = BonusLedger::new();
        ledger.unlock("magic_bonus").unwrap();
        ledger.unlock("attack_per_reroll").unwrap();
        ledger.unlock("power_elixir").unwrap();
        let effects = compute_equipment_bonuses(&ledger);

        let melee = unit(&[TypeTag::Melee]);
        let (mut d, mut m) = (5, 2);
        apply_equipment_to_unit(&effects, &melee, 3, &mut d, &mut m);
        assert_eq!((d, m), (5 + 6, 3));

        let mage = unit(&[TypeTag::Magic]);
        let (mut d, mut m) = (5, 2);
        apply_equipment_to_unit(&effects, &mage, 0, &mut d, &mut m);
        assert_eq!((d, m), (15, 3));
    }

    #[test]
    fn test_position_factor() {
        let mut ledger = BonusLedger::new();
        let effects = compute_equipment_bonuses(&ledger);
        assert_eq!(position_factor(&effects, 3), 1);

        ledger.unlock("position_four").unwrap();
        ledger.unlock("position_four").unwrap();
        let effects = compute_equipment_bonuses(&ledger);
        assert_eq!(position_factor(&effects, 3), 3);
        assert_eq!(position_factor(&effects, 0), 1);
    }

    #[test]
    fn test_element_fusion_expands_tags() {
        let mut ledger = BonusLedger::new();
        ledger.unlock("fusion_fire_water").unwrap();
        let effects = compute_equipment_bonuses(&ledger);
        let fusions = element_fusions(&effects);
        let squad = vec![unit(&[TypeTag::Melee, TypeTag::Fire]), unit(&[TypeTag::Air])];
        let fused = apply_element_fusions(&squad, &fusions);
        assert!(fused[0].has_type(TypeTag::Water));
        assert!(!fused[1].has_type(TypeTag::Water));
    }
}
