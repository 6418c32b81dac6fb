use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::definitions::{SynergyDefinition, SYNERGY_DEFINITIONS};
use crate::units::{TagTarget, TypeTag, UnitInstance};

/// A synergy whose requirements hold, with its level-scaled bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSynergy {
    pub name: String,
    pub level: u32,
    pub damage: u64,
    pub multiplier: u64,
    pub target: TagTarget,
}

impl ActiveSynergy {
    pub fn applies_to(&self, unit: &UnitInstance) -> bool {
        self.target.matches(unit)
    }
}

/// Number of units carrying each tag.
pub fn count_tags(squad: &[UnitInstance]) -> HashMap<TypeTag, usize> {
    let mut counts = HashMap::new();
    for unit in squad {
        for tag in &unit.tags {
            *counts.entry(*tag).or_insert(0) += 1;
        }
    }
    counts
}

/// Evaluates `definitions` against the squad, in definition order.
///
/// Levels default to 1 when a synergy has never been upgraded.
pub fn compute_synergies_with(
    definitions: &[SynergyDefinition],
    squad: &[UnitInstance],
    levels: &BTreeMap<String, u32>,
) -> Vec<ActiveSynergy> {
    if squad.is_empty() {
        return Vec::new();
    }
    let counts = count_tags(squad);
    definitions
        .iter()
        .filter(|def| {
            def.requirements
                .iter()
                .all(|(tag, min)| counts.get(tag).copied().unwrap_or(0) >= *min)
        })
        .map(|def| {
            let level = levels.get(def.name).copied().unwrap_or(1).max(1);
            ActiveSynergy {
                name: def.name.to_string(),
                level,
                damage: def.scaling.scale(def.damage, level),
                multiplier: def.scaling.scale(def.multiplier, level),
                target: def.target,
            }
        })
        .collect()
}

/// Evaluates the full synergy catalog against the squad.
pub fn compute_synergies(
    squad: &[UnitInstance],
    levels: &BTreeMap<String, u32>,
) -> Vec<ActiveSynergy> {
    compute_synergies_with(SYNERGY_DEFINITIONS, squad, levels)
}

/// Number of distinct healer units present, each adding +1 damage to everyone.
pub fn healer_bonus(squad: &[UnitInstance]) -> u64 {
    squad.iter().filter(|u| u.has_type(TypeTag::Healer)).count() as u64
}
