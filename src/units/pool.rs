//! Squad ownership and combat-pool drawing.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::{all_unit_templates, random_element, UnitTemplate};
use super::types::{TypeTag, UnitId, UnitInstance};

/// Every unit the player owns, in acquisition order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    pub units: Vec<UnitInstance>,
    /// Next id to hand out. Always above every id in `units`.
    pub next_id: u64,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a new squad with every archetype's starting supply.
    pub fn seed_starting_squad(&mut self, rng: &mut impl Rng) {
        for template in all_unit_templates() {
            for _ in 0..template.base_quantity {
                let element = random_element(rng);
                self.recruit(template, element);
            }
        }
    }

    fn allocate_id(&mut self) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Adds a fresh instance of an archetype and returns its id.
    pub fn recruit(&mut self, template: &UnitTemplate, element: TypeTag) -> UnitId {
        let id = self.allocate_id();
        self.units.push(template.instantiate(id, element));
        id
    }

    /// Clones an owned unit under a new id, placing the copy after the original.
    pub fn duplicate(&mut self, id: UnitId) -> Option<UnitId> {
        let index = self.index_of(id)?;
        let new_id = self.allocate_id();
        let mut copy = self.units[index].clone();
        copy.id = new_id;
        self.units.insert(index + 1, copy);
        Some(new_id)
    }

    /// Replaces an owned unit with a fresh instance of another archetype.
    /// The element is kept; the replacement gets a new id.
    pub fn transform(&mut self, id: UnitId, template: &UnitTemplate) -> Option<UnitId> {
        let index = self.index_of(id)?;
        let element = self.units[index]
            .element()
            .unwrap_or(TypeTag::ELEMENTS[0]);
        let new_id = self.allocate_id();
        self.units[index] = template.instantiate(new_id, element);
        Some(new_id)
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitInstance> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: UnitId) -> Option<usize> {
        self.units.iter().position(|u| u.id == id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitInstance> {
        self.units.iter()
    }

    /// Resolves ids to instances, skipping any that are not owned.
    pub fn resolve(&self, ids: &[UnitId]) -> Vec<UnitInstance> {
        ids.iter().filter_map(|id| self.get(*id).cloned()).collect()
    }

    /// Restores the id invariants after loading: duplicate ids are
    /// reassigned and `next_id` moves above every id in use.
    pub fn repair(&mut self) -> usize {
        let mut seen = BTreeSet::new();
        let mut reassigned = 0;
        let mut next = self
            .units
            .iter()
            .map(|u| u.id.0 + 1)
            .max()
            .unwrap_or(0)
            .max(self.next_id);
        for unit in &mut self.units {
            if !seen.insert(unit.id) {
                unit.id = UnitId(next);
                seen.insert(unit.id);
                next += 1;
                reassigned += 1;
            }
        }
        self.next_id = next;
        reassigned
    }
}

/// Squad units that are neither used this combat nor already in `exclude`.
fn available_ids(
    roster: &Roster,
    used: &BTreeSet<UnitId>,
    exclude: &[UnitId],
) -> Vec<UnitId> {
    roster
        .iter()
        .map(|u| u.id)
        .filter(|id| !used.contains(id) && !exclude.contains(id))
        .collect()
}

/// Draws a fresh combat pool of up to `size` unused squad units.
pub fn draw_combat_pool(
    roster: &Roster,
    used: &BTreeSet<UnitId>,
    size: usize,
    rng: &mut impl Rng,
) -> Vec<UnitId> {
    let candidates = available_ids(roster, used, &[]);
    candidates.choose_multiple(rng, size).copied().collect()
}

/// Tops the pool back up to `size` from unused squad units not already in it.
pub fn refill_combat_pool(
    pool: &mut Vec<UnitId>,
    roster: &Roster,
    used: &BTreeSet<UnitId>,
    size: usize,
    rng: &mut impl Rng,
) {
    pool.retain(|id| !used.contains(id) && roster.contains(*id));
    if pool.len() >= size {
        return;
    }
    let candidates = available_ids(roster, used, pool);
    let missing = size - pool.len();
    pool.extend(candidates.choose_multiple(rng, missing).copied());
}

/// Marks the given pool units as used and swaps each for a random unused
/// squad unit. Returns the replacement ids; fewer than requested when the
/// squad runs dry. Ids not in the pool are ignored.
pub fn reroll_units(
    pool: &mut Vec<UnitId>,
    ids: &[UnitId],
    roster: &Roster,
    used: &mut BTreeSet<UnitId>,
    rng: &mut impl Rng,
) -> Vec<UnitId> {
    let mut replacements = Vec::new();
    for id in ids {
        let Some(slot) = pool.iter().position(|p| p == id) else {
            continue;
        };
        used.insert(*id);
        let candidates = available_ids(roster, used, pool);
        match candidates.choose(rng) {
            Some(new_id) => {
                pool[slot] = *new_id;
                replacements.push(*new_id);
            }
            None => {
                pool.remove(slot);
            }
        }
    }
    replacements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::catalog::get_unit_template;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn seeded_roster() -> (Roster, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let mut roster = Roster::new();
        roster.seed_starting_squad(&mut rng);
        (roster, rng)
    }

    #[test]
    fn test_seed_starting_squad() {
        let (roster, _) = seeded_roster();
        assert_eq!(roster.len(), 30);
        assert_eq!(roster.next_id, 30);
        assert_eq!(roster.iter().filter(|u| u.name == "Swordsman").count(), 5);
        assert!(roster.iter().all(|u| u.element().is_some()));
    }

    #[test]
    fn test_ids_unique_after_duplicate_and_transform() {
        let (mut roster, _) = seeded_roster();
        let first = roster.units[0].id;
        let copy = roster.duplicate(first).unwrap();
        let knight = get_unit_template("Knight").unwrap();
        let transformed = roster.transform(first, knight).unwrap();

        let ids: BTreeSet<UnitId> = roster.iter().map(|u| u.id).collect();
        assert_eq!(ids.len(), roster.len());
        assert_ne!(copy, transformed);
        assert!(!roster.contains(first));
        assert_eq!(roster.get(transformed).unwrap().name, "Knight");
    }

    #[test]
    fn test_transform_keeps_element() {
        let mut roster = Roster::new();
        let peasant = get_unit_template("Peasant").unwrap();
        let id = roster.recruit(peasant, TypeTag::Darkness);
        let new_id = roster.transform(id, get_unit_template("Mage").unwrap()).unwrap();
        assert_eq!(roster.get(new_id).unwrap().element(), Some(TypeTag::Darkness));
    }

    #[test]
    fn test_duplicate_missing_unit() {
        let mut roster = Roster::new();
        assert!(roster.duplicate(UnitId(99)).is_none());
    }

    #[test]
    fn test_draw_combat_pool_respects_size_and_used() {
        let (roster, mut rng) = seeded_roster();
        let used: BTreeSet<UnitId> = roster.iter().take(25).map(|u| u.id).collect();
        let pool = draw_combat_pool(&roster, &used, 7, &mut rng);
        assert_eq!(pool.len(), 5);
        assert!(pool.iter().all(|id| !used.contains(id)));
    }

    #[test]
    fn test_refill_removes_used_and_tops_up() {
        let (roster, mut rng) = seeded_roster();
        let mut used = BTreeSet::new();
        let mut pool = draw_combat_pool(&roster, &used, 7, &mut rng);
        used.insert(pool[0]);
        used.insert(pool[1]);
        refill_combat_pool(&mut pool, &roster, &used, 7, &mut rng);
        assert_eq!(pool.len(), 7);
        assert!(pool.iter().all(|id| !used.contains(id)));
        let distinct: BTreeSet<UnitId> = pool.iter().copied().collect();
        assert_eq!(distinct.len(), 7);
    }

    #[test]
    fn test_reroll_marks_used_and_replaces() {
        let (roster, mut rng) = seeded_roster();
        let mut used = BTreeSet::new();
        let mut pool = draw_combat_pool(&roster, &used, 7, &mut rng);
        let target = pool[2];
        let replaced = reroll_units(&mut pool, &[target], &roster, &mut used, &mut rng);
        assert_eq!(replaced.len(), 1);
        assert!(used.contains(&target));
        assert!(!pool.contains(&target));
        assert_eq!(pool.len(), 7);
    }

    #[test]
    fn test_reroll_without_replacements_shrinks_pool() {
        let mut roster = Roster::new();
        let swordsman = get_unit_template("Swordsman").unwrap();
        let a = roster.recruit(swordsman, TypeTag::Fire);
        let b = roster.recruit(swordsman, TypeTag::Air);
        let mut used = BTreeSet::new();
        let mut pool = vec![a, b];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let replaced = reroll_units(&mut pool, &[a], &roster, &mut used, &mut rng);
        assert!(replaced.is_empty());
        assert_eq!(pool, vec![b]);
    }

    #[test]
    fn test_repair_reassigns_duplicate_ids() {
        let mut roster = Roster::new();
        let swordsman = get_unit_template("Swordsman").unwrap();
        roster.recruit(swordsman, TypeTag::Fire);
        roster.recruit(swordsman, TypeTag::Fire);
        roster.units[1].id = UnitId(0);
        roster.next_id = 0;
        assert_eq!(roster.repair(), 1);
        assert_ne!(roster.units[0].id, roster.units[1].id);
        assert!(roster.next_id > roster.units[1].id.0);
    }
}
