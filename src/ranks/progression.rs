//! Rank advancement and damage targets.

use crate::boss::BossDefinition;
use crate::core::constants::{BASE_DAMAGE, DAMAGE_INCREMENT_PER_RANK};

use super::data::Rank;

/// Target for a normal combat: `(BASE + index × INCREMENT) × major multiplier`.
pub fn target_damage(rank: Rank) -> u64 {
    (BASE_DAMAGE + rank.index() as u64 * DAMAGE_INCREMENT_PER_RANK) * rank.major_multiplier()
}

/// Target for a boss fight at `rank`.
pub fn boss_target_damage(boss: &BossDefinition, rank: Rank) -> u64 {
    boss.target_damage * rank.major_multiplier()
}

/// Whether the combat at `rank` is a boss fight.
pub fn is_boss_fight(rank: Rank) -> bool {
    rank.is_boss_rank()
}

/// Result of moving up the ladder after a victory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankAdvance {
    pub from: Rank,
    pub to: Rank,
}

impl RankAdvance {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Moves one rank forward; the final rank stays put.
pub fn advance_rank(current: Rank) -> RankAdvance {
    RankAdvance {
        from: current,
        to: current.next().unwrap_or(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::{BOSS_POOL, FINAL_BOSS};

    #[test]
    fn test_first_rank_target() {
        assert_eq!(target_damage(Rank::FIRST), 2000);
    }

    #[test]
    fn test_target_values() {
        // F+ = (2000 + 2*500) * 1
        assert_eq!(target_damage(Rank::from_name("F+").unwrap()), 3000);
        // E- = (2000 + 3*500) * 2
        assert_eq!(target_damage(Rank::from_name("E-").unwrap()), 7000);
        // S = (2000 + 18*500) * 64
        assert_eq!(target_damage(Rank::FINAL), 704_000);
    }

    #[test]
    fn test_target_strictly_increasing() {
        let targets: Vec<u64> = Rank::all().map(target_damage).collect();
        assert!(targets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_boss_target_scales_with_major() {
        let golem = &BOSS_POOL[0];
        assert_eq!(boss_target_damage(golem, Rank::from_name("F+").unwrap()), 4000);
        assert_eq!(boss_target_damage(golem, Rank::from_name("D+").unwrap()), 16000);
        assert_eq!(boss_target_damage(&FINAL_BOSS, Rank::FINAL), 640_000);
    }

    #[test]
    fn test_advance_stops_at_final() {
        let step = advance_rank(Rank::FIRST);
        assert!(step.changed());
        assert_eq!(step.to.name(), "F");

        let top = advance_rank(Rank::FINAL);
        assert!(!top.changed());
        assert_eq!(top.to, Rank::FINAL);
    }

    #[test]
    fn test_boss_fight_ranks() {
        assert!(!is_boss_fight(Rank::FIRST));
        assert!(is_boss_fight(Rank::from_name("F+").unwrap()));
        assert!(is_boss_fight(Rank::FINAL));
    }
}
