//! The rank ladder.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minor rank names, lowest first.
pub const RANK_NAMES: [&str; 19] = [
    "F-", "F", "F+", "E-", "E", "E+", "D-", "D", "D+", "C-", "C", "C+", "B-", "B", "B+", "A-",
    "A", "A+", "S",
];

/// Minor ranks whose combat is a boss fight.
pub const BOSS_RANKS: [&str; 7] = ["F+", "E+", "D+", "C+", "B+", "A+", "S"];

/// Target multiplier per major rank letter.
pub const MAJOR_RANK_MULTIPLIERS: [(char, u64); 7] = [
    ('F', 1),
    ('E', 2),
    ('D', 4),
    ('C', 8),
    ('B', 16),
    ('A', 32),
    ('S', 64),
];

/// A position on the rank ladder. Serialized as its name ("C+").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Rank(usize);

impl Rank {
    pub const FIRST: Rank = Rank(0);
    pub const FINAL: Rank = Rank(RANK_NAMES.len() - 1);

    pub fn from_index(index: usize) -> Option<Rank> {
        (index < RANK_NAMES.len()).then_some(Rank(index))
    }

    pub fn from_name(name: &str) -> Option<Rank> {
        RANK_NAMES.iter().position(|r| *r == name).map(Rank)
    }

    pub fn index(&self) -> usize {
        self.0
    }

    pub fn name(&self) -> &'static str {
        RANK_NAMES[self.0]
    }

    /// Major rank letter, e.g. 'C' for "C+".
    pub fn major(&self) -> char {
        self.name().chars().next().unwrap_or('F')
    }

    pub fn major_multiplier(&self) -> u64 {
        let major = self.major();
        MAJOR_RANK_MULTIPLIERS
            .iter()
            .find(|(letter, _)| *letter == major)
            .map(|(_, mult)| *mult)
            .unwrap_or(1)
    }

    pub fn is_boss_rank(&self) -> bool {
        BOSS_RANKS.contains(&self.name())
    }

    pub fn is_final(&self) -> bool {
        *self == Rank::FINAL
    }

    /// The next rank, or `None` at the top of the ladder.
    pub fn next(&self) -> Option<Rank> {
        Rank::from_index(self.0 + 1)
    }

    pub fn all() -> impl Iterator<Item = Rank> {
        (0..RANK_NAMES.len()).map(Rank)
    }
}

impl From<String> for Rank {
    fn from(name: String) -> Self {
        Rank::from_name(&name).unwrap_or_else(|| {
            tracing::warn!(rank = %name, "Unknown rank in save data, resetting to F-");
            Rank::FIRST
        })
    }
}

impl From<Rank> for String {
    fn from(rank: Rank) -> Self {
        rank.name().to_string()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
