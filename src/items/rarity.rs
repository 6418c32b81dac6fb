//! Rarity tiers shared by units, bonuses and consumables.

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Epic = 3,
    Legendary = 4,
}

impl Rarity {
    /// All tiers, lowest first.
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Returns the display name for this rarity tier.
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Rarity::Common => "⚪",
            Rarity::Uncommon => "🟢",
            Rarity::Rare => "🔵",
            Rarity::Epic => "🟣",
            Rarity::Legendary => "🟡",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Rarity::Common => "#666666",
            Rarity::Uncommon => "#00b894",
            Rarity::Rare => "#74b9ff",
            Rarity::Epic => "#a29bfe",
            Rarity::Legendary => "#fdcb6e",
        }
    }

    /// Chance of this tier on a rarity-weighted shop draw. Tiers sum to 1.0.
    pub fn draw_chance(&self) -> f64 {
        match self {
            Rarity::Common => 0.50,
            Rarity::Uncommon => 0.25,
            Rarity::Rare => 0.15,
            Rarity::Epic => 0.07,
            Rarity::Legendary => 0.03,
        }
    }

    /// Base gold value of a unit of this tier, before stats and markup.
    pub fn base_price(&self) -> u64 {
        match self {
            Rarity::Common => 10,
            Rarity::Uncommon => 20,
            Rarity::Rare => 35,
            Rarity::Epic => 55,
            Rarity::Legendary => 80,
        }
    }

    /// Consumable price factor, in percent.
    pub fn price_factor_percent(&self) -> u64 {
        match self {
            Rarity::Common => 100,
            Rarity::Uncommon => 150,
            Rarity::Rare => 200,
            Rarity::Epic => 300,
            Rarity::Legendary => 500,
        }
    }
}

/// Rolls a tier from the cumulative draw chances, falling back to Common.
pub fn roll_rarity(rng: &mut impl Rng) -> Rarity {
    let roll = rng.gen::<f64>();
    let mut cumulative = 0.0;
    for rarity in Rarity::ALL {
        cumulative += rarity.draw_chance();
        if roll < cumulative {
            return rarity;
        }
    }
    Rarity::Common
}
