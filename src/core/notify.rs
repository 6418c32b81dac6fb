//! Fire-and-forget notifications for whatever presents the game.

use std::fmt;

use serde::Serialize;

/// Something the player should be told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum Notification {
    CombatStarted {
        target_damage: u64,
        boss: Option<String>,
    },
    TurnResolved {
        round: u32,
        turn_damage: u64,
        total_damage: u64,
    },
    CombatWon {
        gold_gained: u64,
        new_rank: String,
    },
    CombatLost {
        total_damage: u64,
        target_damage: u64,
    },
    RankUp {
        from: String,
        to: String,
    },
    GameCompleted,
    Purchased {
        name: String,
        price: u64,
    },
    BonusSold {
        name: String,
        gold: u64,
    },
    ShopRefreshed {
        cost: u64,
    },
    ConsumableUsed {
        name: String,
    },
    Rerolled {
        count: usize,
        remaining: u32,
    },
    Rejected {
        action: String,
        reason: String,
    },
}

impl Notification {
    pub fn rejected(action: &str, reason: impl fmt::Display) -> Self {
        Notification::Rejected {
            action: action.to_string(),
            reason: reason.to_string(),
        }
    }

    /// One JSON line, for logs and replays.
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::CombatStarted {
                target_damage,
                boss: Some(boss),
            } => write!(f, "Boss fight against {}: deal {} damage", boss, target_damage),
            Notification::CombatStarted { target_damage, .. } => {
                write!(f, "Combat started: deal {} damage", target_damage)
            }
            Notification::TurnResolved {
                round,
                turn_damage,
                total_damage,
            } => write!(
                f,
                "Round {}: {} damage ({} total)",
                round, turn_damage, total_damage
            ),
            Notification::CombatWon {
                gold_gained,
                new_rank,
            } => write!(f, "Victory! +{} gold, rank {}", gold_gained, new_rank),
            Notification::CombatLost {
                total_damage,
                target_damage,
            } => write!(f, "Defeat: {}/{} damage", total_damage, target_damage),
            Notification::RankUp { from, to } => write!(f, "Rank up: {} → {}", from, to),
            Notification::GameCompleted => f.write_str("The guild has reached the top rank!"),
            Notification::Purchased { name, price } => {
                write!(f, "Bought {} for {} gold", name, price)
            }
            Notification::BonusSold { name, gold } => write!(f, "Sold {} for {} gold", name, gold),
            Notification::ShopRefreshed { cost } => write!(f, "Shop refreshed ({} gold)", cost),
            Notification::ConsumableUsed { name } => write!(f, "Used {}", name),
            Notification::Rerolled { count, remaining } => {
                write!(f, "Rerolled {} units ({} rerolls left)", count, remaining)
            }
            Notification::Rejected { action, reason } => write!(f, "{} failed: {}", action, reason),
        }
    }
}

/// Receives notifications. Implementations must not block the game.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Forwards every notification to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&mut self, notification: Notification) {
        match &notification {
            Notification::Rejected { .. } => tracing::warn!("{}", notification),
            _ => tracing::info!("{}", notification),
        }
    }
}

/// Keeps every notification, for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub notifications: Vec<Notification>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json_lines(&self) -> Vec<String> {
        self.notifications.iter().map(Notification::to_json_line).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}
