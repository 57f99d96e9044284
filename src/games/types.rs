use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported game types
///
/// The tag doubles as the `game_type` column of a persisted round, so the
/// serialized form is stable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Lottery,
    Chest(ChestTier),
    Scratch,
    Runner,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::Lottery => write!(f, "lottery"),
            GameType::Chest(tier) => write!(f, "chest:{}", tier),
            GameType::Scratch => write!(f, "scratch"),
            GameType::Runner => write!(f, "runner"),
        }
    }
}

/// Chest tier with a fixed, server-owned price and multiplier ceiling
///
/// Client-supplied price/multiplier fields are only ever equality-checked
/// against this table, never used as the authoritative value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChestTier {
    Bronze,
    Silver,
    Gold,
    Diamond,
}

impl ChestTier {
    /// Stake debited for opening a chest of this tier
    pub fn price(&self) -> f64 {
        match self {
            ChestTier::Bronze => 100.0,
            ChestTier::Silver => 500.0,
            ChestTier::Gold => 1000.0,
            ChestTier::Diamond => 5000.0,
        }
    }

    /// Upper bound of the win multiplier range for this tier
    pub fn max_multiplier(&self) -> f64 {
        match self {
            ChestTier::Bronze => 3.0,
            ChestTier::Silver => 5.0,
            ChestTier::Gold => 8.0,
            ChestTier::Diamond => 15.0,
        }
    }

    /// Display name clients send in play requests
    pub fn display_name(&self) -> &'static str {
        match self {
            ChestTier::Bronze => "Bronze Chest",
            ChestTier::Silver => "Silver Chest",
            ChestTier::Gold => "Gold Chest",
            ChestTier::Diamond => "Diamond Chest",
        }
    }

    /// Resolve a client-supplied tier name against the server table
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|t| t.display_name() == name)
    }

    pub fn all() -> [ChestTier; 4] {
        [
            ChestTier::Bronze,
            ChestTier::Silver,
            ChestTier::Gold,
            ChestTier::Diamond,
        ]
    }
}

impl fmt::Display for ChestTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChestTier::Bronze => write!(f, "bronze"),
            ChestTier::Silver => write!(f, "silver"),
            ChestTier::Gold => write!(f, "gold"),
            ChestTier::Diamond => write!(f, "diamond"),
        }
    }
}

/// Currency label attached to a chest prize
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PrizeType {
    #[serde(rename = "USDT")]
    Usdt,
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "Bonus Coins")]
    BonusCoins,
    Nothing,
}

impl fmt::Display for PrizeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrizeType::Usdt => write!(f, "USDT"),
            PrizeType::Btc => write!(f, "BTC"),
            PrizeType::BonusCoins => write!(f, "Bonus Coins"),
            PrizeType::Nothing => write!(f, "Nothing"),
        }
    }
}

/// Game-specific outcome payload persisted with every round (discriminated union)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum OutcomeDetail {
    Lottery {
        tickets: u32,
        won: bool,
    },
    Chest {
        tier: ChestTier,
        won: bool,
        prize_type: PrizeType,
    },
    Scratch {
        prize: f64,
    },
    Runner {
        score: f64,
        time_played: f64,
    },
}

/// Server-determined result of one game round, before settlement
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub won: bool,
    pub payout: f64,
    pub detail: OutcomeDetail,
}

/// Request to play the lottery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotteryPlayRequest {
    pub ticket_count: u32,
}

/// Request to open a chest
///
/// `tier_price` and `max_multiplier` are cross-checked against the server
/// tier table and rejected on any mismatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChestPlayRequest {
    pub tier_name: String,
    pub tier_price: f64,
    pub max_multiplier: f64,
}

/// Request to settle a runner session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerPlayRequest {
    pub time_played: f64,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_table() {
        assert_eq!(ChestTier::Bronze.price(), 100.0);
        assert_eq!(ChestTier::Silver.price(), 500.0);
        assert_eq!(ChestTier::Gold.max_multiplier(), 8.0);
        assert_eq!(ChestTier::Diamond.max_multiplier(), 15.0);
    }

    #[test]
    fn test_tier_lookup_by_name() {
        assert_eq!(ChestTier::from_name("Silver Chest"), Some(ChestTier::Silver));
        assert_eq!(ChestTier::from_name("Platinum Chest"), None);
        assert_eq!(ChestTier::from_name(""), None);
    }

    #[test]
    fn test_game_type_display() {
        assert_eq!(GameType::Lottery.to_string(), "lottery");
        assert_eq!(GameType::Chest(ChestTier::Gold).to_string(), "chest:gold");
        assert_eq!(GameType::Runner.to_string(), "runner");
    }

    #[test]
    fn test_outcome_detail_serialization() {
        let detail = OutcomeDetail::Chest {
            tier: ChestTier::Silver,
            won: true,
            prize_type: PrizeType::Btc,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["game"], "chest");
        assert_eq!(json["tier"], "silver");
        assert_eq!(json["prize_type"], "BTC");
    }
}
