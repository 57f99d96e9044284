//! API Response Models
//!
//! Wire types for the settlement and verification endpoints. Game payout
//! fields always carry the exact values that were persisted with the round.

use crate::games::types::PrizeType;
use crate::store::GameRound;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotteryPlayResponse {
    pub won: bool,
    pub payout: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChestPlayResponse {
    pub won: bool,
    pub prize_amount: f64,
    pub prize_type: PrizeType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScratchPlayResponse {
    pub won: bool,
    pub payout: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerPlayResponse {
    pub won: bool,
    pub payout: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundsResponse {
    pub rounds: Vec<GameRound>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeResponse {
    pub success: bool,
    pub expires_in_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
