//! Storage contract for accounts and game rounds
//!
//! The store is the enforcement point for the settlement concurrency
//! contract: the balance check and the balance mutation happen inside one
//! atomic unit, never as a separate read followed by a write.

pub mod memory;

pub use memory::InMemorySettlementStore;

use crate::errors::EngineResult;
use crate::games::types::{GameType, OutcomeDetail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable account identifier resolved by the identity gate
pub type AccountId = Uuid;

/// Immutable record of one settled wager, append-only
///
/// The single source of truth for what happened: the client-visible
/// win/payout is always derivable from this record, never vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRound {
    pub id: Uuid,
    pub account_id: AccountId,
    pub game_type: GameType,
    pub stake_amount: f64,
    pub payout_amount: f64,
    pub outcome_detail: OutcomeDetail,
    pub created_at: DateTime<Utc>,
}

/// Atomic settlement storage
///
/// `record` must apply `balance' = balance - stake + payout` and append the
/// round as one unit, conditional on `balance >= stake` evaluated inside the
/// same unit. Concurrent calls against one account serialize here, so no
/// interleaving can deduct more than the starting balance.
#[async_trait]
pub trait SettlementStore: Send + Sync {
    /// Read the current balance
    async fn balance(&self, account: &AccountId) -> EngineResult<f64>;

    /// Atomically debit the stake, credit the payout, and append the round
    ///
    /// Fails with `InsufficientBalance` when the stake exceeds the balance at
    /// the moment of the conditional update; no state is mutated on failure.
    async fn record(
        &self,
        account: AccountId,
        game_type: GameType,
        stake: f64,
        payout: f64,
        detail: OutcomeDetail,
    ) -> EngineResult<GameRound>;

    /// Round history for an account, oldest first
    async fn rounds(&self, account: &AccountId) -> EngineResult<Vec<GameRound>>;
}
