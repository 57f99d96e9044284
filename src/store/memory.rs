//! In-memory settlement store
//!
//! Satisfies the consistency contract with per-account entry locking: the
//! conditional balance update and the round append happen while the account
//! entry guard is held, so overlapping settlements against one account
//! serialize and can never both pass the check against a stale balance.

use super::{AccountId, GameRound, SettlementStore};
use crate::errors::{EngineError, EngineResult};
use crate::games::types::{GameType, OutcomeDetail};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

/// Process-local account and round storage
pub struct InMemorySettlementStore {
    balances: DashMap<AccountId, f64>,
    rounds: DashMap<AccountId, Vec<GameRound>>,
}

impl InMemorySettlementStore {
    pub fn new() -> Self {
        Self {
            balances: DashMap::new(),
            rounds: DashMap::new(),
        }
    }

    /// Create an account with an opening balance and return its id
    pub fn open_account(&self, opening_balance: f64) -> AccountId {
        let id = Uuid::new_v4();
        self.balances.insert(id, opening_balance);
        self.rounds.insert(id, Vec::new());
        id
    }
}

impl Default for InMemorySettlementStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettlementStore for InMemorySettlementStore {
    async fn balance(&self, account: &AccountId) -> EngineResult<f64> {
        self.balances
            .get(account)
            .map(|b| *b)
            .ok_or_else(|| EngineError::Storage(format!("unknown account {}", account)))
    }

    async fn record(
        &self,
        account: AccountId,
        game_type: GameType,
        stake: f64,
        payout: f64,
        detail: OutcomeDetail,
    ) -> EngineResult<GameRound> {
        // Entry guard held across check, delta, and round append. Lock order
        // is balances then rounds, everywhere.
        let mut balance = self
            .balances
            .get_mut(&account)
            .ok_or_else(|| EngineError::Storage(format!("unknown account {}", account)))?;

        if *balance < stake {
            return Err(EngineError::InsufficientBalance {
                required: stake,
                available: *balance,
            });
        }

        let round = GameRound {
            id: Uuid::new_v4(),
            account_id: account,
            game_type,
            stake_amount: stake,
            payout_amount: payout,
            outcome_detail: detail,
            created_at: Utc::now(),
        };

        *balance = *balance - stake + payout;
        self.rounds.entry(account).or_default().push(round.clone());

        tracing::debug!(
            account = %account,
            game = %game_type,
            stake,
            payout,
            balance = *balance,
            "settled round {}",
            round.id
        );

        Ok(round)
    }

    async fn rounds(&self, account: &AccountId) -> EngineResult<Vec<GameRound>> {
        Ok(self
            .rounds
            .get(account)
            .map(|r| r.clone())
            .unwrap_or_default())
    }
}
