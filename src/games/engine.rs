//! Wager engine: validation, stake computation, outcome, settlement
//!
//! Orchestrates one settlement per call. Validation rejects out-of-range
//! requests before the balance or the random source is touched, the stake is
//! computed server-side, and the response always carries the exact won/payout
//! values that were persisted.

use crate::errors::{EngineError, EngineResult};
use crate::games::outcome::{
    self, UniformSource, LOTTERY_TICKET_PRICE, RUNNER_COST_PER_UNIT, RUNNER_MAX_TIME,
    SCRATCH_CARD_PRICE,
};
use crate::games::types::{
    ChestPlayRequest, ChestTier, GameType, LotteryPlayRequest, Outcome, RunnerPlayRequest,
};
use crate::store::{AccountId, GameRound, SettlementStore};
use std::sync::Arc;

/// A settled round together with its client-visible win flag
#[derive(Debug, Clone)]
pub struct Settlement {
    pub won: bool,
    pub round: GameRound,
}

/// Authoritative settlement engine
pub struct WagerEngine {
    store: Arc<dyn SettlementStore>,
    rng: Arc<dyn UniformSource>,
}

impl WagerEngine {
    pub fn new(store: Arc<dyn SettlementStore>, rng: Arc<dyn UniformSource>) -> Self {
        Self { store, rng }
    }

    /// Play the lottery: 1-100 tickets at a fixed ticket price
    pub async fn play_lottery(
        &self,
        account: AccountId,
        request: LotteryPlayRequest,
    ) -> EngineResult<Settlement> {
        if request.ticket_count < 1 || request.ticket_count > 100 {
            return Err(EngineError::InvalidInput(
                "ticket count must be between 1 and 100".to_string(),
            ));
        }

        let stake = request.ticket_count as f64 * LOTTERY_TICKET_PRICE;
        self.check_balance(&account, stake).await?;

        let outcome = outcome::lottery_outcome(request.ticket_count, stake, self.rng.as_ref());
        self.settle(account, GameType::Lottery, stake, outcome).await
    }

    /// Open a chest of a named tier
    ///
    /// Client-supplied price and multiplier are equality-checked against the
    /// server tier table; any mismatch is rejected as tampering.
    pub async fn play_chest(
        &self,
        account: AccountId,
        request: ChestPlayRequest,
    ) -> EngineResult<Settlement> {
        let tier = ChestTier::from_name(&request.tier_name)
            .ok_or_else(|| EngineError::InvalidInput("invalid tier data".to_string()))?;

        if request.tier_price != tier.price() || request.max_multiplier != tier.max_multiplier() {
            return Err(EngineError::InvalidInput("invalid tier data".to_string()));
        }

        let stake = tier.price();
        self.check_balance(&account, stake).await?;

        let outcome = outcome::chest_outcome(tier, self.rng.as_ref());
        self.settle(account, GameType::Chest(tier), stake, outcome)
            .await
    }

    /// Buy and scratch one card at the fixed card price
    pub async fn play_scratch(&self, account: AccountId) -> EngineResult<Settlement> {
        let stake = SCRATCH_CARD_PRICE;
        self.check_balance(&account, stake).await?;

        let outcome = outcome::scratch_outcome(self.rng.as_ref());
        self.settle(account, GameType::Scratch, stake, outcome).await
    }

    /// Settle a runner session from its reported time and score
    ///
    /// Deterministic: the stake is time x rate, the payout score / 10. The
    /// score itself cannot be verified server-side; the guarantee is that the
    /// payout is a pure function of what was reported.
    pub async fn play_runner(
        &self,
        account: AccountId,
        request: RunnerPlayRequest,
    ) -> EngineResult<Settlement> {
        if !request.time_played.is_finite()
            || request.time_played <= 0.0
            || request.time_played > RUNNER_MAX_TIME
        {
            return Err(EngineError::InvalidInput(
                "time played must be between 0 and 60".to_string(),
            ));
        }
        if !request.score.is_finite() || request.score < 0.0 {
            return Err(EngineError::InvalidInput(
                "score must be non-negative".to_string(),
            ));
        }

        let stake = outcome::round_cents(request.time_played * RUNNER_COST_PER_UNIT);
        self.check_balance(&account, stake).await?;

        let outcome = outcome::runner_outcome(request.time_played, request.score);
        self.settle(account, GameType::Runner, stake, outcome).await
    }

    /// Pre-mutation balance check
    ///
    /// Fails fast before any randomness is consumed. The authoritative check
    /// is re-run inside the store's atomic unit, so a concurrent settlement
    /// racing past this read still cannot overdraw.
    async fn check_balance(&self, account: &AccountId, stake: f64) -> EngineResult<()> {
        let balance = self.store.balance(account).await?;
        if balance < stake {
            return Err(EngineError::InsufficientBalance {
                required: stake,
                available: balance,
            });
        }
        Ok(())
    }

    /// Apply the settlement atomically and return what was persisted
    async fn settle(
        &self,
        account: AccountId,
        game_type: GameType,
        stake: f64,
        outcome: Outcome,
    ) -> EngineResult<Settlement> {
        let round = self
            .store
            .record(account, game_type, stake, outcome.payout, outcome.detail)
            .await?;

        tracing::info!(
            account = %account,
            game = %game_type,
            stake,
            payout = round.payout_amount,
            won = outcome.won,
            "round settled"
        );

        Ok(Settlement {
            won: outcome.won,
            round,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::outcome::SequenceSource;
    use crate::games::types::OutcomeDetail;
    use crate::store::InMemorySettlementStore;

    fn engine_with(
        balance: f64,
        draws: Vec<f64>,
    ) -> (WagerEngine, Arc<InMemorySettlementStore>, AccountId) {
        let store = Arc::new(InMemorySettlementStore::new());
        let account = store.open_account(balance);
        let engine = WagerEngine::new(store.clone(), Arc::new(SequenceSource::new(draws)));
        (engine, store, account)
    }

    #[tokio::test]
    async fn test_lottery_settles_win() {
        let (engine, store, account) = engine_with(1000.0, vec![0.9, 0.5]);

        let settlement = engine
            .play_lottery(account, LotteryPlayRequest { ticket_count: 10 })
            .await
            .unwrap();

        assert!(settlement.won);
        assert_eq!(settlement.round.stake_amount, 100.0);
        assert_eq!(settlement.round.payout_amount, 350.0);
        // balance' = balance - stake + payout
        assert_eq!(store.balance(&account).await.unwrap(), 1250.0);
    }

    #[tokio::test]
    async fn test_loss_still_appends_round() {
        let (engine, store, account) = engine_with(1000.0, vec![0.1]);

        let settlement = engine
            .play_lottery(account, LotteryPlayRequest { ticket_count: 3 })
            .await
            .unwrap();

        assert!(!settlement.won);
        assert_eq!(settlement.round.payout_amount, 0.0);
        assert_eq!(store.rounds(&account).await.unwrap().len(), 1);
        assert_eq!(store.balance(&account).await.unwrap(), 970.0);
    }

    #[tokio::test]
    async fn test_invalid_ticket_count_touches_nothing() {
        // Empty draw sequence: consuming randomness would panic.
        let (engine, store, account) = engine_with(1000.0, vec![]);

        for count in [0, 101] {
            let err = engine
                .play_lottery(account, LotteryPlayRequest { ticket_count: count })
                .await
                .unwrap_err();
            assert!(matches!(err, EngineError::InvalidInput(_)));
        }

        assert_eq!(store.balance(&account).await.unwrap(), 1000.0);
        assert!(store.rounds(&account).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chest_rejects_tampered_tier() {
        let (engine, store, account) = engine_with(10_000.0, vec![]);

        // Wrong price for the tier
        let err = engine
            .play_chest(
                account,
                ChestPlayRequest {
                    tier_name: "Silver Chest".to_string(),
                    tier_price: 1.0,
                    max_multiplier: 5.0,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));

        // Inflated multiplier
        let err = engine
            .play_chest(
                account,
                ChestPlayRequest {
                    tier_name: "Silver Chest".to_string(),
                    tier_price: 500.0,
                    max_multiplier: 50.0,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));

        // Unknown tier
        let err = engine
            .play_chest(
                account,
                ChestPlayRequest {
                    tier_name: "Obsidian Chest".to_string(),
                    tier_price: 500.0,
                    max_multiplier: 5.0,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));

        assert!(store.rounds(&account).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chest_silver_top_draw() {
        // Silver at 500 with max x5, draws [win, 0.9] -> payout 2500
        let (engine, _, account) = engine_with(10_000.0, vec![0.9, 0.9]);

        let settlement = engine
            .play_chest(
                account,
                ChestPlayRequest {
                    tier_name: "Silver Chest".to_string(),
                    tier_price: 500.0,
                    max_multiplier: 5.0,
                },
            )
            .await
            .unwrap();

        assert!(settlement.won);
        assert_eq!(settlement.round.payout_amount, 2500.0);
    }

    #[tokio::test]
    async fn test_insufficient_balance_before_randomness() {
        // Stake 200 against a 100 balance: must fail before drawing.
        let (engine, store, account) = engine_with(100.0, vec![]);

        let err = engine
            .play_lottery(account, LotteryPlayRequest { ticket_count: 20 })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::InsufficientBalance {
                required,
                available
            } if required == 200.0 && available == 100.0
        ));
        assert_eq!(store.balance(&account).await.unwrap(), 100.0);
    }

    #[tokio::test]
    async fn test_runner_bounds() {
        let (engine, _, account) = engine_with(1000.0, vec![]);

        for (time, score) in [(0.0, 10.0), (-1.0, 10.0), (61.0, 10.0), (30.0, -5.0)] {
            let err = engine
                .play_runner(
                    account,
                    RunnerPlayRequest {
                        time_played: time,
                        score,
                    },
                )
                .await
                .unwrap_err();
            assert!(matches!(err, EngineError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_runner_winning_session() {
        let (engine, store, account) = engine_with(100.0, vec![]);

        let settlement = engine
            .play_runner(
                account,
                RunnerPlayRequest {
                    time_played: 30.0,
                    score: 400.0,
                },
            )
            .await
            .unwrap();

        assert!(settlement.won);
        assert_eq!(settlement.round.stake_amount, 30.0);
        assert_eq!(settlement.round.payout_amount, 40.0);
        assert_eq!(store.balance(&account).await.unwrap(), 110.0);
        assert_eq!(
            settlement.round.outcome_detail,
            OutcomeDetail::Runner {
                score: 400.0,
                time_played: 30.0
            }
        );
    }

    #[tokio::test]
    async fn test_scratch_settlement() {
        let (engine, store, account) = engine_with(100.0, vec![0.9, 0.5]);

        let settlement = engine.play_scratch(account).await.unwrap();

        assert!(settlement.won);
        assert_eq!(settlement.round.stake_amount, 20.0);
        assert_eq!(settlement.round.payout_amount, 70.0);
        assert_eq!(store.balance(&account).await.unwrap(), 150.0);
    }
}
