//! Outcome generators, one pure strategy per game type
//!
//! Every probabilistic game draws from an injectable [`UniformSource`] so the
//! client can never influence the branch, and tests can drive deterministic
//! sequences to assert exact payout formulas.

use crate::games::types::{ChestTier, Outcome, OutcomeDetail, PrizeType};
use rand::Rng;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Price of a single lottery ticket
pub const LOTTERY_TICKET_PRICE: f64 = 10.0;
/// Price of a scratch card
pub const SCRATCH_CARD_PRICE: f64 = 20.0;
/// Stake per runner time-unit
pub const RUNNER_COST_PER_UNIT: f64 = 1.0;
/// Longest runner session accepted for settlement
pub const RUNNER_MAX_TIME: f64 = 60.0;

/// Server-side uniform random source, never transmitted to the client
/// before resolution
pub trait UniformSource: Send + Sync {
    /// Uniform draw in [0, 1)
    fn draw(&self) -> f64;
}

/// Production source backed by the thread-local RNG
pub struct ThreadRngSource;

impl UniformSource for ThreadRngSource {
    fn draw(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic source fed with a fixed sequence of draws
///
/// Panics when the sequence runs dry, which in a test means the generator
/// consumed more draws than the test accounted for.
pub struct SequenceSource {
    draws: Mutex<VecDeque<f64>>,
}

impl SequenceSource {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: Mutex::new(draws.into_iter().collect()),
        }
    }
}

impl UniformSource for SequenceSource {
    fn draw(&self) -> f64 {
        self.draws
            .lock()
            .expect("sequence lock poisoned")
            .pop_front()
            .expect("sequence source exhausted")
    }
}

/// Round a money amount to cents
///
/// Applied once at outcome generation so the persisted round and the client
/// response carry the identical value.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Lottery: 30% win rate, payout = stake x U(2, 5)
pub fn lottery_outcome(tickets: u32, stake: f64, rng: &dyn UniformSource) -> Outcome {
    let won = rng.draw() > 0.7;
    let payout = if won {
        round_cents(stake * (2.0 + rng.draw() * 3.0))
    } else {
        0.0
    };
    Outcome {
        won,
        payout,
        detail: OutcomeDetail::Lottery { tickets, won },
    }
}

/// Chest: 50% win rate, payout = price x (0.5 + u x max_multiplier)
///
/// The prize label depends on how close the multiplier lands to the tier
/// ceiling: top band pays in USDT, the middle band in BTC, everything else
/// in bonus coins.
pub fn chest_outcome(tier: ChestTier, rng: &dyn UniformSource) -> Outcome {
    let won = rng.draw() > 0.5;
    if !won {
        return Outcome {
            won: false,
            payout: 0.0,
            detail: OutcomeDetail::Chest {
                tier,
                won: false,
                prize_type: PrizeType::Nothing,
            },
        };
    }

    let max = tier.max_multiplier();
    let multiplier = 0.5 + rng.draw() * max;
    let prize_type = if multiplier > max * 0.8 {
        PrizeType::Usdt
    } else if multiplier > max * 0.5 {
        PrizeType::Btc
    } else {
        PrizeType::BonusCoins
    };

    Outcome {
        won: true,
        payout: round_cents(tier.price() * multiplier),
        detail: OutcomeDetail::Chest {
            tier,
            won: true,
            prize_type,
        },
    }
}

/// Scratch card: 40% win rate, payout = price x U(1.5, 5.5)
pub fn scratch_outcome(rng: &dyn UniformSource) -> Outcome {
    let won = rng.draw() > 0.6;
    let payout = if won {
        round_cents(SCRATCH_CARD_PRICE * (1.5 + rng.draw() * 4.0))
    } else {
        0.0
    };
    Outcome {
        won,
        payout,
        detail: OutcomeDetail::Scratch { prize: payout },
    }
}

/// Runner: deterministic, payout = score / 10, won when payout beats the stake
///
/// The only game with no randomness. Fairness here means the payout is a
/// pure, auditable function of the reported score; the server cannot verify
/// the score itself further.
pub fn runner_outcome(time_played: f64, score: f64) -> Outcome {
    let stake = round_cents(time_played * RUNNER_COST_PER_UNIT);
    let payout = round_cents(score / 10.0);
    Outcome {
        won: payout > stake,
        payout,
        detail: OutcomeDetail::Runner { score, time_played },
    }
}
