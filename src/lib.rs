//! Fortuna - Authoritative Wagering Settlement Engine
//!
//! Validates stakes against live balances, produces server-determined game
//! outcomes the client cannot influence, settles balance deltas atomically
//! with an append-only round record, and guards account verification with
//! rate-limited, single-use, time-boxed email codes.

pub mod api;
pub mod config;
pub mod errors;
pub mod games;
pub mod identity;
pub mod store;
pub mod verification;

pub use errors::{EngineError, EngineResult};
