//! Route Definitions
//!
//! Maps URLs to handlers with type-safe routing.

use super::handlers::*;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the API router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Settlement endpoints, one per game type
        .route("/api/games/lottery/play", post(play_lottery_handler))
        .route("/api/games/chest/play", post(play_chest_handler))
        .route("/api/games/scratch/play", post(play_scratch_handler))
        .route("/api/games/runner/settle", post(play_runner_handler))
        // Account read surface
        .route("/api/account/balance", get(balance_handler))
        .route("/api/account/rounds", get(rounds_handler))
        // Verification flow
        .route("/api/verification/send", post(send_code_handler))
        .route("/api/verification/verify", post(verify_code_handler))
        // Attach shared state
        .with_state(state)
}
