//! Verification code validation: single-use, expiry, attempt guard

use crate::config::VerificationConfig;
use crate::errors::{EngineError, EngineResult};
use crate::verification::store::CodeStore;
use chrono::{Duration, Utc};
use std::sync::Arc;

/// Validates submitted codes against the stored table
pub struct VerificationValidator {
    store: Arc<dyn CodeStore>,
    config: VerificationConfig,
}

impl VerificationValidator {
    pub fn new(store: Arc<dyn CodeStore>, config: VerificationConfig) -> Self {
        Self { store, config }
    }

    /// Check a submitted code; `Ok(())` is single-use permission to proceed
    ///
    /// Wrong, reused, and expired codes all fail with the same
    /// `InvalidOrExpired` so an attacker learns nothing about which applied.
    /// The attempt guard counts rows for the email in the trailing five
    /// minutes against issuance-plus-attempt volume.
    pub async fn validate(&self, email: &str, code: &str) -> EngineResult<()> {
        if email.is_empty() || code.is_empty() {
            return Err(EngineError::InvalidInput(
                "email and code are required".to_string(),
            ));
        }

        let now = Utc::now();
        let window_start = now - Duration::minutes(5);
        let recent = self.store.count_for_email_since(email, window_start).await?;
        if recent > self.config.max_attempt_rows_per_5_min {
            return Err(EngineError::RateLimited(
                "too many attempts, try again later".to_string(),
            ));
        }

        if self.store.consume(email, code, now).await? {
            tracing::info!(email, "verification code accepted");
            Ok(())
        } else {
            tracing::debug!(email, "verification failed");
            Err(EngineError::InvalidOrExpired)
        }
    }
}
