//! Verification code issuance under dual rate limits

use crate::config::VerificationConfig;
use crate::errors::{EngineError, EngineResult};
use crate::games::outcome::UniformSource;
use crate::verification::email::EmailSender;
use crate::verification::store::{CodeStore, VerificationCode};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// What the client learns from a successful issuance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReceipt {
    pub expires_in_minutes: i64,
}

/// Issues one-time codes bound to an email address
pub struct VerificationIssuer {
    store: Arc<dyn CodeStore>,
    email: Arc<dyn EmailSender>,
    rng: Arc<dyn UniformSource>,
    config: VerificationConfig,
}

impl VerificationIssuer {
    pub fn new(
        store: Arc<dyn CodeStore>,
        email: Arc<dyn EmailSender>,
        rng: Arc<dyn UniformSource>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            store,
            email,
            rng,
            config,
        }
    }

    /// Generate, persist, and dispatch a code for `email`
    ///
    /// The row is persisted before dispatch is attempted, so a dispatch
    /// failure surfaces as `EmailDispatch` while the code (and its rate-limit
    /// slot) remain. A storage failure persists nothing and counts against no
    /// limit.
    pub async fn issue(&self, email: &str, origin: &str) -> EngineResult<IssueReceipt> {
        if !email.contains('@') {
            return Err(EngineError::InvalidInput(
                "invalid email address".to_string(),
            ));
        }

        let now = Utc::now();
        let hour_ago = now - Duration::hours(1);

        let sent_to_email = self.store.count_for_email_since(email, hour_ago).await?;
        if sent_to_email >= self.config.max_codes_per_email_per_hour {
            return Err(EngineError::RateLimited(
                "too many verification codes requested for this address".to_string(),
            ));
        }

        let sent_from_origin = self.store.count_for_origin_since(origin, hour_ago).await?;
        if sent_from_origin >= self.config.max_codes_per_origin_per_hour {
            return Err(EngineError::RateLimited(
                "too many requests from this origin".to_string(),
            ));
        }

        let code = self.generate_code();
        let row = VerificationCode {
            id: Uuid::new_v4(),
            email: email.to_string(),
            code: code.clone(),
            expires_at: now + Duration::minutes(self.config.code_ttl_minutes),
            used: false,
            origin: origin.to_string(),
            created_at: now,
        };
        self.store.insert(row).await?;

        let subject = "Your Verification Code";
        let body = format!(
            "<h1>Email Verification</h1>\
             <p>Your verification code is:</p>\
             <h2>{}</h2>\
             <p>This code will expire in {} minutes.</p>\
             <p>If you didn't request this code, please ignore this email.</p>",
            code, self.config.code_ttl_minutes
        );
        self.email
            .send(email, subject, &body)
            .await
            .map_err(EngineError::EmailDispatch)?;

        tracing::info!(email, origin, "verification code issued");

        Ok(IssueReceipt {
            expires_in_minutes: self.config.code_ttl_minutes,
        })
    }

    /// Uniformly random 6-digit code, leading zeros allowed
    fn generate_code(&self) -> String {
        let n = (self.rng.draw() * 1_000_000.0).floor() as u32;
        format!("{:06}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::outcome::{SequenceSource, ThreadRngSource};
    use crate::verification::email::{FailingEmailSender, TracingEmailSender};
    use crate::verification::store::InMemoryCodeStore;

    fn issuer_with(
        email: Arc<dyn EmailSender>,
        rng: Arc<dyn UniformSource>,
    ) -> (VerificationIssuer, Arc<InMemoryCodeStore>) {
        let store = Arc::new(InMemoryCodeStore::new());
        let issuer = VerificationIssuer::new(
            store.clone(),
            email,
            rng,
            VerificationConfig::default(),
        );
        (issuer, store)
    }

    #[tokio::test]
    async fn test_issue_persists_and_expires_in_ten_minutes() {
        let (issuer, store) = issuer_with(
            Arc::new(TracingEmailSender),
            Arc::new(ThreadRngSource),
        );

        let receipt = issuer.issue("a@b.c", "203.0.113.7").await.unwrap();
        assert_eq!(receipt.expires_in_minutes, 10);

        let hour_ago = Utc::now() - Duration::hours(1);
        assert_eq!(
            store.count_for_email_since("a@b.c", hour_ago).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_code_is_six_digits_with_leading_zeros() {
        // draw 0.000001 -> code 000001
        let (issuer, _) = issuer_with(
            Arc::new(TracingEmailSender),
            Arc::new(SequenceSource::new([0.000_001_4])),
        );
        let issuer_code = issuer.generate_code();
        assert_eq!(issuer_code.len(), 6);
        assert_eq!(issuer_code, "000001");
        assert!(issuer_code.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_rejects_email_without_at() {
        let (issuer, _) = issuer_with(
            Arc::new(TracingEmailSender),
            Arc::new(ThreadRngSource),
        );
        let err = issuer.issue("not-an-email", "203.0.113.7").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_per_email_limit_trips_on_fourth() {
        let (issuer, _) = issuer_with(
            Arc::new(TracingEmailSender),
            Arc::new(ThreadRngSource),
        );

        for _ in 0..3 {
            issuer.issue("a@b.c", "203.0.113.7").await.unwrap();
        }
        let err = issuer.issue("a@b.c", "203.0.113.7").await.unwrap_err();
        assert!(matches!(err, EngineError::RateLimited(_)));
    }

    #[tokio::test]
    async fn test_per_origin_limit_trips_on_sixth() {
        let (issuer, _) = issuer_with(
            Arc::new(TracingEmailSender),
            Arc::new(ThreadRngSource),
        );

        // Five different addresses from one origin pass, the sixth is blocked.
        for i in 0..5 {
            issuer
                .issue(&format!("user{}@b.c", i), "203.0.113.7")
                .await
                .unwrap();
        }
        let err = issuer
            .issue("user5@b.c", "203.0.113.7")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::RateLimited(_)));

        // A different origin is unaffected.
        issuer.issue("user6@b.c", "198.51.100.9").await.unwrap();
    }

    #[tokio::test]
    async fn test_dispatch_failure_reports_but_keeps_row() {
        let (issuer, store) = issuer_with(
            Arc::new(FailingEmailSender),
            Arc::new(ThreadRngSource),
        );

        let err = issuer.issue("a@b.c", "203.0.113.7").await.unwrap_err();
        assert!(matches!(err, EngineError::EmailDispatch(_)));

        // The row was persisted and consumes a rate-limit slot.
        let hour_ago = Utc::now() - Duration::hours(1);
        assert_eq!(
            store.count_for_email_since("a@b.c", hour_ago).await.unwrap(),
            1
        );
    }
}
