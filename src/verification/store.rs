//! Verification code storage
//!
//! Rows are append-only apart from the single `used` flip, and are retained
//! after expiry for audit and rate-limit counting.

use crate::errors::{EngineError, EngineResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

/// One-time code bound to an email address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationCode {
    pub id: Uuid,
    pub email: String,
    /// 6 ASCII digits, leading zeros allowed
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    /// Client network origin, counted by the issuance rate limiter
    pub origin: String,
    pub created_at: DateTime<Utc>,
}

/// Storage contract for verification codes
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Persist a freshly issued code row
    async fn insert(&self, code: VerificationCode) -> EngineResult<()>;

    /// Number of rows for this email created at or after `since`
    async fn count_for_email_since(&self, email: &str, since: DateTime<Utc>)
        -> EngineResult<usize>;

    /// Number of rows from this origin created at or after `since`
    async fn count_for_origin_since(
        &self,
        origin: &str,
        since: DateTime<Utc>,
    ) -> EngineResult<usize>;

    /// Find the most recently created unused, unexpired row matching
    /// (email, code) exactly and mark it used
    ///
    /// The lookup and the flip happen under one lock, so a code can be
    /// consumed at most once even when validation is retried concurrently.
    async fn consume(&self, email: &str, code: &str, now: DateTime<Utc>) -> EngineResult<bool>;
}

/// Process-local code table
pub struct InMemoryCodeStore {
    rows: Mutex<Vec<VerificationCode>>,
}

impl InMemoryCodeStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> EngineResult<std::sync::MutexGuard<'_, Vec<VerificationCode>>> {
        self.rows
            .lock()
            .map_err(|_| EngineError::Storage("code table lock poisoned".to_string()))
    }
}

impl Default for InMemoryCodeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeStore for InMemoryCodeStore {
    async fn insert(&self, code: VerificationCode) -> EngineResult<()> {
        self.lock()?.push(code);
        Ok(())
    }

    async fn count_for_email_since(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> EngineResult<usize> {
        Ok(self
            .lock()?
            .iter()
            .filter(|row| row.email == email && row.created_at >= since)
            .count())
    }

    async fn count_for_origin_since(
        &self,
        origin: &str,
        since: DateTime<Utc>,
    ) -> EngineResult<usize> {
        Ok(self
            .lock()?
            .iter()
            .filter(|row| row.origin == origin && row.created_at >= since)
            .count())
    }

    async fn consume(&self, email: &str, code: &str, now: DateTime<Utc>) -> EngineResult<bool> {
        let mut rows = self.lock()?;
        let candidate = rows
            .iter_mut()
            .filter(|row| {
                row.email == email && row.code == code && !row.used && row.expires_at > now
            })
            .max_by_key(|row| row.created_at);

        match candidate {
            Some(row) => {
                row.used = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(email: &str, code: &str, created_offset_min: i64, ttl_min: i64) -> VerificationCode {
        let created = Utc::now() + Duration::minutes(created_offset_min);
        VerificationCode {
            id: Uuid::new_v4(),
            email: email.to_string(),
            code: code.to_string(),
            expires_at: created + Duration::minutes(ttl_min),
            used: false,
            origin: "203.0.113.7".to_string(),
            created_at: created,
        }
    }

    #[tokio::test]
    async fn test_consume_marks_used_once() {
        let store = InMemoryCodeStore::new();
        store.insert(row("a@b.c", "042117", 0, 10)).await.unwrap();

        let now = Utc::now();
        assert!(store.consume("a@b.c", "042117", now).await.unwrap());
        // Second attempt with the same correct code fails.
        assert!(!store.consume("a@b.c", "042117", now).await.unwrap());
    }

    #[tokio::test]
    async fn test_consume_rejects_expired() {
        let store = InMemoryCodeStore::new();
        store.insert(row("a@b.c", "123456", -20, 10)).await.unwrap();

        assert!(!store.consume("a@b.c", "123456", Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_consume_picks_most_recent_match() {
        let store = InMemoryCodeStore::new();
        let older = row("a@b.c", "777777", -5, 10);
        let newer = row("a@b.c", "777777", -1, 10);
        let newer_id = newer.id;
        store.insert(older).await.unwrap();
        store.insert(newer).await.unwrap();

        assert!(store.consume("a@b.c", "777777", Utc::now()).await.unwrap());

        let rows = store.lock().unwrap();
        let consumed: Vec<_> = rows.iter().filter(|r| r.used).collect();
        assert_eq!(consumed.len(), 1);
        assert_eq!(consumed[0].id, newer_id);
    }

    #[tokio::test]
    async fn test_counts_respect_window() {
        let store = InMemoryCodeStore::new();
        store.insert(row("a@b.c", "000001", -90, 10)).await.unwrap();
        store.insert(row("a@b.c", "000002", -10, 10)).await.unwrap();
        store.insert(row("x@y.z", "000003", -10, 10)).await.unwrap();

        let hour_ago = Utc::now() - Duration::hours(1);
        assert_eq!(
            store.count_for_email_since("a@b.c", hour_ago).await.unwrap(),
            1
        );
        assert_eq!(
            store
                .count_for_origin_since("203.0.113.7", hour_ago)
                .await
                .unwrap(),
            2
        );
    }
}
