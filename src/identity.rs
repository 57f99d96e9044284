//! Identity gate: bearer credential to account identity
//!
//! The engine trusts this resolution and nothing more; it never re-derives
//! identity itself.

use crate::errors::{EngineError, EngineResult};
use crate::store::AccountId;
use async_trait::async_trait;
use dashmap::DashMap;

/// External capability that resolves a bearer credential
#[async_trait]
pub trait IdentityGate: Send + Sync {
    /// Resolve a bearer credential to a stable account identifier
    async fn resolve(&self, bearer: &str) -> EngineResult<AccountId>;
}

/// Token-table gate standing in for the external auth service
pub struct TokenTableGate {
    tokens: DashMap<String, AccountId>,
}

impl TokenTableGate {
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
        }
    }

    /// Register a credential for an account
    pub fn register(&self, token: impl Into<String>, account: AccountId) {
        self.tokens.insert(token.into(), account);
    }
}

impl Default for TokenTableGate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityGate for TokenTableGate {
    async fn resolve(&self, bearer: &str) -> EngineResult<AccountId> {
        self.tokens
            .get(bearer)
            .map(|id| *id)
            .ok_or(EngineError::Unauthorized)
    }
}
