//! Error types for the Fortuna settlement engine
//!
//! Every variant is terminal for the current request: nothing here is retried
//! automatically, callers surface the error verbatim.

use thiserror::Error;

/// Root error type for settlement and verification operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// Bearer credential missing or not resolvable to an account
    #[error("unauthorized")]
    Unauthorized,

    /// Malformed or out-of-range game parameters, including tampered tier data
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Stake exceeds the live balance, checked before any mutation
    #[error("insufficient balance: stake {required} exceeds balance {available}")]
    InsufficientBalance { required: f64, available: f64 },

    /// An issuance or validation rate limiter tripped
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Code not found, already used, or past expiry. Deliberately merged so
    /// the response never reveals which of the three applied.
    #[error("invalid or expired code")]
    InvalidOrExpired,

    /// Outbound email dispatch failed. Distinct from storage failure: the
    /// code row was persisted before dispatch was attempted.
    #[error("email dispatch failed: {0}")]
    EmailDispatch(String),

    /// Atomic settlement or code persistence failed
    #[error("storage error: {0}")]
    Storage(String),
}

/// Convenience type alias for engine results
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::InsufficientBalance {
            required: 500.0,
            available: 120.0,
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("120"));
    }

    #[test]
    fn test_merged_code_error_reveals_nothing() {
        // Wrong, reused, and expired codes all collapse into the same message.
        assert_eq!(
            EngineError::InvalidOrExpired.to_string(),
            "invalid or expired code"
        );
    }
}
