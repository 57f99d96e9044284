//! Configuration management with validation and defaults

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FortunaConfig {
    pub server: ServerConfig,
    pub verification: VerificationConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: vec!["*".to_string()],
            request_timeout_secs: 30,
        }
    }
}

/// Rate-limit and expiry knobs for the verification subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Issuance limit per email over the trailing hour
    pub max_codes_per_email_per_hour: usize,
    /// Issuance limit per client origin over the trailing hour
    pub max_codes_per_origin_per_hour: usize,
    /// Validation attempt guard over the trailing five minutes
    pub max_attempt_rows_per_5_min: usize,
    /// Code lifetime from issuance to expiry
    pub code_ttl_minutes: i64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            max_codes_per_email_per_hour: 3,
            max_codes_per_origin_per_hour: 5,
            max_attempt_rows_per_5_min: 5,
            code_ttl_minutes: 10,
        }
    }
}

impl FortunaConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate invariant-bearing fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "must be nonzero".to_string(),
            });
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.request_timeout_secs".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.verification.code_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "verification.code_ttl_minutes".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.verification.max_codes_per_email_per_hour == 0
            || self.verification.max_codes_per_origin_per_hour == 0
        {
            return Err(ConfigError::InvalidValue {
                field: "verification".to_string(),
                reason: "rate limits must be positive".to_string(),
            });
        }
        Ok(())
    }
}
