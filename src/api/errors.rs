//! API Error Handling
//!
//! Structured error responses with proper HTTP status codes and request tracking.

use crate::errors::EngineError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level API error response with request tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub request_id: String,
    pub error: ErrorBody,
}

/// Error body with structured information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code (UNAUTHORIZED, INVALID_INPUT, RATE_LIMITED, ...)
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// API error with request tracking
#[derive(Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub request_id: String,
}

#[derive(Debug)]
pub enum ApiErrorKind {
    Unauthorized,
    BadRequest { code: &'static str, message: String },
    RateLimited(String),
    Internal { code: &'static str, message: String },
}

impl ApiError {
    /// Map a domain error onto the HTTP surface
    ///
    /// 401 for identity failures, 400 for validation / balance / merged code
    /// failures, 429 for tripped limiters, 500 for storage and dispatch.
    pub fn from_engine(request_id: String, err: EngineError) -> Self {
        let kind = match err {
            EngineError::Unauthorized => ApiErrorKind::Unauthorized,
            EngineError::InvalidInput(msg) => ApiErrorKind::BadRequest {
                code: "INVALID_INPUT",
                message: msg,
            },
            EngineError::InsufficientBalance { .. } => ApiErrorKind::BadRequest {
                code: "INSUFFICIENT_BALANCE",
                message: "Insufficient balance".to_string(),
            },
            EngineError::RateLimited(msg) => ApiErrorKind::RateLimited(msg),
            EngineError::InvalidOrExpired => ApiErrorKind::BadRequest {
                code: "INVALID_OR_EXPIRED",
                message: "Invalid or expired code".to_string(),
            },
            EngineError::EmailDispatch(msg) => ApiErrorKind::Internal {
                code: "EMAIL_DISPATCH_FAILED",
                message: msg,
            },
            EngineError::Storage(msg) => ApiErrorKind::Internal {
                code: "STORAGE_ERROR",
                message: msg,
            },
        };
        Self { kind, request_id }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ApiErrorKind::Unauthorized => write!(f, "[{}] Unauthorized", self.request_id),
            ApiErrorKind::BadRequest { code, message } => {
                write!(f, "[{}] {}: {}", self.request_id, code, message)
            }
            ApiErrorKind::RateLimited(msg) => {
                write!(f, "[{}] Rate Limited: {}", self.request_id, msg)
            }
            ApiErrorKind::Internal { code, message } => {
                write!(f, "[{}] {}: {}", self.request_id, code, message)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self.kind {
            ApiErrorKind::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Unauthorized".to_string(),
            ),
            ApiErrorKind::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, code, message)
            }
            ApiErrorKind::RateLimited(message) => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", message)
            }
            ApiErrorKind::Internal { code, message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, code, message)
            }
        };

        let body = Json(ErrorResponse {
            request_id: self.request_id,
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}
