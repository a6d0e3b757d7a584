//! Ledger Error Types
//!
//! One taxonomy for every account and transfer operation. Callers branch on
//! the variant (or its [`ErrorStatus`]) and never on the message text.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Result alias used across the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Semantic status class of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    BadRequest,
    NotFound,
    Conflict,
    Unauthorized,
    /// Store unreachable or a lock wait gave up. Retryable.
    Unavailable,
    Internal,
}

impl ErrorStatus {
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorStatus::BadRequest => 400,
            ErrorStatus::Unauthorized => 401,
            ErrorStatus::NotFound => 404,
            ErrorStatus::Conflict => 409,
            ErrorStatus::Internal => 500,
            ErrorStatus::Unavailable => 503,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // === Caller Errors ===
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Nothing specified to update")]
    NoOp,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Invalid credentials")]
    Unauthorized,

    // === Resource Errors ===
    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Store Errors ===
    #[error("Store busy: {0}")]
    Busy(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Status class consumed by the HTTP boundary.
    pub fn status(&self) -> ErrorStatus {
        match self {
            LedgerError::InvalidRequest(_)
            | LedgerError::NoOp
            | LedgerError::InsufficientFunds => ErrorStatus::BadRequest,
            LedgerError::Unauthorized => ErrorStatus::Unauthorized,
            LedgerError::NotFound(_) => ErrorStatus::NotFound,
            LedgerError::Conflict(_) => ErrorStatus::Conflict,
            LedgerError::Busy(_) | LedgerError::StoreUnavailable(_) => ErrorStatus::Unavailable,
            LedgerError::Internal(_) => ErrorStatus::Internal,
        }
    }

    pub fn http_status(&self) -> u16 {
        self.status().http_status()
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidRequest(_) => "INVALID_REQUEST",
            LedgerError::NoOp => "NO_OP",
            LedgerError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            LedgerError::Unauthorized => "UNAUTHORIZED",
            LedgerError::NotFound(_) => "NOT_FOUND",
            LedgerError::Conflict(_) => "CONFLICT",
            LedgerError::Busy(_) => "BUSY",
            LedgerError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            LedgerError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Busy(_) | LedgerError::StoreUnavailable(_))
    }

    /// Message safe to show outside the process.
    pub fn public_message(&self) -> String {
        match self.status() {
            ErrorStatus::Internal => "Internal server error".to_string(),
            ErrorStatus::Unavailable => "Service temporarily unavailable".to_string(),
            _ => self.to_string(),
        }
    }
}

// PostgreSQL SQLSTATE codes
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";
const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const LOCK_NOT_AVAILABLE: &str = "55P03";
const QUERY_CANCELED: &str = "57014";

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => LedgerError::Conflict(
                    db_err
                        .constraint()
                        .map(|c| format!("unique constraint {} violated", c))
                        .unwrap_or_else(|| "unique constraint violated".to_string()),
                ),
                Some(STRING_DATA_RIGHT_TRUNCATION) => {
                    LedgerError::InvalidRequest("value too long for column".to_string())
                }
                Some(NUMERIC_VALUE_OUT_OF_RANGE) => {
                    LedgerError::InvalidRequest("value out of range for balance".to_string())
                }
                Some(CHECK_VIOLATION) => {
                    LedgerError::InvalidRequest("value violates a table constraint".to_string())
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    LedgerError::NotFound("Referenced account".to_string())
                }
                Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED | LOCK_NOT_AVAILABLE
                | QUERY_CANCELED) => LedgerError::Busy(db_err.message().to_string()),
                _ => LedgerError::Internal(e.to_string()),
            },
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => LedgerError::StoreUnavailable(e.to_string()),
            _ => LedgerError::Internal(e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    error: String,
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        if matches!(
            self.status(),
            ErrorStatus::Internal | ErrorStatus::Unavailable
        ) {
            tracing::error!(code = self.code(), error = %self, "Ledger operation failed");
        }

        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            code: self.code(),
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
