//! # API Error Type
//!
//! Unified error type for register commands, plus the error type of the
//! command-line entry point.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tally POS                              │
//! │                                                                         │
//! │  Command Function  ──►  Result<T, ApiError>                             │
//! │         │                                                               │
//! │         ├── authorize() fails ── CoreError::Forbidden ────► FORBIDDEN   │
//! │         │                                                               │
//! │         ├── bad input ───────── ValidationError ──► VALIDATION_ERROR    │
//! │         │                                                               │
//! │         ├── drawer already open ─ CoreError ──────► BUSINESS_LOGIC      │
//! │         │                                                               │
//! │         └── Success ─────────────────────────────────────────────────►  │
//! │                                                                         │
//! │  Frontend receives: { "code": "FORBIDDEN", "message": "..." }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use serde::Serialize;
use tally_core::{CoreError, ValidationError};

use crate::state::ConfigError;

/// Error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "FORBIDDEN",
///   "message": "Ana does not have permission cancel_sales"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Nobody is logged in (401)
    Unauthenticated,

    /// Logged in, but the role lacks the permission (403)
    Forbidden,

    /// Business rule violated, e.g. a drawer is already open (422)
    BusinessLogic,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unauthenticated => ApiError::new(ErrorCode::Unauthenticated, err.to_string()),
            CoreError::Forbidden { .. } | CoreError::NoPermissionRequested { .. } => {
                ApiError::new(ErrorCode::Forbidden, err.to_string())
            }
            CoreError::SessionNotFound(id) => ApiError::not_found("Cash register session", &id),
            CoreError::SaleNotFound(id) => ApiError::not_found("Sale", &id),
            CoreError::SessionAlreadyOpen(_)
            | CoreError::NoOpenSession
            | CoreError::SessionAlreadyClosed(_)
            | CoreError::InvalidSaleStatus { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Errors from the `tally-register` binary.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("usage: tally-register <snapshot.json>")]
    Usage,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("invalid snapshot: {0}")]
    Invalid(#[from] ValidationError),
}
