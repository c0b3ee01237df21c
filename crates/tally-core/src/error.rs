//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Authorization and session lifecycle failures   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-register errors (app)                                           │
//! │  └── ApiError         - What the caller sees (code + message)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note that the access-control *queries* (`has_permission`,
//! `allowed_routes`, ...) never return errors: an absent user or unknown
//! role simply has no access. Only [`crate::access::authorize`] turns a
//! missing permission into a [`CoreError`].

use thiserror::Error;

use crate::access::Permission;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No user is logged in.
    #[error("Authentication required")]
    Unauthenticated,

    /// The user's role does not grant the permission.
    ///
    /// ## User Workflow
    /// ```text
    /// Cashier clicks "Cancel sale"
    ///      │
    ///      ▼
    /// authorize(cashier, CancelSales)
    ///      │
    ///      ▼
    /// Forbidden { user: "Ana", permission: CancelSales }
    ///      │
    ///      ▼
    /// UI shows: "Ana does not have permission cancel_sales"
    /// ```
    #[error("{user} does not have permission {permission}")]
    Forbidden { user: String, permission: Permission },

    /// An action gated on an empty permission list. Nobody may perform it.
    #[error("{user} cannot be granted an action that requires no known permission")]
    NoPermissionRequested { user: String },

    /// A cash register session is already open.
    ///
    /// Only one drawer may be open at a time; it must be closed first.
    #[error("Cash register session {0} is already open; close it before opening a new one")]
    SessionAlreadyOpen(String),

    /// There is no open cash register session.
    #[error("No cash register session is open")]
    NoOpenSession,

    /// The session was already closed and is immutable.
    #[error("Cash register session {0} is already closed")]
    SessionAlreadyClosed(String),

    /// Session not found.
    #[error("Cash register session not found: {0}")]
    SessionNotFound(String),

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Sale is not in a state that allows the requested operation.
    #[error("Sale {sale_id} is {current_status}, cannot perform operation")]
    InvalidSaleStatus {
        sale_id: String,
        current_status: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the boundary, before any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value exceeds the accepted ceiling.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}, got '{value}'")]
    NotAllowed {
        field: String,
        value: String,
        allowed: Vec<String>,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::Forbidden {
            user: "Ana".to_string(),
            permission: Permission::CancelSales,
        };
        assert_eq!(err.to_string(), "Ana does not have permission cancel_sales");

        let err = CoreError::SessionAlreadyClosed("reg-1".to_string());
        assert_eq!(err.to_string(), "Cash register session reg-1 is already closed");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::NotAllowed {
            field: "payment_method".to_string(),
            value: "cheque".to_string(),
            allowed: vec!["efectivo".to_string(), "qr".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "payment_method must be one of: [\"efectivo\", \"qr\"], got 'cheque'"
        );

        let err = ValidationError::MustNotBeNegative {
            field: "opening_amount".to_string(),
        };
        assert_eq!(err.to_string(), "opening_amount must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sale_id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
