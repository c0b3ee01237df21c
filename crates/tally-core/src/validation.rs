//! # Validation Module
//!
//! Boundary checks for values that arrive from the frontend or the backend
//! before they reach a session or the reconciler.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                     │
//! │  └── Immediate user feedback (empty fields, number inputs)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Register commands                                            │
//! │  ├── Closed enums: role, payment method (unknown → rejected)           │
//! │  └── THIS MODULE: amounts, notes, ids                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Reconciler                                                   │
//! │  └── Trusts its input; every sale already has a known method           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//! use tally_core::validation::{parse_payment_method, validate_amount};
//!
//! assert!(validate_amount("opening_amount", Money::from_cents(10_000)).is_ok());
//! assert!(parse_payment_method("cheque").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::PaymentMethod;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of free-text notes on a closed session.
pub const MAX_NOTES_LEN: usize = 500;

/// Largest amount accepted for a single field: 10 000 000 000.00.
///
/// Keeps every session sum far from `i64` overflow (millions of sales at
/// this ceiling still fit).
pub const MAX_AMOUNT: Money = Money::from_cents(1_000_000_000_000);

/// Validates a monetary amount that cannot be negative.
///
/// Zero is allowed: a drawer can be opened empty, and a sale can be free.
/// Amounts above [`MAX_AMOUNT`] are rejected.
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: MAX_AMOUNT.to_string(),
        });
    }
    Ok(())
}

/// Validates and normalizes session notes.
///
/// ## Returns
/// The trimmed text, or `None` if it was blank.
pub fn validate_notes(notes: &str) -> ValidationResult<Option<String>> {
    let notes = notes.trim();

    if notes.is_empty() {
        return Ok(None);
    }

    if notes.chars().count() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        });
    }

    Ok(Some(notes.to_string()))
}

/// Validates an identifier passed in by the caller (sale id, session id).
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Parses a payment method coming from outside.
///
/// Unknown methods are rejected here rather than being dropped later from
/// the reconciliation buckets.
pub fn parse_payment_method(raw: &str) -> ValidationResult<PaymentMethod> {
    if raw.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "payment_method".to_string(),
        });
    }
    raw.parse()
}

// =============================================================================
// Unit Tests
// =============================================================================
