//! # Domain Types
//!
//! Records handed to the core by the backend, and the session lifecycle.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │      User       │   │ CashRegisterSession │   │   SaleRecord    │   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  id             │   │  id (UUID)          │   │  id             │   │
//! │  │  name           │   │  opened_at          │   │  register id ───┼─┐ │
//! │  │  role ──► Role  │   │  closed_at?         │◄──┼─────────────────┘ │ │
//! │  │  is_active      │   │  opening_amount     │   │  payment_method │   │
//! │  └─────────────────┘   │  closing_amount?    │   │  total/tax/disc │   │
//! │                        │  expected_amount?   │   │  status         │   │
//! │                        └─────────────────────┘   └─────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ PaymentMethod   │   │   SaleStatus    │   │  SessionState   │       │
//! │  │  Efectivo       │   │  Completed      │   │  Open           │       │
//! │  │  Tarjeta        │   │  Cancelled      │   │  Closed         │       │
//! │  │  Qr / Mixto     │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::access::Role;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_amount, validate_notes};

// =============================================================================
// User
// =============================================================================

/// A logged-in user, as returned by the backend's PIN lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Deactivated accounts keep their role but hold no permissions.
    pub is_active: bool,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
///
/// Serialized with the backend's names (`efectivo`, `tarjeta`, `qr`,
/// `mixto`). Reading goes through [`FromStr`] everywhere, JSON included, so
/// it is case-insensitive and accepts the English spellings.
///
/// There is deliberately no catch-all variant: a method outside these four
/// is rejected when parsed, so every sale falls into exactly one
/// reconciliation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
pub enum PaymentMethod {
    /// Physical cash. The only method that moves money in the drawer.
    #[serde(rename = "efectivo")]
    Efectivo,
    #[serde(rename = "tarjeta")]
    Tarjeta,
    #[serde(rename = "qr")]
    Qr,
    /// A split payment. Not decomposed into its parts.
    #[serde(rename = "mixto")]
    Mixto,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Efectivo,
        PaymentMethod::Tarjeta,
        PaymentMethod::Qr,
        PaymentMethod::Mixto,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Efectivo => "efectivo",
            PaymentMethod::Tarjeta => "tarjeta",
            PaymentMethod::Qr => "qr",
            PaymentMethod::Mixto => "mixto",
        }
    }

    /// True only for cash, which is what the drawer count is checked against.
    pub const fn touches_drawer(&self) -> bool {
        matches!(self, PaymentMethod::Efectivo)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "efectivo" | "cash" => Ok(PaymentMethod::Efectivo),
            "tarjeta" | "card" => Ok(PaymentMethod::Tarjeta),
            "qr" => Ok(PaymentMethod::Qr),
            "mixto" | "mixed" => Ok(PaymentMethod::Mixto),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                value: s.to_string(),
                allowed: PaymentMethod::ALL
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for PaymentMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    #[default]
    Completed,
    Cancelled,
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleStatus::Completed => f.write_str("completed"),
            SaleStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// A sale as seen by reconciliation: totals only, no line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRecord {
    pub id: String,
    /// Human-facing running number printed on the receipt.
    pub sale_number: i64,
    /// Session the sale was rung up in. `None` when no drawer was open.
    pub cash_register_id: Option<String>,
    pub payment_method: PaymentMethod,
    pub total: Money,
    pub tax_amount: Money,
    pub discount_amount: Money,
    pub status: SaleStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleRecord {
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == SaleStatus::Completed
    }

    /// Marks the sale cancelled.
    ///
    /// ## Errors
    /// [`CoreError::InvalidSaleStatus`] if it was already cancelled.
    pub fn cancel(&mut self) -> CoreResult<()> {
        if self.status == SaleStatus::Cancelled {
            return Err(CoreError::InvalidSaleStatus {
                sale_id: self.id.clone(),
                current_status: self.status.to_string(),
            });
        }
        self.status = SaleStatus::Cancelled;
        Ok(())
    }
}

// =============================================================================
// Cash Register Session
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Open,
    Closed,
}

/// One open-to-close period of a cash drawer.
///
/// ## Lifecycle
/// ```text
///   open(opening_amount) ──► Open ──close(counted, expected)──► Closed
///                                                              (immutable)
/// ```
/// `closing_amount` and `expected_amount` are set together, exactly once,
/// by [`CashRegisterSession::close`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashRegisterSession {
    pub id: String,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
    pub opening_amount: Money,
    /// Cash physically counted at close.
    pub closing_amount: Option<Money>,
    /// Opening amount plus cash sales, fixed at close.
    pub expected_amount: Option<Money>,
    pub notes: Option<String>,
    pub user_id: Option<String>,
}

impl CashRegisterSession {
    /// Opens a new session with a fresh id.
    ///
    /// ## Errors
    /// A validation error if `opening_amount` is negative.
    pub fn open(
        opening_amount: Money,
        user_id: Option<String>,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        validate_amount("opening_amount", opening_amount)?;

        Ok(CashRegisterSession {
            id: Uuid::new_v4().to_string(),
            opened_at: now,
            closed_at: None,
            opening_amount,
            closing_amount: None,
            expected_amount: None,
            notes: None,
            user_id,
        })
    }

    /// Closes the session, fixing the counted and expected amounts.
    ///
    /// `expected_amount` is computed by the caller, normally with
    /// [`crate::reconcile::projected_expected_amount`].
    ///
    /// ## Errors
    /// - [`CoreError::SessionAlreadyClosed`] if closed before
    /// - a validation error for a negative count or over-long notes
    pub fn close(
        &mut self,
        closing_amount: Money,
        expected_amount: Money,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        if !self.is_open() {
            return Err(CoreError::SessionAlreadyClosed(self.id.clone()));
        }
        validate_amount("closing_amount", closing_amount)?;
        let notes = notes.map(|n| validate_notes(&n)).transpose()?.flatten();

        self.closed_at = Some(now);
        self.closing_amount = Some(closing_amount);
        self.expected_amount = Some(expected_amount);
        self.notes = notes;
        Ok(())
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    pub fn state(&self) -> SessionState {
        if self.is_open() {
            SessionState::Open
        } else {
            SessionState::Closed
        }
    }
}

// =============================================================================
// Audit Log
// =============================================================================

/// One recorded user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuditEntry {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    /// Short verb such as `open_cash_register` or `cancel_sale`.
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub details: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("efectivo".parse::<PaymentMethod>().unwrap(), PaymentMethod::Efectivo);
        assert_eq!(" Card ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Tarjeta);
        assert_eq!("mixed".parse::<PaymentMethod>().unwrap(), PaymentMethod::Mixto);
        assert!(matches!(
            "cheque".parse::<PaymentMethod>(),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_payment_method_serde() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Mixto).unwrap(),
            "\"mixto\""
        );
        let parsed: PaymentMethod = serde_json::from_str("\"cash\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Efectivo);

        // JSON and FromStr accept the same spellings.
        for raw in ["EFECTIVO", " Tarjeta ", "QR", "Mixed"] {
            let from_json: PaymentMethod =
                serde_json::from_str(&format!("\"{raw}\"")).unwrap();
            assert_eq!(from_json, raw.parse::<PaymentMethod>().unwrap());
        }
        assert!(serde_json::from_str::<PaymentMethod>("\"cheque\"").is_err());
    }

    #[test]
    fn test_only_cash_touches_drawer() {
        let touching: Vec<_> = PaymentMethod::ALL
            .into_iter()
            .filter(PaymentMethod::touches_drawer)
            .collect();
        assert_eq!(touching, vec![PaymentMethod::Efectivo]);
    }

    #[test]
    fn test_session_lifecycle() {
        let now = Utc::now();
        let mut session =
            CashRegisterSession::open(Money::from_cents(10_000), Some("u1".to_string()), now)
                .unwrap();
        assert_eq!(session.state(), SessionState::Open);
        assert!(session.closing_amount.is_none());

        session
            .close(
                Money::from_cents(17_500),
                Money::from_cents(18_000),
                Some("  faltan 5  ".to_string()),
                now,
            )
            .unwrap();
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.expected_amount, Some(Money::from_cents(18_000)));
        assert_eq!(session.notes.as_deref(), Some("faltan 5"));

        let err = session
            .close(Money::zero(), Money::zero(), None, now)
            .unwrap_err();
        assert!(matches!(err, CoreError::SessionAlreadyClosed(_)));
        assert_eq!(session.closing_amount, Some(Money::from_cents(17_500)));
    }

    #[test]
    fn test_session_rejects_negative_amounts() {
        let now = Utc::now();
        assert!(CashRegisterSession::open(Money::from_cents(-1), None, now).is_err());

        let mut session = CashRegisterSession::open(Money::zero(), None, now).unwrap();
        assert!(session
            .close(Money::from_cents(-100), Money::zero(), None, now)
            .is_err());
        assert!(session.is_open());
    }

    #[test]
    fn test_sale_cancel_once() {
        let mut sale = SaleRecord {
            id: "s1".to_string(),
            sale_number: 1,
            cash_register_id: None,
            payment_method: PaymentMethod::Qr,
            total: Money::from_cents(2000),
            tax_amount: Money::zero(),
            discount_amount: Money::zero(),
            status: SaleStatus::Completed,
            created_at: Utc::now(),
        };
        sale.cancel().unwrap();
        assert!(!sale.is_completed());
        assert!(matches!(
            sale.cancel(),
            Err(CoreError::InvalidSaleStatus { .. })
        ));
    }
}
