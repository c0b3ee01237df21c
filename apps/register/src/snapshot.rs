//! # Session Snapshots
//!
//! A snapshot is one cash-register session plus the sales recorded against
//! it, as exported by the backend:
//!
//! ```json
//! {
//!   "session": { "id": "reg-1", "opened_at": "...", "opening_amount": 10000, ... },
//!   "sales": [ { "id": "s-1", "cash_register_id": "reg-1", "payment_method": "efectivo", ... } ]
//! }
//! ```
//!
//! Amounts are integer cents and go through the same checks as amounts
//! entered at the register (non-negative, at most `MAX_AMOUNT`).

use std::path::Path;

use serde::Deserialize;
use tally_core::validation::{validate_amount, ValidationResult};
use tally_core::{reconcile, CashRegisterSession, ReconciliationReport, SaleRecord};
use tracing::{debug, warn};

use crate::error::RunError;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSnapshot {
    pub session: CashRegisterSession,
    #[serde(default)]
    pub sales: Vec<SaleRecord>,
}

impl SessionSnapshot {
    pub fn parse(json: &str) -> Result<Self, RunError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> ValidationResult<()> {
        let session = &self.session;
        validate_amount("opening_amount", session.opening_amount)?;
        if let Some(closing) = session.closing_amount {
            validate_amount("closing_amount", closing)?;
        }
        if let Some(expected) = session.expected_amount {
            validate_amount("expected_amount", expected)?;
        }

        for sale in &self.sales {
            validate_amount("total", sale.total)?;
            validate_amount("tax_amount", sale.tax_amount)?;
            validate_amount("discount_amount", sale.discount_amount)?;
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, RunError> {
        debug!(?path, "Loading session snapshot");
        let json = std::fs::read_to_string(path).map_err(|source| RunError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&json)
    }

    /// Closing report for the snapshot's session.
    ///
    /// Sales that belong to another session are skipped with a warning.
    pub fn reconcile(&self) -> ReconciliationReport {
        let (own, foreign): (Vec<SaleRecord>, Vec<SaleRecord>) = self
            .sales
            .iter()
            .cloned()
            .partition(|s| s.cash_register_id.as_deref() == Some(self.session.id.as_str()));

        if !foreign.is_empty() {
            warn!(
                session_id = %self.session.id,
                skipped = foreign.len(),
                "Snapshot contains sales from other sessions"
            );
        }

        reconcile(&self.session, &own)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{Money, PaymentMethod, ValidationError};

    const SNAPSHOT: &str = r#"{
        "session": {
            "id": "reg-1",
            "opened_at": "2026-03-02T08:00:00Z",
            "closed_at": "2026-03-02T20:00:00Z",
            "opening_amount": 10000,
            "closing_amount": 17500,
            "expected_amount": 18000,
            "notes": null,
            "user_id": "u-1"
        },
        "sales": [
            {"id": "s-1", "sale_number": 1, "cash_register_id": "reg-1", "payment_method": "efectivo",
             "total": 5000, "tax_amount": 0, "discount_amount": 0, "status": "completed",
             "created_at": "2026-03-02T09:00:00Z"},
            {"id": "s-2", "sale_number": 2, "cash_register_id": "reg-1", "payment_method": "efectivo",
             "total": 3000, "tax_amount": 0, "discount_amount": 0, "status": "completed",
             "created_at": "2026-03-02T10:00:00Z"},
            {"id": "s-3", "sale_number": 3, "cash_register_id": "reg-1", "payment_method": "tarjeta",
             "total": 2000, "tax_amount": 0, "discount_amount": 0, "status": "completed",
             "created_at": "2026-03-02T11:00:00Z"},
            {"id": "s-4", "sale_number": 4, "cash_register_id": "reg-0", "payment_method": "efectivo",
             "total": 9900, "tax_amount": 0, "discount_amount": 0, "status": "completed",
             "created_at": "2026-03-01T11:00:00Z"}
        ]
    }"#;

    #[test]
    fn test_snapshot_report() {
        let snapshot = SessionSnapshot::parse(SNAPSHOT).unwrap();
        let report = snapshot.reconcile();

        assert_eq!(report.total_transactions, 3);
        assert_eq!(report.total_sales, Money::from_cents(10_000));
        assert_eq!(report.bucket(PaymentMethod::Tarjeta), (1, Money::from_cents(2_000)));
        assert_eq!(report.expected_amount, Money::from_cents(18_000));
        assert_eq!(report.difference, Money::from_cents(-500));
    }

    #[test]
    fn test_unknown_payment_method_fails_to_parse() {
        let json = SNAPSHOT.replace("\"tarjeta\"", "\"cheque\"");
        assert!(matches!(
            SessionSnapshot::parse(&json),
            Err(RunError::Snapshot(_))
        ));
    }

    #[test]
    fn test_oversized_amounts_rejected() {
        let json = SNAPSHOT
            .replace("\"opening_amount\": 10000", "\"opening_amount\": 9223372036854775000")
            .replace("\"total\": 5000", "\"total\": 9223372036854775000");
        let err = SessionSnapshot::parse(&json).unwrap_err();
        assert!(matches!(err, RunError::Invalid(ValidationError::TooLarge { .. })));

        let json = SNAPSHOT.replace("\"tax_amount\": 0", "\"tax_amount\": -1");
        assert!(matches!(
            SessionSnapshot::parse(&json),
            Err(RunError::Invalid(ValidationError::MustNotBeNegative { .. }))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = SessionSnapshot::load(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(matches!(err, RunError::Io { .. }));
    }
}
