//! # Cash Register Commands
//!
//! Opening and closing the drawer, and the closing report.
//!
//! ## Drawer Workflow
//! ```text
//! open_cash_register(100.00)
//!      │
//!      ▼
//! record_sale(...) × n          (cash sales raise the expected amount)
//!      │
//!      ▼
//! close_cash_register(counted)  expected = opening + cash sales
//!      │                        difference = counted − expected
//!      ▼
//! get_cash_register_report(id)
//! ```

use chrono::Utc;
use tally_core::access::Permission;
use tally_core::reconcile::{projected_expected_amount, reconcile};
use tally_core::{CashRegisterSession, CoreError, Discrepancy, Money, ReconciliationReport, User};
use tracing::{debug, info, warn};

use super::{audit, require, require_any};
use crate::error::ApiError;
use crate::state::{ConfigState, RegisterState};

/// Opens a cash register session with `opening_amount` in the drawer.
///
/// ## Errors
/// - `FORBIDDEN` without `manage_cash_register`
/// - `BUSINESS_LOGIC` if a session is already open
/// - `VALIDATION_ERROR` for a negative amount
pub fn open_cash_register(
    register: &RegisterState,
    user: Option<&User>,
    opening_amount: Money,
) -> Result<CashRegisterSession, ApiError> {
    debug!("open_cash_register command");
    let user = require(user, Permission::ManageCashRegister)?;

    let session = CashRegisterSession::open(opening_amount, Some(user.id.clone()), Utc::now())?;

    let session = register.with_ledger_mut(|ledger| -> Result<CashRegisterSession, ApiError> {
        ledger.insert_session(session.clone())?;
        audit(
            ledger,
            user,
            "open_cash_register",
            Some(("cash_register", session.id.as_str())),
            Some(format!("opening_amount={}", opening_amount)),
        );
        Ok(session)
    })??;

    info!(
        session_id = %session.id,
        user_id = %user.id,
        opening = %session.opening_amount,
        "Cash register opened"
    );
    Ok(session)
}

/// Closes the open session with the counted cash.
///
/// The expected amount is computed from the session's completed cash sales
/// and fixed on the session together with the count.
pub fn close_cash_register(
    register: &RegisterState,
    config: &ConfigState,
    user: Option<&User>,
    closing_amount: Money,
    notes: Option<String>,
) -> Result<CashRegisterSession, ApiError> {
    debug!("close_cash_register command");
    let user = require(user, Permission::ManageCashRegister)?;

    let report = register.with_ledger_mut(|ledger| -> Result<ReconciliationReport, ApiError> {
        let session_id = ledger
            .current_session()
            .map(|s| s.id.clone())
            .ok_or(CoreError::NoOpenSession)?;
        let sales = ledger.sales_for_session(&session_id);

        let session = ledger
            .current_session_mut()
            .ok_or(CoreError::NoOpenSession)?;
        let expected = projected_expected_amount(session, &sales);
        session.close(closing_amount, expected, notes, Utc::now())?;
        let closed = session.clone();

        audit(
            ledger,
            user,
            "close_cash_register",
            Some(("cash_register", closed.id.as_str())),
            Some(format!(
                "closing_amount={} expected_amount={}",
                closing_amount, expected
            )),
        );
        Ok(reconcile(&closed, &sales))
    })??;

    log_discrepancy(config, &report);
    Ok(report.register)
}

/// The open session, if any.
pub fn get_current_cash_register(
    register: &RegisterState,
    user: Option<&User>,
) -> Result<Option<CashRegisterSession>, ApiError> {
    debug!("get_current_cash_register command");
    require(user, Permission::ManageCashRegister)?;

    register.with_ledger(|ledger| ledger.current_session().cloned())
}

/// Closing report for session `session_id`.
///
/// Works on open sessions too; the result is then a projection
/// (`ReconciliationReport::is_final` is false).
pub fn get_cash_register_report(
    register: &RegisterState,
    user: Option<&User>,
    session_id: &str,
) -> Result<ReconciliationReport, ApiError> {
    debug!(session_id, "get_cash_register_report command");
    require_any(
        user,
        &[Permission::ManageCashRegister, Permission::ViewReportsSales],
    )?;
    tally_core::validation::validate_id("session_id", session_id)?;

    register.with_ledger(|ledger| -> Result<ReconciliationReport, ApiError> {
        let session = ledger
            .session(session_id)
            .ok_or_else(|| CoreError::SessionNotFound(session_id.to_string()))?;
        Ok(reconcile(session, &ledger.sales_for_session(session_id)))
    })?
}

fn log_discrepancy(config: &ConfigState, report: &ReconciliationReport) {
    let difference = config.format_money(report.difference);
    match report.discrepancy() {
        Discrepancy::Balanced => info!(
            session_id = %report.register.id,
            store = %config.store_name,
            "Cash register closed balanced"
        ),
        Discrepancy::Surplus | Discrepancy::Shortage => warn!(
            session_id = %report.register.id,
            store = %config.store_name,
            expected = %config.format_money(report.expected_amount),
            %difference,
            kind = ?report.discrepancy(),
            "Cash register closed with a discrepancy"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::user;
    use crate::commands::sale::{record_sale, NewSale};
    use crate::error::ErrorCode;
    use tally_core::Role;

    fn cash_sale(total: i64) -> NewSale {
        NewSale {
            payment_method: "efectivo".to_string(),
            total: Money::from_cents(total),
            tax_amount: None,
            discount_amount: None,
        }
    }

    #[test]
    fn test_open_requires_permission() {
        let register = RegisterState::new();
        let inventory = user(Role::Inventory);

        let err = open_cash_register(&register, Some(&inventory), Money::zero()).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let err = open_cash_register(&register, None, Money::zero()).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[test]
    fn test_only_one_open_session() {
        let register = RegisterState::new();
        let cashier = user(Role::Cashier);

        open_cash_register(&register, Some(&cashier), Money::from_cents(10_000)).unwrap();
        let err =
            open_cash_register(&register, Some(&cashier), Money::from_cents(5_000)).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_close_without_open_session() {
        let register = RegisterState::new();
        let config = ConfigState::default();
        let err = close_cash_register(
            &register,
            &config,
            Some(&user(Role::Admin)),
            Money::zero(),
            None,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_full_shift_with_shortage() {
        let register = RegisterState::new();
        let config = ConfigState::default();
        let cashier = user(Role::Cashier);
        let admin = user(Role::Admin);

        let opened =
            open_cash_register(&register, Some(&cashier), Money::from_cents(10_000)).unwrap();
        record_sale(&register, Some(&cashier), cash_sale(5_000)).unwrap();
        record_sale(&register, Some(&cashier), cash_sale(3_000)).unwrap();
        let voided = record_sale(&register, Some(&cashier), cash_sale(2_000)).unwrap();
        crate::commands::sale::cancel_sale(&register, Some(&admin), &voided.id).unwrap();

        let closed = close_cash_register(
            &register,
            &config,
            Some(&cashier),
            Money::from_cents(17_500),
            Some("conteo de cierre".to_string()),
        )
        .unwrap();
        assert_eq!(closed.id, opened.id);
        assert_eq!(closed.expected_amount, Some(Money::from_cents(18_000)));

        let report = get_cash_register_report(&register, Some(&cashier), &opened.id).unwrap();
        assert!(report.is_final());
        assert_eq!(report.sales_cash, Money::from_cents(8_000));
        assert_eq!(report.total_transactions, 2);
        assert_eq!(report.cancelled_transactions, 1);
        assert_eq!(report.difference, Money::from_cents(-500));

        assert!(get_current_cash_register(&register, Some(&cashier))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_report_on_open_session_is_projection() {
        let register = RegisterState::new();
        let cashier = user(Role::Cashier);
        let opened =
            open_cash_register(&register, Some(&cashier), Money::from_cents(1_000)).unwrap();
        record_sale(&register, Some(&cashier), cash_sale(500)).unwrap();

        let report = get_cash_register_report(&register, Some(&cashier), &opened.id).unwrap();
        assert!(!report.is_final());
        assert_eq!(report.expected_amount, Money::from_cents(1_500));
    }

    #[test]
    fn test_report_not_found_and_forbidden() {
        let register = RegisterState::new();
        let err =
            get_cash_register_report(&register, Some(&user(Role::Admin)), "missing").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = get_cash_register_report(&register, Some(&user(Role::Inventory)), "missing")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
