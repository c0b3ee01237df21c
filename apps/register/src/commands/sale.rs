//! # Sale Commands
//!
//! Recording sales against the open drawer and cancelling them.
//!
//! The payment method arrives as free text from the frontend and is parsed
//! here. Anything outside `efectivo`, `tarjeta`, `qr` and `mixto` (or their
//! English spellings) is rejected so that it can never be silently left out
//! of the reconciliation buckets.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tally_core::access::Permission;
use tally_core::validation::{parse_payment_method, validate_amount, validate_id};
use tally_core::{CoreError, Money, SaleRecord, SaleStatus, User};
use tracing::{debug, info};
use uuid::Uuid;

use super::{audit, require};
use crate::error::ApiError;
use crate::state::RegisterState;

/// Sale totals submitted at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    pub payment_method: String,
    pub total: Money,
    #[serde(default)]
    pub tax_amount: Option<Money>,
    #[serde(default)]
    pub discount_amount: Option<Money>,
}

/// Records a completed sale.
///
/// The sale is attached to the open session; with no drawer open it is
/// stored without a session and never shows up in a closing report.
pub fn record_sale(
    register: &RegisterState,
    user: Option<&User>,
    sale: NewSale,
) -> Result<SaleRecord, ApiError> {
    debug!("record_sale command");
    let user = require(user, Permission::Pos)?;

    let payment_method = parse_payment_method(&sale.payment_method)?;
    let tax_amount = sale.tax_amount.unwrap_or_default();
    let discount_amount = sale.discount_amount.unwrap_or_default();
    validate_amount("total", sale.total)?;
    validate_amount("tax_amount", tax_amount)?;
    validate_amount("discount_amount", discount_amount)?;

    let record = register.with_ledger_mut(|ledger| {
        let record = SaleRecord {
            id: Uuid::new_v4().to_string(),
            sale_number: ledger.next_sale_number(),
            cash_register_id: ledger.current_session().map(|s| s.id.clone()),
            payment_method,
            total: sale.total,
            tax_amount,
            discount_amount,
            status: SaleStatus::Completed,
            created_at: Utc::now(),
        };
        ledger.insert_sale(record.clone());
        audit(
            ledger,
            user,
            "record_sale",
            Some(("sale", record.id.as_str())),
            Some(format!("{} {}", record.payment_method, record.total)),
        );
        record
    })?;

    info!(
        sale_id = %record.id,
        sale_number = record.sale_number,
        method = %record.payment_method,
        total = %record.total,
        session_id = ?record.cash_register_id,
        "Sale recorded"
    );
    Ok(record)
}

/// Cancels a sale. It stays in its session and is counted as cancelled.
///
/// Sales of a closed session are frozen with it: cancelling one would change
/// the report's buckets after `expected_amount` was fixed.
pub fn cancel_sale(
    register: &RegisterState,
    user: Option<&User>,
    sale_id: &str,
) -> Result<SaleRecord, ApiError> {
    debug!(sale_id, "cancel_sale command");
    let user = require(user, Permission::CancelSales)?;
    validate_id("sale_id", sale_id)?;

    let cancelled = register.with_ledger_mut(|ledger| -> Result<SaleRecord, ApiError> {
        let session_id = ledger
            .sale(sale_id)
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?
            .cash_register_id
            .clone();
        if let Some(session) = session_id.as_deref().and_then(|id| ledger.session(id)) {
            if !session.is_open() {
                return Err(CoreError::SessionAlreadyClosed(session.id.clone()).into());
            }
        }

        let sale = ledger
            .sale_mut(sale_id)
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;
        sale.cancel()?;
        let cancelled = sale.clone();

        audit(ledger, user, "cancel_sale", Some(("sale", sale_id)), None);
        Ok(cancelled)
    })??;

    info!(sale_id = %cancelled.id, user_id = %user.id, "Sale cancelled");
    Ok(cancelled)
}
