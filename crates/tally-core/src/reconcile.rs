//! # Session Reconciliation
//!
//! Turns the sales of one cash-register session into its closing report.
//!
//! ## Computation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales ──┬── cancelled ─────────────────────► cancelled_transactions    │
//! │          │                                                              │
//! │          └── completed ──┬── efectivo ──► sales_cash  / count_cash      │
//! │                          ├── tarjeta  ──► sales_card  / count_card      │
//! │                          ├── qr       ──► sales_qr    / count_qr        │
//! │                          └── mixto    ──► sales_mixed / count_mixed     │
//! │                                                                         │
//! │  total_sales        = Σ bucket sales                                    │
//! │  total_transactions = Σ bucket counts                                   │
//! │  expected_amount    = opening_amount + sales_cash                       │
//! │  difference         = closing_amount − expected_amount                  │
//! │                       (> 0 surplus, < 0 shortage)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only cash moves the drawer; card, QR and mixed payments are reported but
//! never enter `expected_amount`. Mixed payments are not split.
//!
//! The reconciler trusts its input: sales are already scoped to the session
//! and every payment method is one of the four known ones (the closed
//! [`PaymentMethod`] enum guarantees the latter).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CashRegisterSession, PaymentMethod, SaleRecord};

// =============================================================================
// Report
// =============================================================================

/// Closing report for one cash-register session.
///
/// Always derived, never stored: recompute it from the session and its
/// sales whenever it is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReconciliationReport {
    pub register: CashRegisterSession,
    pub total_sales: Money,
    pub total_transactions: u32,
    pub cancelled_transactions: u32,
    pub total_discount: Money,
    pub total_tax: Money,
    pub sales_cash: Money,
    pub sales_card: Money,
    pub sales_qr: Money,
    pub sales_mixed: Money,
    pub count_cash: u32,
    pub count_card: u32,
    pub count_qr: u32,
    pub count_mixed: u32,
    /// Cash that should be in the drawer.
    pub expected_amount: Money,
    /// Counted minus expected. Provisional while the session is open.
    pub difference: Money,
}

/// Direction of a cash difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Discrepancy {
    Balanced,
    /// More cash counted than expected.
    Surplus,
    /// Less cash counted than expected.
    Shortage,
}

impl ReconciliationReport {
    /// True once the session is closed and `difference` is final.
    pub fn is_final(&self) -> bool {
        !self.register.is_open()
    }

    pub fn discrepancy(&self) -> Discrepancy {
        if self.difference.is_positive() {
            Discrepancy::Surplus
        } else if self.difference.is_negative() {
            Discrepancy::Shortage
        } else {
            Discrepancy::Balanced
        }
    }

    /// Count and sum of one payment bucket.
    pub fn bucket(&self, method: PaymentMethod) -> (u32, Money) {
        match method {
            PaymentMethod::Efectivo => (self.count_cash, self.sales_cash),
            PaymentMethod::Tarjeta => (self.count_card, self.sales_card),
            PaymentMethod::Qr => (self.count_qr, self.sales_qr),
            PaymentMethod::Mixto => (self.count_mixed, self.sales_mixed),
        }
    }
}

// =============================================================================
// Computation
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    count: u32,
    sales: Money,
}

const fn bucket_index(method: PaymentMethod) -> usize {
    match method {
        PaymentMethod::Efectivo => 0,
        PaymentMethod::Tarjeta => 1,
        PaymentMethod::Qr => 2,
        PaymentMethod::Mixto => 3,
    }
}

/// Cash sales of completed sales only.
fn cash_sales(sales: &[SaleRecord]) -> Money {
    sales
        .iter()
        .filter(|s| s.is_completed() && s.payment_method.touches_drawer())
        .map(|s| s.total)
        .sum()
}

/// Opening amount plus completed cash sales.
///
/// Used both to fix `expected_amount` when a session closes and to project
/// it while the session is still open, so the two always agree.
pub fn projected_expected_amount(session: &CashRegisterSession, sales: &[SaleRecord]) -> Money {
    session.opening_amount + cash_sales(sales)
}

/// Builds the closing report for `session` from its `sales`.
///
/// Pure and deterministic: the same inputs always give an identical report.
///
/// ## Expected amount
/// A closed session carries the `expected_amount` fixed at close and that
/// value is reported. An open session (or a legacy record without one) gets
/// the projection from [`projected_expected_amount`].
///
/// ## Difference
/// `closing_amount − expected_amount`, with a missing closing amount taken
/// as zero. For an open session this is only a projection; check
/// [`ReconciliationReport::is_final`].
pub fn reconcile(session: &CashRegisterSession, sales: &[SaleRecord]) -> ReconciliationReport {
    let mut buckets = [Bucket::default(); 4];
    let mut cancelled_transactions = 0;
    let mut total_discount = Money::zero();
    let mut total_tax = Money::zero();

    for sale in sales {
        if !sale.is_completed() {
            cancelled_transactions += 1;
            continue;
        }

        let bucket = &mut buckets[bucket_index(sale.payment_method)];
        bucket.count += 1;
        bucket.sales += sale.total;

        total_discount += sale.discount_amount;
        total_tax += sale.tax_amount;
    }

    let [cash, card, qr, mixed] = buckets;

    let expected_amount = session
        .expected_amount
        .unwrap_or(session.opening_amount + cash.sales);
    let difference = session.closing_amount.unwrap_or_default() - expected_amount;

    ReconciliationReport {
        register: session.clone(),
        total_sales: buckets.iter().map(|b| b.sales).sum(),
        total_transactions: buckets.iter().map(|b| b.count).sum(),
        cancelled_transactions,
        total_discount,
        total_tax,
        sales_cash: cash.sales,
        sales_card: card.sales,
        sales_qr: qr.sales,
        sales_mixed: mixed.sales,
        count_cash: cash.count,
        count_card: card.count,
        count_qr: qr.count,
        count_mixed: mixed.count,
        expected_amount,
        difference,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
