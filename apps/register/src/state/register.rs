//! # Register State
//!
//! The in-memory ledger of cash-register sessions, sales and audit entries.
//! It stands in for the backend store the commands would otherwise call.
//!
//! ## Thread Safety
//! The ledger is wrapped in `Arc<Mutex<T>>`:
//! 1. Several commands may touch it concurrently
//! 2. "At most one open session" has to be checked and enforced under the
//!    same lock that inserts the session
//!
//! ## Ledger Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command                   Ledger change                                │
//! │  ───────                   ─────────────                                │
//! │  open_cash_register  ────► sessions.push(open session)                  │
//! │  record_sale         ────► sales.push(sale in current session)          │
//! │  cancel_sale         ────► sales[i].status = cancelled                  │
//! │  close_cash_register ────► sessions[i] closed (immutable afterwards)    │
//! │  every mutation      ────► audit.push(entry)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use tally_core::{AuditEntry, CashRegisterSession, CoreError, CoreResult, SaleRecord};
use tracing::error;

use crate::error::ApiError;

/// Filter for reading the audit log.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct AuditFilter {
    pub user_id: Option<String>,
    pub action: Option<String>,
    pub limit: Option<usize>,
}

/// Sessions, sales and audit entries of one terminal.
///
/// ## Invariants
/// - At most one session has `closed_at == None`
/// - Sale numbers are assigned sequentially starting at 1
#[derive(Debug, Default)]
pub struct Ledger {
    sessions: Vec<CashRegisterSession>,
    sales: Vec<SaleRecord>,
    audit: Vec<AuditEntry>,
    last_sale_number: i64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The open session, if any.
    pub fn current_session(&self) -> Option<&CashRegisterSession> {
        self.sessions.iter().rev().find(|s| s.is_open())
    }

    pub fn current_session_mut(&mut self) -> Option<&mut CashRegisterSession> {
        self.sessions.iter_mut().rev().find(|s| s.is_open())
    }

    pub fn session(&self, id: &str) -> Option<&CashRegisterSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Stores a newly opened session.
    ///
    /// ## Errors
    /// [`CoreError::SessionAlreadyOpen`] if another session is still open.
    pub fn insert_session(&mut self, session: CashRegisterSession) -> CoreResult<()> {
        if let Some(open) = self.current_session() {
            return Err(CoreError::SessionAlreadyOpen(open.id.clone()));
        }
        self.sessions.push(session);
        Ok(())
    }

    /// Sales rung up in session `id`, in the order they were recorded.
    pub fn sales_for_session(&self, id: &str) -> Vec<SaleRecord> {
        self.sales
            .iter()
            .filter(|s| s.cash_register_id.as_deref() == Some(id))
            .cloned()
            .collect()
    }

    pub fn next_sale_number(&mut self) -> i64 {
        self.last_sale_number += 1;
        self.last_sale_number
    }

    pub fn insert_sale(&mut self, sale: SaleRecord) {
        self.sales.push(sale);
    }

    pub fn sale(&self, id: &str) -> Option<&SaleRecord> {
        self.sales.iter().find(|s| s.id == id)
    }

    pub fn sale_mut(&mut self, id: &str) -> Option<&mut SaleRecord> {
        self.sales.iter_mut().find(|s| s.id == id)
    }

    pub fn record_audit(&mut self, entry: AuditEntry) {
        self.audit.push(entry);
    }

    /// Audit entries matching `filter`, newest first, at most `limit`.
    pub fn audit_entries(&self, filter: &AuditFilter, limit: usize) -> Vec<AuditEntry> {
        self.audit
            .iter()
            .rev()
            .filter(|e| filter.user_id.as_ref().map_or(true, |u| &e.user_id == u))
            .filter(|e| filter.action.as_ref().map_or(true, |a| &e.action == a))
            .take(limit)
            .cloned()
            .collect()
    }
}

/// Shared register state handed to every command.
#[derive(Debug, Clone, Default)]
pub struct RegisterState {
    ledger: Arc<Mutex<Ledger>>,
}

impl RegisterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the ledger.
    pub fn with_ledger<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&Ledger) -> R,
    {
        let ledger = self.ledger.lock().map_err(|_| poisoned())?;
        Ok(f(&ledger))
    }

    /// Executes a function with write access to the ledger.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// register.with_ledger_mut(|ledger| ledger.insert_session(session))??;
    /// ```
    pub fn with_ledger_mut<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&mut Ledger) -> R,
    {
        let mut ledger = self.ledger.lock().map_err(|_| poisoned())?;
        Ok(f(&mut ledger))
    }
}

fn poisoned() -> ApiError {
    error!("Register ledger mutex poisoned");
    ApiError::internal("Register state is unavailable")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tally_core::Money;

    fn entry(user_id: &str, action: &str) -> AuditEntry {
        AuditEntry {
            id: format!("{user_id}-{action}"),
            user_id: user_id.to_string(),
            user_name: user_id.to_string(),
            action: action.to_string(),
            entity_type: None,
            entity_id: None,
            details: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_single_open_session() {
        let mut ledger = Ledger::new();
        let first = CashRegisterSession::open(Money::zero(), None, Utc::now()).unwrap();
        let first_id = first.id.clone();
        ledger.insert_session(first).unwrap();

        let second = CashRegisterSession::open(Money::zero(), None, Utc::now()).unwrap();
        let err = ledger.insert_session(second).unwrap_err();
        assert!(matches!(err, CoreError::SessionAlreadyOpen(id) if id == first_id));
    }

    #[test]
    fn test_sale_numbers_are_sequential() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.next_sale_number(), 1);
        assert_eq!(ledger.next_sale_number(), 2);
    }

    #[test]
    fn test_audit_filter_newest_first() {
        let mut ledger = Ledger::new();
        ledger.record_audit(entry("ana", "open_cash_register"));
        ledger.record_audit(entry("luis", "record_sale"));
        ledger.record_audit(entry("ana", "record_sale"));

        let all = ledger.audit_entries(&AuditFilter::default(), 10);
        assert_eq!(all.first().map(|e| e.id.as_str()), Some("ana-record_sale"));

        let filter = AuditFilter {
            user_id: Some("ana".to_string()),
            ..Default::default()
        };
        assert_eq!(ledger.audit_entries(&filter, 10).len(), 2);
        assert_eq!(ledger.audit_entries(&filter, 1).len(), 1);

        let filter = AuditFilter {
            action: Some("record_sale".to_string()),
            ..Default::default()
        };
        assert_eq!(ledger.audit_entries(&filter, 10).len(), 2);
    }

    #[test]
    fn test_state_closures() {
        let state = RegisterState::new();
        state
            .with_ledger_mut(|l| l.record_audit(entry("ana", "x")))
            .unwrap();
        let count = state
            .with_ledger(|l| l.audit_entries(&AuditFilter::default(), 10).len())
            .unwrap();
        assert_eq!(count, 1);
    }
}
