//! # Register Commands Module
//!
//! All commands exposed to the frontend.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (shared helpers)
//! ├── session.rs     ◄─── Open / close / report cash register
//! ├── sale.rs        ◄─── Record and cancel sales
//! ├── navigation.rs  ◄─── Allowed routes, default route, permission checks
//! ├── audit.rs       ◄─── Audit log reads
//! └── config.rs      ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  close_cash_register(register, user, closing_amount, notes)             │
//! │         │                                                               │
//! │         ├── authorize(user, ManageCashRegister)  ── Forbidden? ──► Err  │
//! │         │                                                               │
//! │         ├── ledger lock ──► reconcile ──► session.close()              │
//! │         │                                                               │
//! │         ├── audit entry                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Ok(CashRegisterSession)   (serialized to JSON by the caller)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command receives the acting user explicitly. `None` means nobody
//! is logged in; gated commands then fail with `UNAUTHENTICATED`.

pub mod audit;
pub mod config;
pub mod navigation;
pub mod sale;
pub mod session;

use chrono::Utc;
use tally_core::access::{self, Permission};
use tally_core::{AuditEntry, User};
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::Ledger;

/// Authorizes `user` for `permission` and hands the user back.
fn require(user: Option<&User>, permission: Permission) -> Result<&User, ApiError> {
    require_any(user, &[permission])
}

fn require_any<'a>(
    user: Option<&'a User>,
    permissions: &[Permission],
) -> Result<&'a User, ApiError> {
    if let Err(err) = access::authorize_any(user, permissions) {
        warn!(
            user_id = user.map(|u| u.id.as_str()),
            ?permissions,
            "Access denied"
        );
        return Err(err.into());
    }
    user.ok_or_else(|| tally_core::CoreError::Unauthenticated.into())
}

/// Appends an audit entry for `user`.
fn audit(
    ledger: &mut Ledger,
    user: &User,
    action: &str,
    entity: Option<(&str, &str)>,
    details: Option<String>,
) {
    ledger.record_audit(AuditEntry {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        action: action.to_string(),
        entity_type: entity.map(|(kind, _)| kind.to_string()),
        entity_id: entity.map(|(_, id)| id.to_string()),
        details,
        created_at: Utc::now(),
    });
}

#[cfg(test)]
pub(crate) mod fixtures {
    use tally_core::{Role, User};

    pub fn user(role: Role) -> User {
        User {
            id: format!("u-{}", role),
            name: role.label().to_string(),
            role,
            is_active: true,
        }
    }
}
