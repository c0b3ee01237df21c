//! # Audit Log Commands
//!
//! Reading the audit trail. Entries are written by the mutating commands
//! themselves through the `audit` helper in `commands/mod.rs`.

use tally_core::access::Permission;
use tally_core::{AuditEntry, User};
use tracing::debug;

use super::require;
use crate::error::ApiError;
use crate::state::{AuditFilter, ConfigState, RegisterState};

/// Audit entries, newest first.
///
/// Without `filter.limit` the configured page size is used
/// (`TALLY_AUDIT_LOG_LIMIT`, 100 by default).
pub fn get_audit_log(
    register: &RegisterState,
    config: &ConfigState,
    user: Option<&User>,
    filter: AuditFilter,
) -> Result<Vec<AuditEntry>, ApiError> {
    debug!(?filter, "get_audit_log command");
    require(user, Permission::ViewAuditLog)?;

    let limit = filter.limit.unwrap_or(config.audit_log_limit);
    register.with_ledger(|ledger| ledger.audit_entries(&filter, limit))
}
