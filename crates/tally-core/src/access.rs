//! # Access Control
//!
//! Role-based permissions and route authorization.
//!
//! ## Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   User ──► Role ──► {Permission}          Route ──► {Permission}        │
//! │            admin     all 14                pos       pos                │
//! │            cashier   5                     reports   view_reports_sales │
//! │            inventory 5                               OR                 │
//! │                                                      view_reports_inv.  │
//! │                                                                         │
//! │   can_access_route(user, route) =                                       │
//! │       user present AND role ∩ route requirements ≠ ∅                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both tables are fixed at compile time. Route requirements use **OR**
//! semantics: holding any one of a route's permissions is enough.
//!
//! The query functions never fail. An absent user (nobody logged in yet) or
//! an inactive one simply holds no permissions. Use [`authorize`] to turn a
//! missing permission into an error at the point where an action happens.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::User;

// =============================================================================
// Role
// =============================================================================

/// Fixed category assigned to a user by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Cashier,
    Inventory,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Cashier, Role::Inventory];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Cashier => "cashier",
            Role::Inventory => "inventory",
        }
    }

    /// Display label shown in the user list and header.
    pub const fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Cashier => "Cajero",
            Role::Inventory => "Inventarista",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "role".to_string(),
                value: s.to_string(),
                allowed: Role::ALL.iter().map(|r| r.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Permission
// =============================================================================

/// Atomic capability tag gating one action or view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Pos,
    ViewSales,
    CancelSales,
    ViewInventory,
    AdjustInventory,
    ManageProducts,
    ImportExportProducts,
    ViewCustomers,
    ViewReportsSales,
    ViewReportsInventory,
    ManageSettings,
    ManageUsers,
    ManageCashRegister,
    ViewAuditLog,
}

impl Permission {
    pub const ALL: [Permission; 14] = [
        Permission::Pos,
        Permission::ViewSales,
        Permission::CancelSales,
        Permission::ViewInventory,
        Permission::AdjustInventory,
        Permission::ManageProducts,
        Permission::ImportExportProducts,
        Permission::ViewCustomers,
        Permission::ViewReportsSales,
        Permission::ViewReportsInventory,
        Permission::ManageSettings,
        Permission::ManageUsers,
        Permission::ManageCashRegister,
        Permission::ViewAuditLog,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Permission::Pos => "pos",
            Permission::ViewSales => "view_sales",
            Permission::CancelSales => "cancel_sales",
            Permission::ViewInventory => "view_inventory",
            Permission::AdjustInventory => "adjust_inventory",
            Permission::ManageProducts => "manage_products",
            Permission::ImportExportProducts => "import_export_products",
            Permission::ViewCustomers => "view_customers",
            Permission::ViewReportsSales => "view_reports_sales",
            Permission::ViewReportsInventory => "view_reports_inventory",
            Permission::ManageSettings => "manage_settings",
            Permission::ManageUsers => "manage_users",
            Permission::ManageCashRegister => "manage_cash_register",
            Permission::ViewAuditLog => "view_audit_log",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "permission".to_string(),
                value: s.to_string(),
                allowed: Permission::ALL
                    .iter()
                    .map(|p| p.as_str().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Route
// =============================================================================

/// A navigable top-level section of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Pos,
    Sales,
    Inventory,
    Customers,
    Reports,
    Settings,
}

impl Route {
    /// Every route, in navigation order. [`allowed_routes`] preserves it.
    pub const ALL: [Route; 6] = [
        Route::Pos,
        Route::Sales,
        Route::Inventory,
        Route::Customers,
        Route::Reports,
        Route::Settings,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Route::Pos => "pos",
            Route::Sales => "sales",
            Route::Inventory => "inventory",
            Route::Customers => "customers",
            Route::Reports => "reports",
            Route::Settings => "settings",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Static Tables
// =============================================================================

const CASHIER_PERMISSIONS: &[Permission] = &[
    Permission::Pos,
    Permission::ViewSales,
    Permission::ViewCustomers,
    Permission::ViewReportsSales,
    Permission::ManageCashRegister,
];

const INVENTORY_PERMISSIONS: &[Permission] = &[
    Permission::ViewInventory,
    Permission::AdjustInventory,
    Permission::ManageProducts,
    Permission::ImportExportProducts,
    Permission::ViewReportsInventory,
];

/// The fixed permission slice for a role.
pub fn role_permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => &Permission::ALL,
        Role::Cashier => CASHIER_PERMISSIONS,
        Role::Inventory => INVENTORY_PERMISSIONS,
    }
}

/// Permissions that each unlock a route. Holding any one is sufficient.
pub fn route_requirements(route: Route) -> &'static [Permission] {
    match route {
        Route::Pos => &[Permission::Pos],
        Route::Sales => &[Permission::ViewSales],
        Route::Inventory => &[Permission::ViewInventory],
        Route::Customers => &[Permission::ViewCustomers],
        Route::Reports => &[Permission::ViewReportsSales, Permission::ViewReportsInventory],
        Route::Settings => &[Permission::ManageSettings, Permission::ManageCashRegister],
    }
}

// =============================================================================
// Queries
// =============================================================================

/// Returns the permission set granted to a role.
pub fn permissions_for_role(role: Role) -> BTreeSet<Permission> {
    role_permissions(role).iter().copied().collect()
}

/// Same as [`permissions_for_role`] for a role name coming from outside.
///
/// An unrecognized name yields the empty set rather than an error; the
/// caller may be evaluating a half-loaded or logged-out state.
pub fn permissions_for_role_name(name: &str) -> BTreeSet<Permission> {
    name.parse::<Role>()
        .map(permissions_for_role)
        .unwrap_or_default()
}

/// True if `user` is present, active and its role grants `permission`.
///
/// For an active user this is exactly `permission ∈ role_permissions(role)`.
/// A deactivated account holds nothing regardless of its role. The PIN login
/// already refuses such accounts; this covers a user deactivated mid-shift.
pub fn has_permission(user: Option<&User>, permission: Permission) -> bool {
    match user {
        Some(user) if user.is_active => role_permissions(user.role).contains(&permission),
        _ => false,
    }
}

/// True if at least one of `permissions` is held. Stops at the first match.
pub fn has_any_permission(user: Option<&User>, permissions: &[Permission]) -> bool {
    permissions.iter().any(|p| has_permission(user, *p))
}

/// True if `user` holds any of the permissions `route` requires.
pub fn can_access_route(user: Option<&User>, route: Route) -> bool {
    user.is_some() && has_any_permission(user, route_requirements(route))
}

/// Routes `user` may navigate to, in the fixed [`Route::ALL`] order.
pub fn allowed_routes(user: Option<&User>) -> Vec<Route> {
    if user.is_none() {
        return Vec::new();
    }

    Route::ALL
        .into_iter()
        .filter(|route| can_access_route(user, *route))
        .collect()
}

/// Where to land after login: the first allowed route, or `Pos`.
///
/// The `Pos` fallback is only a landing page. Actions on it are still gated
/// by [`has_permission`] / [`authorize`].
pub fn default_route(user: Option<&User>) -> Route {
    allowed_routes(user).first().copied().unwrap_or(Route::Pos)
}

/// Requires `user` to hold `permission`.
///
/// ## Errors
/// - [`CoreError::Unauthenticated`] when nobody is logged in
/// - [`CoreError::Forbidden`] when the role (or an inactive account) lacks it
pub fn authorize(user: Option<&User>, permission: Permission) -> CoreResult<()> {
    let Some(current) = user else {
        return Err(CoreError::Unauthenticated);
    };

    if has_permission(user, permission) {
        Ok(())
    } else {
        Err(CoreError::Forbidden {
            user: current.name.clone(),
            permission,
        })
    }
}

/// Like [`authorize`], succeeding if any one of `permissions` is held.
///
/// On failure the first permission of the list is reported. An empty list
/// denies, matching [`has_any_permission`].
pub fn authorize_any(user: Option<&User>, permissions: &[Permission]) -> CoreResult<()> {
    let Some(current) = user else {
        return Err(CoreError::Unauthenticated);
    };

    if has_any_permission(user, permissions) {
        return Ok(());
    }

    match permissions.first() {
        Some(permission) => Err(CoreError::Forbidden {
            user: current.name.clone(),
            permission: *permission,
        }),
        None => Err(CoreError::NoPermissionRequested {
            user: current.name.clone(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
