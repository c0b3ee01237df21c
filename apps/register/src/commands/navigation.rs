//! # Navigation Commands
//!
//! What the frontend may show a user: the menu entries, the landing page
//! after login and single permission checks for buttons.
//!
//! These never fail. A missing or inactive user simply has no routes and
//! lands on the POS screen, which then asks for a login.

use tally_core::access::{self, Permission, Route};
use tally_core::User;
use tracing::debug;

/// Routes the user may open, in menu order.
pub fn get_allowed_routes(user: Option<&User>) -> Vec<Route> {
    let routes = access::allowed_routes(user);
    debug!(
        user_id = user.map(|u| u.id.as_str()),
        count = routes.len(),
        "get_allowed_routes command"
    );
    routes
}

/// Landing route after login.
pub fn get_default_route(user: Option<&User>) -> Route {
    let route = access::default_route(user);
    debug!(user_id = user.map(|u| u.id.as_str()), %route, "get_default_route command");
    route
}

pub fn check_permission(user: Option<&User>, permission: Permission) -> bool {
    let allowed = access::has_permission(user, permission);
    debug!(
        user_id = user.map(|u| u.id.as_str()),
        %permission,
        allowed,
        "check_permission command"
    );
    allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::user;
    use tally_core::Role;

    #[test]
    fn test_inventory_user_lands_on_inventory() {
        let clerk = user(Role::Inventory);
        let routes = get_allowed_routes(Some(&clerk));
        assert!(routes.contains(&Route::Inventory));
        assert!(!routes.contains(&Route::Pos));
        assert_eq!(get_default_route(Some(&clerk)), Route::Inventory);
    }

    #[test]
    fn test_cashier_lands_on_pos() {
        let cashier = user(Role::Cashier);
        assert_eq!(get_default_route(Some(&cashier)), Route::Pos);
        assert!(check_permission(Some(&cashier), Permission::ManageCashRegister));
        assert!(!check_permission(Some(&cashier), Permission::ViewAuditLog));
    }

    #[test]
    fn test_anonymous_and_inactive_users() {
        assert!(get_allowed_routes(None).is_empty());
        assert_eq!(get_default_route(None), Route::Pos);

        let mut admin = user(Role::Admin);
        admin.is_active = false;
        assert!(get_allowed_routes(Some(&admin)).is_empty());
        assert!(!check_permission(Some(&admin), Permission::Pos));
    }
}
