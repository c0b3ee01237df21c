//! # tally-core: Access Control and Cash Reconciliation for Tally POS
//!
//! Pure business logic with zero I/O: who may see and do what, and how a
//! cash drawer's closing figures are derived from its sales.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Frontend (navigation, cash screens)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               tally-register (commands, ledger)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  access   │  │ reconcile │  │   types   │  │ validation│  │   │
//! │  │   │  Role     │  │  Report   │  │  Session  │  │  amounts  │  │   │
//! │  │   │  Route    │  │  buckets  │  │  Sale     │  │  methods  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`access`] - Roles, permissions, routes and the lookup tables
//! - [`reconcile`] - Session closing report
//! - [`types`] - User, sale records, cash-register sessions
//! - [`money`] - Integer money
//! - [`validation`] - Boundary checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::access::{can_access_route, Role, Route};
//! use tally_core::User;
//!
//! let cashier = User {
//!     id: "u1".into(),
//!     name: "Ana".into(),
//!     role: Role::Cashier,
//!     is_active: true,
//! };
//!
//! // Settings needs manage_settings OR manage_cash_register.
//! assert!(can_access_route(Some(&cashier), Route::Settings));
//! ```

pub mod access;
pub mod error;
pub mod money;
pub mod reconcile;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::{Permission, Role, Route};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use reconcile::{reconcile, Discrepancy, ReconciliationReport};
pub use types::*;
