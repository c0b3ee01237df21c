//! # State Module
//!
//! Application state shared by the register commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │   RegisterState              │   │   ConfigState                │   │
//! │  │                              │   │                              │   │
//! │  │  Arc<Mutex<Ledger>>          │   │  store_name                  │   │
//! │  │  sessions / sales / audit    │   │  currency_symbol             │   │
//! │  │                              │   │  audit_log_limit             │   │
//! │  └──────────────────────────────┘   └──────────────────────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • RegisterState: Protected by Arc<Mutex<T>> for exclusive access      │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod register;

pub use config::{ConfigError, ConfigState, DEFAULT_AUDIT_LOG_LIMIT};
pub use register::{AuditFilter, Ledger, RegisterState};
