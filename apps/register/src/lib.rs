//! # Tally Register Library
//!
//! Service layer of the Tally POS cash register: permission-gated commands
//! over an in-memory ledger, plus the `tally-register` report tool.
//!
//! ## Module Organization
//! ```text
//! tally_register/
//! ├── lib.rs          ◄─── You are here (logging setup & report tool)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── register.rs ◄─── Ledger of sessions, sales, audit entries
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Authorization and audit helpers
//! │   ├── session.rs  ◄─── Open / close / report cash register
//! │   ├── sale.rs     ◄─── Record and cancel sales
//! │   ├── navigation.rs ◄─ Routes and permission checks
//! │   ├── audit.rs    ◄─── Audit log reads
//! │   └── config.rs   ◄─── Configuration retrieval
//! ├── snapshot.rs     ◄─── Session + sales JSON input of the report tool
//! └── error.rs        ◄─── API and entry point error types
//! ```
//!
//! ## State Management
//! Commands take only the state they need: `&RegisterState` for the ledger,
//! `&ConfigState` for formatting and limits, and the acting `User`.

pub mod commands;
pub mod error;
pub mod snapshot;
pub mod state;

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use error::RunError;
use snapshot::SessionSnapshot;
use state::ConfigState;

/// Runs the report tool.
///
/// ## Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging (stderr, RUST_LOG or "info,tally=debug")         │
/// │                                                                         │
/// │  2. Load Configuration (TALLY_* environment variables)                  │
/// │                                                                         │
/// │  3. Read Snapshot (first argument: session + sales JSON)                │
/// │                                                                         │
/// │  4. Reconcile and print the report as JSON on stdout                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> Result<(), RunError> {
    init_tracing();

    let config = ConfigState::from_env()?;
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or(RunError::Usage)?;

    let snapshot = SessionSnapshot::load(&path)?;
    let report = snapshot.reconcile();

    info!(
        store = %config.store_name,
        session_id = %report.register.id,
        final_report = report.is_final(),
        expected = %config.format_money(report.expected_amount),
        difference = %config.format_money(report.difference),
        "Session reconciled"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally=trace` - Show trace for tally crates only
/// - Default: INFO, DEBUG for tally crates
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tally=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
