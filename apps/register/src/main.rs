//! # Tally Register Entry Point
//!
//! `tally-register <snapshot.json>` prints the closing report of an exported
//! cash-register session. The setup lives in `lib.rs`.

use std::process::ExitCode;

fn main() -> ExitCode {
    match tally_register::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tally-register: {err}");
            ExitCode::FAILURE
        }
    }
}
