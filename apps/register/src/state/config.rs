//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TALLY_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};
use tally_core::Money;

/// Default number of audit entries returned when the caller sets no limit.
pub const DEFAULT_AUDIT_LOG_LIMIT: usize = 100;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (shown in report headers and logs)
    pub store_name: String,

    /// Currency symbol used when formatting amounts
    pub currency_symbol: String,

    /// Entries returned by `get_audit_log` when no limit is given
    pub audit_log_limit: usize,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Store: "Tally POS"
    /// - Currency: Bs
    /// - Audit log page: 100 entries
    fn default() -> Self {
        ConfigState {
            store_name: "Tally POS".to_string(),
            currency_symbol: "Bs".to_string(),
            audit_log_limit: DEFAULT_AUDIT_LOG_LIMIT,
        }
    }
}

impl ConfigState {
    /// Loads configuration from environment variables over the defaults.
    ///
    /// ## Environment Variables
    /// - `TALLY_STORE_NAME`: Override store name
    /// - `TALLY_CURRENCY_SYMBOL`: Override currency symbol
    /// - `TALLY_AUDIT_LOG_LIMIT`: Default audit log page size (positive integer)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigState::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("TALLY_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = lookup("TALLY_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(limit) = lookup("TALLY_AUDIT_LOG_LIMIT") {
            config.audit_log_limit = limit
                .trim()
                .parse()
                .ok()
                .filter(|n: &usize| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue("TALLY_AUDIT_LOG_LIMIT".to_string()))?;
        }

        Ok(config)
    }

    /// Formats an amount with the configured currency symbol.
    ///
    /// ```rust
    /// use tally_core::Money;
    /// use tally_register::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_money(Money::from_cents(1234)), "Bs 12.34");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = ConfigState::from_lookup(|_| None).unwrap();
        assert_eq!(config.store_name, "Tally POS");
        assert_eq!(config.audit_log_limit, DEFAULT_AUDIT_LOG_LIMIT);
    }

    #[test]
    fn test_overrides() {
        let config = ConfigState::from_lookup(lookup_from(&[
            ("TALLY_STORE_NAME", "Farmacia Central"),
            ("TALLY_CURRENCY_SYMBOL", "$"),
            ("TALLY_AUDIT_LOG_LIMIT", " 25 "),
        ]))
        .unwrap();
        assert_eq!(config.store_name, "Farmacia Central");
        assert_eq!(config.audit_log_limit, 25);
        assert_eq!(config.format_money(Money::from_cents(-550)), "-$ 5.50");
    }

    #[test]
    fn test_invalid_limit() {
        for bad in ["0", "-3", "many"] {
            let err =
                ConfigState::from_lookup(lookup_from(&[("TALLY_AUDIT_LOG_LIMIT", bad)])).unwrap_err();
            assert_eq!(err.to_string(), "Invalid value for TALLY_AUDIT_LOG_LIMIT");
        }
    }
}
