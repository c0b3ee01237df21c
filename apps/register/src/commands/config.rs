//! # Config Commands
//!
//! Retrieving application configuration.

use tracing::debug;

use crate::state::ConfigState;

/// Gets the current application configuration.
///
/// ## When Used
/// - App startup (store name in the header)
/// - Currency formatting on the cash screens
///
/// ## Returns
/// Complete configuration state (read-only)
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_returns_copy() {
        let config = ConfigState {
            store_name: "Kiosko Sur".to_string(),
            ..ConfigState::default()
        };
        let copy = get_config(&config);
        assert_eq!(copy.store_name, "Kiosko Sur");
        assert_eq!(copy.currency_symbol, "Bs");
    }
}
