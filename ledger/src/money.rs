//! Native-currency amounts: 18-decimal fixed-point integers.

use alloy_primitives::{
    utils::{self, UnitsError},
    U256,
};

/// Parse a human-readable decimal amount (`"0.1"`) into the ledger's
/// smallest unit.
pub fn parse_amount(amount: &str) -> Result<U256, UnitsError> {
    utils::parse_ether(amount)
}

/// Format a smallest-unit amount as a decimal string.
///
/// Trailing zeros are trimmed, keeping one fractional digit: `"0.1"`,
/// `"1.0"`, `"0.0"`.
pub fn format_amount(amount: U256) -> String {
    let raw = utils::format_ether(amount);
    let trimmed = raw.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}
