//! Environment configuration and setup shared by scripts and tests.

use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::U256;
use ledger::{money, LocalNode, NodeConfig};

/// Explicit configuration of the execution environment a run uses.
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub chain_id: u64,
    /// Number of pre-funded accounts in the signer registry.
    pub accounts: usize,
    /// Initial balance of every account, in smallest units.
    pub initial_balance: U256,
    /// Upper bound for every confirmation wait.
    pub confirmation_timeout: Duration,
    /// The ledger's block time.
    pub block_time: Duration,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        let node = NodeConfig::default();
        Self {
            chain_id: node.chain_id,
            accounts: node.accounts,
            initial_balance: node.initial_balance,
            confirmation_timeout: Duration::from_secs(30),
            block_time: node.block_time,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}

impl EnvironmentConfig {
    /// Load overrides from `DOMAINS_*` environment variables, falling back
    /// to defaults. A `.env` file in the working directory is honored.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        if let Some(chain_id) = parse_var("DOMAINS_CHAIN_ID")? {
            config.chain_id = chain_id;
        }
        if let Some(accounts) = parse_var("DOMAINS_ACCOUNTS")? {
            config.accounts = accounts;
        }
        if let Some(raw) = var("DOMAINS_INITIAL_BALANCE") {
            config.initial_balance =
                money::parse_amount(&raw).map_err(|_| ConfigError::Invalid {
                    var: "DOMAINS_INITIAL_BALANCE",
                    value: raw,
                })?;
        }
        if let Some(millis) = parse_var("DOMAINS_CONFIRMATION_TIMEOUT_MS")? {
            config.confirmation_timeout = Duration::from_millis(millis);
        }
        if let Some(millis) = parse_var("DOMAINS_BLOCK_TIME_MS")? {
            config.block_time = Duration::from_millis(millis);
        }
        Ok(config)
    }

    fn node(&self) -> NodeConfig {
        NodeConfig {
            chain_id: self.chain_id,
            accounts: self.accounts,
            initial_balance: self.initial_balance,
            block_time: self.block_time,
        }
    }
}

/// Start the local development ledger described by `config`.
///
/// Must be called from within a tokio runtime.
pub fn setup_environment(config: &EnvironmentConfig) -> LocalNode {
    LocalNode::start(config.node())
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    var(name)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::Invalid { var: name, value })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable_without_any_environment() {
        let config = EnvironmentConfig::default();
        assert!(config.accounts >= 2);
        assert!(config.initial_balance > U256::ZERO);
        assert!(config.confirmation_timeout > config.block_time);
    }

    #[test]
    fn malformed_overrides_are_reported_not_defaulted() {
        std::env::set_var("DOMAINS_CHAIN_ID", "not-a-number");
        let err = EnvironmentConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == "DOMAINS_CHAIN_ID"));
        std::env::remove_var("DOMAINS_CHAIN_ID");
    }
}
