//! Shared setup for the end-to-end deployment tests.

use std::time::Duration;

use deploy::EnvironmentConfig;

/// Fast-mining environment configuration for tests.
pub fn test_config() -> EnvironmentConfig {
    EnvironmentConfig {
        block_time: Duration::from_millis(5),
        confirmation_timeout: Duration::from_secs(5),
        ..EnvironmentConfig::default()
    }
}
