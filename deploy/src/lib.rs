//! Deployment workflow for the Domains contract.
//!
//! `shared` builds the environment the scripts run against; `deployer`
//! executes the deploy → register → verify sequence.

pub mod deployer;
pub mod shared;

pub use deployer::{run, DeployError, DeployParams, RunReport};
pub use shared::{setup_environment, ConfigError, EnvironmentConfig};
