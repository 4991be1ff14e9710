//! Deploy the Domains contract, register "hack" and verify the result.
//!
//! Exits 0 when all steps succeed, 1 on the first failure (the error is
//! dumped before exit). Diagnostics go to stderr; stdout carries only the
//! three result lines.

use deploy::{run, DeployParams, EnvironmentConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = EnvironmentConfig::from_env()?;
    let provider = deploy::setup_environment(&config);

    run(&provider, config.confirmation_timeout, &DeployParams::default()).await?;
    Ok(())
}
