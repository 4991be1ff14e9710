//! The deployment workflow: deploy the Domains contract, register a name,
//! read back the owner mapping and the contract balance.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use domains::DomainsCode;
use ledger::{money, Call, ContractInstance, LedgerError, LedgerProvider, Value};

/// Parameters of one deployment run.
#[derive(Debug, Clone)]
pub struct DeployParams {
    /// Used both as the contract's tld constructor argument and as the name
    /// registered on the fresh instance.
    pub name: String,
    /// Payment attached to the registration call.
    pub payment: U256,
}

impl Default for DeployParams {
    fn default() -> Self {
        Self {
            name: "hack".to_string(),
            payment: domains::registration_fee(),
        }
    }
}

/// Failure kinds of the workflow, one per step that can produce them.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("execution environment has no usable signer accounts")]
    EnvironmentUnavailable,

    #[error("contract deployment failed")]
    DeploymentFailed(#[source] LedgerError),

    #[error("registration call reverted: {reason}")]
    CallReverted { reason: String },

    #[error("read-only query failed")]
    QueryFailed(#[source] LedgerError),
}

/// The three reported values of a successful run, in print order.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub contract_address: Address,
    pub owner: Address,
    pub balance: String,
}

/// Execute the five workflow steps strictly in order; the first failure
/// aborts the remainder.
///
/// Prints the success lines as the steps complete and returns the same
/// values in the report. Nothing is queried before the registration
/// transaction has been confirmed.
pub async fn run<P: LedgerProvider>(
    provider: &P,
    confirmation_timeout: Duration,
    params: &DeployParams,
) -> Result<RunReport, DeployError> {
    // acquire accounts
    let accounts = provider
        .accounts()
        .await
        .map_err(|_| DeployError::EnvironmentUnavailable)?;
    let [owner_account, _second, ..] = accounts.as_slice() else {
        return Err(DeployError::EnvironmentUnavailable);
    };
    tracing::info!(
        chain_id = provider.chain_id(),
        accounts = accounts.len(),
        deployer = %owner_account,
        "accounts acquired"
    );

    // deploy the contract and block until the creation is mined
    let pending = provider
        .deploy(
            owner_account,
            Arc::new(DomainsCode),
            vec![Value::String(params.name.clone())],
        )
        .await
        .map_err(DeployError::DeploymentFailed)?;
    let receipt = pending
        .confirmed(confirmation_timeout)
        .await
        .map_err(DeployError::DeploymentFailed)?;
    let contract_address = receipt
        .contract_address
        .ok_or(DeployError::DeploymentFailed(
            LedgerError::NoContractCreated(receipt.tx),
        ))?;
    let contract = ContractInstance::new(provider, contract_address);
    println!("Contract deployed to: {}", contract.address());

    // register the name with the attached payment
    let registration = Call::new("register", vec![Value::String(params.name.clone())])
        .with_payment(params.payment);
    let pending = contract
        .send(owner_account, registration)
        .await
        .map_err(DeployError::DeploymentFailed)?;
    tracing::debug!(tx = %pending.id(), "registration submitted");
    match pending.confirmed(confirmation_timeout).await {
        Ok(receipt) => {
            tracing::info!(block = receipt.block, name = %params.name, "name registered");
        }
        Err(LedgerError::Reverted { reason, .. }) => {
            return Err(DeployError::CallReverted { reason });
        }
        Err(other) => return Err(DeployError::DeploymentFailed(other)),
    }

    // read back the owner mapping
    let value = contract
        .query("getAddress", &[Value::String(params.name.clone())])
        .await
        .map_err(DeployError::QueryFailed)?;
    let owner = value
        .as_address()
        .ok_or(DeployError::QueryFailed(LedgerError::UnexpectedReturn {
            expected: "an address",
            got: value.clone(),
        }))?;
    println!("Owner of domain {}: {}", params.name, owner);

    // read and format the contract balance
    let raw = contract.balance().await.map_err(DeployError::QueryFailed)?;
    let balance = money::format_amount(raw);
    println!("Contract balance: {balance}");

    Ok(RunReport {
        contract_address,
        owner,
        balance,
    })
}
