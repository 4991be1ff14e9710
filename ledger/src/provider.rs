use std::sync::Arc;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use crate::account::Account;
use crate::contract::{Call, ContractCode, Value};
use crate::error::LedgerError;
use crate::tx::PendingTransaction;

/// Client surface of the execution environment.
///
/// Covers the three collaborators the deployment workflow consumes: the
/// signer registry, the contract factory and the balance/query provider.
/// State-changing submissions return a [`PendingTransaction`]; confirmation
/// is the caller's explicit, bounded wait.
#[async_trait]
pub trait LedgerProvider: Send + Sync {
    /// Accounts of the environment's signer registry.
    async fn accounts(&self) -> Result<Vec<Account>, LedgerError>;

    /// Submit a contract-creation transaction.
    async fn deploy(
        &self,
        from: &Account,
        code: Arc<dyn ContractCode>,
        args: Vec<Value>,
    ) -> Result<PendingTransaction, LedgerError>;

    /// Submit a state-changing call to a deployed contract.
    async fn send(
        &self,
        from: &Account,
        to: Address,
        call: Call,
    ) -> Result<PendingTransaction, LedgerError>;

    /// Execute a read-only call against current state.
    async fn query(
        &self,
        to: Address,
        method: &str,
        args: &[Value],
    ) -> Result<Value, LedgerError>;

    /// Native-currency balance of an address.
    async fn balance(&self, address: Address) -> Result<U256, LedgerError>;

    /// Current block height.
    async fn block_height(&self) -> Result<u64, LedgerError>;

    /// Chain identity this provider is connected to.
    fn chain_id(&self) -> u64;
}
