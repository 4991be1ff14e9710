use alloy_primitives::{Address, U256};

use crate::account::Account;
use crate::contract::{Call, Value};
use crate::error::LedgerError;
use crate::provider::LedgerProvider;
use crate::tx::PendingTransaction;

/// Handle to a deployed contract: its address plus the provider to reach it
/// through. Created once from the deployment receipt; immutable.
pub struct ContractInstance<'a, P: LedgerProvider + ?Sized> {
    provider: &'a P,
    address: Address,
}

impl<'a, P: LedgerProvider + ?Sized> ContractInstance<'a, P> {
    pub fn new(provider: &'a P, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Submit a state-changing call to this instance.
    pub async fn send(
        &self,
        from: &Account,
        call: Call,
    ) -> Result<PendingTransaction, LedgerError> {
        self.provider.send(from, self.address, call).await
    }

    /// Execute a read-only call against this instance.
    pub async fn query(&self, method: &str, args: &[Value]) -> Result<Value, LedgerError> {
        self.provider.query(self.address, method, args).await
    }

    /// Native-currency balance held at this instance's address.
    pub async fn balance(&self) -> Result<U256, LedgerError> {
        self.provider.balance(self.address).await
    }
}
