use std::time::Duration;

use alloy_primitives::{Address, B256};
use tokio::sync::oneshot;

use crate::contract::{Revert, Value};
use crate::error::LedgerError;

/// Outcome of a mined transaction.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub tx: B256,
    /// Block the transaction was mined into.
    pub block: u64,
    /// Address of the created contract, for creation transactions.
    pub contract_address: Option<Address>,
    /// Return value of the executed call.
    pub return_value: Value,
}

/// A submitted, not yet confirmed transaction.
///
/// Resolves when the node mines it. Dropping the handle abandons the
/// transaction's outcome but not the transaction itself.
pub struct PendingTransaction {
    id: B256,
    receipt: oneshot::Receiver<Result<Receipt, Revert>>,
}

impl PendingTransaction {
    pub(crate) fn new(id: B256, receipt: oneshot::Receiver<Result<Receipt, Revert>>) -> Self {
        Self { id, receipt }
    }

    pub fn id(&self) -> B256 {
        self.id
    }

    /// Block until the transaction is confirmed, failing after `timeout`.
    ///
    /// A mined-but-reverted transaction is reported as
    /// [`LedgerError::Reverted`]; an expired wait as
    /// [`LedgerError::ConfirmationTimeout`].
    pub async fn confirmed(self, timeout: Duration) -> Result<Receipt, LedgerError> {
        match tokio::time::timeout(timeout, self.receipt).await {
            Err(_elapsed) => Err(LedgerError::ConfirmationTimeout {
                tx: self.id,
                waited: timeout,
            }),
            Ok(Err(_closed)) => Err(LedgerError::NodeUnavailable),
            Ok(Ok(Err(revert))) => Err(LedgerError::Reverted {
                tx: self.id,
                reason: revert.reason,
            }),
            Ok(Ok(Ok(receipt))) => Ok(receipt),
        }
    }
}
