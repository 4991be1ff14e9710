use std::time::Duration;

use alloy_primitives::{Address, B256};

use crate::contract::{Revert, Value};

/// Failures surfaced by the execution-environment layer.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("no signer accounts are configured on this ledger")]
    NoSigners,

    #[error("transaction {tx} reverted: {reason}")]
    Reverted { tx: B256, reason: String },

    #[error("transaction {tx} was not confirmed within {waited:?}")]
    ConfirmationTimeout { tx: B256, waited: Duration },

    #[error("transaction {0} did not create a contract")]
    NoContractCreated(B256),

    #[error("no contract deployed at {0}")]
    UnknownContract(Address),

    #[error("query reverted: {0}")]
    QueryReverted(#[from] Revert),

    #[error("query returned {got:?} where {expected} was expected")]
    UnexpectedReturn { expected: &'static str, got: Value },

    #[error("ledger node is no longer running")]
    NodeUnavailable,
}
