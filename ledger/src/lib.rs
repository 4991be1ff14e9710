//! Execution-environment surface for the Domains deployment scripts.
//!
//! The [`LedgerProvider`] trait is the seam to the external execution
//! environment (signer registry, contract deployment, calls and balance
//! queries). [`LocalNode`] is the in-process development ledger the scripts
//! and tests run against.

pub mod account;
pub mod contract;
pub mod error;
pub mod instance;
pub mod money;
pub mod node;
pub mod provider;
pub mod tx;

pub use account::Account;
pub use contract::{Call, CallContext, ContractCode, ContractLogic, Revert, Value};
pub use error::LedgerError;
pub use instance::ContractInstance;
pub use node::{LocalNode, NodeConfig};
pub use provider::LedgerProvider;
pub use tx::{PendingTransaction, Receipt};
