//! Seams between the ledger and the contracts it hosts.

use alloy_primitives::{Address, U256};

/// Argument and return values of untyped contract calls.
///
/// The ledger does not know contract ABIs statically; calls are encoded as a
/// method name plus a list of these values, the same way a generic node
/// client encodes calls against contracts it has no bindings for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Unit,
    String(String),
    Address(Address),
    Uint(U256),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }
}

/// A state-changing contract call: method, arguments and attached payment.
#[derive(Debug, Clone)]
pub struct Call {
    pub method: String,
    pub args: Vec<Value>,
    pub payment: U256,
}

impl Call {
    /// A call with no attached payment.
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
            payment: U256::ZERO,
        }
    }

    /// Attach a native-currency payment to the call.
    pub fn with_payment(mut self, payment: U256) -> Self {
        self.payment = payment;
        self
    }
}

/// Execution context the ledger hands to contract code.
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Account that authorized the transaction.
    pub caller: Address,
    /// Address the contract is (being) installed at.
    pub contract: Address,
    /// Native currency attached to the call.
    pub payment: U256,
    /// Height of the block the transaction is mined into.
    pub block: u64,
}

/// Rejection raised by contract-level logic.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{reason}")]
pub struct Revert {
    pub reason: String,
}

impl Revert {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Logic and storage of a deployed contract instance.
///
/// Implementations must perform all checks before mutating their storage:
/// the ledger rolls the value transfer back when `call` reverts, but it
/// cannot roll back logic-internal state.
pub trait ContractLogic: Send + Sync {
    /// Execute a state-changing method.
    fn call(&mut self, ctx: &CallContext, method: &str, args: &[Value]) -> Result<Value, Revert>;

    /// Execute a read-only method against current storage.
    fn query(&self, method: &str, args: &[Value]) -> Result<Value, Revert>;
}

/// Deployable contract code.
///
/// The constructor builds the instance's initial storage from the creation
/// transaction's arguments, or reverts the creation.
pub trait ContractCode: Send + Sync {
    fn constructor(&self, ctx: &CallContext, args: &[Value])
        -> Result<Box<dyn ContractLogic>, Revert>;
}
