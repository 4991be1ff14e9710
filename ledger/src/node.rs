//! In-process development ledger.
//!
//! `LocalNode` seeds a set of funded accounts and runs a background block
//! producer: submitted transactions are mined strictly in order, one block
//! per transaction, after the configured block time. Submission and
//! confirmation are therefore genuinely decoupled, the way they are against
//! a real node.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{keccak256, Address, B256, U256};
use rand::RngCore;
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::account::Account;
use crate::contract::{Call, CallContext, ContractCode, ContractLogic, Revert, Value};
use crate::error::LedgerError;
use crate::provider::LedgerProvider;
use crate::tx::{PendingTransaction, Receipt};

/// Configuration of a local development ledger.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub chain_id: u64,
    /// Number of pre-funded accounts to seed.
    pub accounts: usize,
    /// Initial balance of every seeded account, in smallest units.
    pub initial_balance: U256,
    /// Delay between a transaction's submission and its block.
    pub block_time: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            chain_id: 31337,
            accounts: 10,
            // 10 native units per account
            initial_balance: U256::from(10_000_000_000_000_000_000u128),
            block_time: Duration::from_millis(50),
        }
    }
}

enum TxPayload {
    Create {
        code: Arc<dyn ContractCode>,
        args: Vec<Value>,
    },
    Call {
        to: Address,
        call: Call,
    },
}

struct QueuedTx {
    id: B256,
    from: Address,
    payload: TxPayload,
    reply: oneshot::Sender<Result<Receipt, Revert>>,
}

struct ChainState {
    height: u64,
    /// Creation counter, used to derive contract addresses.
    nonce: u64,
    balances: HashMap<Address, U256>,
    contracts: HashMap<Address, Box<dyn ContractLogic>>,
}

/// Handle to an in-process development chain.
///
/// Cheap to clone; all handles share the same chain state. The block
/// producer stops once every handle has been dropped.
#[derive(Clone)]
pub struct LocalNode {
    chain_id: u64,
    accounts: Arc<Vec<Account>>,
    state: Arc<RwLock<ChainState>>,
    queue: mpsc::UnboundedSender<QueuedTx>,
}

impl LocalNode {
    /// Seed the chain and start its block producer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: NodeConfig) -> Self {
        let mut rng = rand::rng();
        let accounts: Vec<Account> = (0..config.accounts)
            .map(|_| {
                let mut bytes = [0u8; 20];
                rng.fill_bytes(&mut bytes);
                Account::new(Address::from(bytes))
            })
            .collect();

        let balances = accounts
            .iter()
            .map(|account| (account.address(), config.initial_balance))
            .collect();

        let state = Arc::new(RwLock::new(ChainState {
            height: 0,
            nonce: 0,
            balances,
            contracts: HashMap::new(),
        }));

        let (queue, inbox) = mpsc::unbounded_channel();
        tokio::spawn(produce_blocks(Arc::clone(&state), inbox, config.block_time));
        tracing::info!(
            chain_id = config.chain_id,
            accounts = accounts.len(),
            "local ledger started"
        );

        Self {
            chain_id: config.chain_id,
            accounts: Arc::new(accounts),
            state,
            queue,
        }
    }

    fn submit(&self, from: Address, payload: TxPayload) -> Result<PendingTransaction, LedgerError> {
        let mut entropy = [0u8; 32];
        rand::rng().fill_bytes(&mut entropy);
        let id = B256::from(entropy);

        let (reply, receipt) = oneshot::channel();
        self.queue
            .send(QueuedTx {
                id,
                from,
                payload,
                reply,
            })
            .map_err(|_| LedgerError::NodeUnavailable)?;
        Ok(PendingTransaction::new(id, receipt))
    }
}

#[async_trait::async_trait]
impl LedgerProvider for LocalNode {
    async fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
        if self.accounts.is_empty() {
            return Err(LedgerError::NoSigners);
        }
        Ok(self.accounts.as_ref().clone())
    }

    async fn deploy(
        &self,
        from: &Account,
        code: Arc<dyn ContractCode>,
        args: Vec<Value>,
    ) -> Result<PendingTransaction, LedgerError> {
        self.submit(from.address(), TxPayload::Create { code, args })
    }

    async fn send(
        &self,
        from: &Account,
        to: Address,
        call: Call,
    ) -> Result<PendingTransaction, LedgerError> {
        self.submit(from.address(), TxPayload::Call { to, call })
    }

    async fn query(&self, to: Address, method: &str, args: &[Value]) -> Result<Value, LedgerError> {
        let state = self.state.read().await;
        let logic = state
            .contracts
            .get(&to)
            .ok_or(LedgerError::UnknownContract(to))?;
        Ok(logic.query(method, args)?)
    }

    async fn balance(&self, address: Address) -> Result<U256, LedgerError> {
        let state = self.state.read().await;
        Ok(state.balances.get(&address).copied().unwrap_or(U256::ZERO))
    }

    async fn block_height(&self) -> Result<u64, LedgerError> {
        Ok(self.state.read().await.height)
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

async fn produce_blocks(
    state: Arc<RwLock<ChainState>>,
    mut inbox: mpsc::UnboundedReceiver<QueuedTx>,
    block_time: Duration,
) {
    while let Some(tx) = inbox.recv().await {
        tokio::time::sleep(block_time).await;

        let QueuedTx {
            id,
            from,
            payload,
            reply,
        } = tx;

        let outcome = {
            let mut state = state.write().await;
            state.height += 1;
            execute(&mut state, id, from, payload)
        };

        match &outcome {
            Ok(receipt) => tracing::debug!(tx = %id, block = receipt.block, "mined"),
            Err(revert) => tracing::debug!(tx = %id, reason = %revert.reason, "reverted"),
        }

        // the submitter may have stopped waiting; the block stands either way
        let _ = reply.send(outcome);
    }
}

fn execute(
    state: &mut ChainState,
    id: B256,
    from: Address,
    payload: TxPayload,
) -> Result<Receipt, Revert> {
    match payload {
        TxPayload::Create { code, args } => {
            let address = creation_address(from, state.nonce);
            state.nonce += 1;

            let ctx = CallContext {
                caller: from,
                contract: address,
                payment: U256::ZERO,
                block: state.height,
            };
            let logic = code.constructor(&ctx, &args)?;
            state.contracts.insert(address, logic);

            Ok(Receipt {
                tx: id,
                block: state.height,
                contract_address: Some(address),
                return_value: Value::Unit,
            })
        }
        TxPayload::Call { to, call } => {
            let sender_balance = state.balances.get(&from).copied().unwrap_or(U256::ZERO);
            if sender_balance < call.payment {
                return Err(Revert::new(format!(
                    "sender {from} cannot cover payment of {} wei",
                    call.payment
                )));
            }
            let logic = state
                .contracts
                .get_mut(&to)
                .ok_or_else(|| Revert::new(format!("call target {to} is not a contract")))?;

            let ctx = CallContext {
                caller: from,
                contract: to,
                payment: call.payment,
                block: state.height,
            };
            let return_value = logic.call(&ctx, &call.method, &call.args)?;

            // the payment settles only once the call has succeeded
            state.balances.insert(from, sender_balance - call.payment);
            let credited = state.balances.get(&to).copied().unwrap_or(U256::ZERO) + call.payment;
            state.balances.insert(to, credited);

            Ok(Receipt {
                tx: id,
                block: state.height,
                contract_address: None,
                return_value,
            })
        }
    }
}

fn creation_address(deployer: Address, nonce: u64) -> Address {
    let mut preimage = [0u8; 28];
    preimage[..20].copy_from_slice(deployer.as_slice());
    preimage[20..].copy_from_slice(&nonce.to_be_bytes());
    Address::from_word(keccak256(preimage))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal contract used to exercise the node without pulling in the
    /// real contract crates.
    struct Counter {
        count: u64,
    }

    impl ContractLogic for Counter {
        fn call(
            &mut self,
            _ctx: &CallContext,
            method: &str,
            _args: &[Value],
        ) -> Result<Value, Revert> {
            match method {
                "increment" => {
                    self.count += 1;
                    Ok(Value::Uint(U256::from(self.count)))
                }
                "explode" => Err(Revert::new("explode always reverts")),
                other => Err(Revert::new(format!("unknown method {other}"))),
            }
        }

        fn query(&self, method: &str, _args: &[Value]) -> Result<Value, Revert> {
            match method {
                "count" => Ok(Value::Uint(U256::from(self.count))),
                other => Err(Revert::new(format!("unknown method {other}"))),
            }
        }
    }

    struct CounterCode;

    impl ContractCode for CounterCode {
        fn constructor(
            &self,
            _ctx: &CallContext,
            _args: &[Value],
        ) -> Result<Box<dyn ContractLogic>, Revert> {
            Ok(Box::new(Counter { count: 0 }))
        }
    }

    fn fast_node() -> LocalNode {
        LocalNode::start(NodeConfig {
            block_time: Duration::from_millis(1),
            ..NodeConfig::default()
        })
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn mines_creations_and_calls_with_settled_payments() {
        let node = fast_node();
        let accounts = node.accounts().await.unwrap();
        let sender = &accounts[0];
        let initial = node.balance(sender.address()).await.unwrap();

        let pending = node
            .deploy(sender, Arc::new(CounterCode), vec![])
            .await
            .unwrap();
        let receipt = pending.confirmed(WAIT).await.unwrap();
        let contract = receipt.contract_address.unwrap();

        let payment = U256::from(1_000u64);
        let pending = node
            .send(
                sender,
                contract,
                Call::new("increment", vec![]).with_payment(payment),
            )
            .await
            .unwrap();
        let receipt = pending.confirmed(WAIT).await.unwrap();
        assert_eq!(receipt.return_value.as_uint(), Some(U256::from(1u64)));

        assert_eq!(
            node.query(contract, "count", &[]).await.unwrap(),
            Value::Uint(U256::from(1u64))
        );
        assert_eq!(node.balance(contract).await.unwrap(), payment);
        assert_eq!(
            node.balance(sender.address()).await.unwrap(),
            initial - payment
        );
        assert!(node.block_height().await.unwrap() >= 2);
    }

    #[tokio::test]
    async fn reverted_calls_leave_balances_untouched() {
        let node = fast_node();
        let accounts = node.accounts().await.unwrap();
        let sender = &accounts[0];
        let initial = node.balance(sender.address()).await.unwrap();

        let pending = node
            .deploy(sender, Arc::new(CounterCode), vec![])
            .await
            .unwrap();
        let contract = pending.confirmed(WAIT).await.unwrap().contract_address.unwrap();

        let pending = node
            .send(
                sender,
                contract,
                Call::new("explode", vec![]).with_payment(U256::from(1_000u64)),
            )
            .await
            .unwrap();
        let err = pending.confirmed(WAIT).await.unwrap_err();
        assert!(matches!(err, LedgerError::Reverted { .. }));

        assert_eq!(node.balance(sender.address()).await.unwrap(), initial);
        assert_eq!(node.balance(contract).await.unwrap(), U256::ZERO);
    }

    #[tokio::test]
    async fn consecutive_creations_get_distinct_addresses() {
        let node = fast_node();
        let accounts = node.accounts().await.unwrap();
        let sender = &accounts[0];

        let first = node
            .deploy(sender, Arc::new(CounterCode), vec![])
            .await
            .unwrap()
            .confirmed(WAIT)
            .await
            .unwrap();
        let second = node
            .deploy(sender, Arc::new(CounterCode), vec![])
            .await
            .unwrap()
            .confirmed(WAIT)
            .await
            .unwrap();

        assert_ne!(first.contract_address, second.contract_address);
    }

    #[tokio::test]
    async fn confirmation_wait_is_bounded() {
        let node = LocalNode::start(NodeConfig {
            block_time: Duration::from_millis(500),
            ..NodeConfig::default()
        });
        let accounts = node.accounts().await.unwrap();

        let pending = node
            .deploy(&accounts[0], Arc::new(CounterCode), vec![])
            .await
            .unwrap();
        let err = pending
            .confirmed(Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ConfirmationTimeout { .. }));
    }

    #[tokio::test]
    async fn queries_against_unknown_contracts_fail() {
        let node = fast_node();
        let nowhere = Address::ZERO;
        let err = node.query(nowhere, "count", &[]).await.unwrap_err();
        assert!(matches!(err, LedgerError::UnknownContract(_)));
    }
}
