//! The Domains contract: a paid name registry under a fixed top-level
//! domain.
//!
//! Surface consumed by the deployment scripts: `constructor(tld)`, payable
//! `register(name)` and read-only `getAddress(name)`.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use ledger::{CallContext, ContractCode, ContractLogic, Revert, Value};

/// Minimum payment required to register a name: 0.1 native units.
pub fn registration_fee() -> U256 {
    U256::from(100_000_000_000_000_000u128)
}

/// Deployable code for the Domains contract.
///
/// The constructor takes a single string argument, the top-level domain the
/// instance serves, and rejects an empty one.
pub struct DomainsCode;

impl ContractCode for DomainsCode {
    fn constructor(
        &self,
        _ctx: &CallContext,
        args: &[Value],
    ) -> Result<Box<dyn ContractLogic>, Revert> {
        let tld = match args {
            [Value::String(tld)] => tld,
            _ => return Err(Revert::new("constructor expects a single tld string")),
        };
        if tld.is_empty() {
            return Err(Revert::new("tld must not be empty"));
        }
        Ok(Box::new(Domains {
            tld: tld.clone(),
            registry: HashMap::new(),
        }))
    }
}

/// Storage of one deployed Domains instance.
pub struct Domains {
    tld: String,
    registry: HashMap<String, Address>,
}

impl ContractLogic for Domains {
    fn call(&mut self, ctx: &CallContext, method: &str, args: &[Value]) -> Result<Value, Revert> {
        match method {
            "register" => {
                let name = name_arg(args)?;
                if ctx.payment < registration_fee() {
                    return Err(Revert::new("payment below registration fee"));
                }
                if self.registry.contains_key(name) {
                    return Err(Revert::new(format!(
                        "{name}.{} is already registered",
                        self.tld
                    )));
                }
                self.registry.insert(name.to_string(), ctx.caller);
                Ok(Value::Unit)
            }
            other => Err(Revert::new(format!("unknown method {other}"))),
        }
    }

    fn query(&self, method: &str, args: &[Value]) -> Result<Value, Revert> {
        match method {
            // mapping read: zero address for unregistered names
            "getAddress" => {
                let name = name_arg(args)?;
                Ok(Value::Address(
                    self.registry.get(name).copied().unwrap_or(Address::ZERO),
                ))
            }
            other => Err(Revert::new(format!("unknown method {other}"))),
        }
    }
}

fn name_arg(args: &[Value]) -> Result<&str, Revert> {
    match args {
        [Value::String(name)] => Ok(name),
        _ => Err(Revert::new("expected a single name argument")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(caller: Address, payment: U256) -> CallContext {
        CallContext {
            caller,
            contract: Address::repeat_byte(0xCC),
            payment,
            block: 1,
        }
    }

    fn deployed(tld: &str) -> Box<dyn ContractLogic> {
        DomainsCode
            .constructor(
                &ctx(Address::repeat_byte(0x11), U256::ZERO),
                &[Value::String(tld.to_string())],
            )
            .unwrap()
    }

    #[test]
    fn register_records_the_caller() {
        let mut contract = deployed("hack");
        let caller = Address::repeat_byte(0x22);

        contract
            .call(
                &ctx(caller, registration_fee()),
                "register",
                &[Value::String("hack".into())],
            )
            .unwrap();

        let owner = contract
            .query("getAddress", &[Value::String("hack".into())])
            .unwrap();
        assert_eq!(owner, Value::Address(caller));
    }

    #[test]
    fn register_requires_the_fee() {
        let mut contract = deployed("hack");
        let underpaid = registration_fee() - U256::from(1u64);

        let err = contract
            .call(
                &ctx(Address::repeat_byte(0x22), underpaid),
                "register",
                &[Value::String("hack".into())],
            )
            .unwrap_err();
        assert!(err.reason.contains("registration fee"));

        // the name stays free
        let owner = contract
            .query("getAddress", &[Value::String("hack".into())])
            .unwrap();
        assert_eq!(owner, Value::Address(Address::ZERO));
    }

    #[test]
    fn register_rejects_taken_names() {
        let mut contract = deployed("hack");
        let first = Address::repeat_byte(0x22);
        let second = Address::repeat_byte(0x33);

        contract
            .call(
                &ctx(first, registration_fee()),
                "register",
                &[Value::String("hack".into())],
            )
            .unwrap();
        let err = contract
            .call(
                &ctx(second, registration_fee()),
                "register",
                &[Value::String("hack".into())],
            )
            .unwrap_err();
        assert!(err.reason.contains("already registered"));

        // still owned by the first registrant
        let owner = contract
            .query("getAddress", &[Value::String("hack".into())])
            .unwrap();
        assert_eq!(owner, Value::Address(first));
    }

    #[test]
    fn constructor_rejects_an_empty_tld() {
        let err = DomainsCode
            .constructor(
                &ctx(Address::repeat_byte(0x11), U256::ZERO),
                &[Value::String(String::new())],
            )
            .map(|_| ())
            .unwrap_err();
        assert!(err.reason.contains("tld"));
    }
}
