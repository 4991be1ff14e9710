use alloy_primitives::Address;

/// Handle to a signing identity able to authorize transactions.
///
/// On the development ledger every account is pre-funded and unlocked, so the
/// handle carries only the address; submission through a handle is what
/// attributes a transaction to its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    address: Address,
}

impl Account {
    pub(crate) fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.address.fmt(f)
    }
}
