//! # Ledger Adapters
//!
//! In-memory currency and item balances.

use crate::errors::LedgerError;
use crate::ports::outbound::{CurrencyLedger, ItemLedger};
use parking_lot::RwLock;
use shared_types::{Address, ItemId, U256};
use std::collections::HashMap;

/// In-memory currency balances.
#[derive(Debug, Default)]
pub struct InMemoryCurrency {
    balances: RwLock<HashMap<Address, U256>>,
}

impl InMemoryCurrency {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to `owner`.
    pub fn credit(&self, owner: Address, amount: U256) {
        let mut balances = self.balances.write();
        let balance = balances.entry(owner).or_insert_with(U256::zero);
        *balance = balance.saturating_add(amount);
    }
}

impl CurrencyLedger for InMemoryCurrency {
    fn balance_of(&self, owner: Address) -> U256 {
        self.balances
            .read()
            .get(&owner)
            .copied()
            .unwrap_or_default()
    }

    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        let mut balances = self.balances.write();
        let available = balances.get(&from).copied().unwrap_or_default();
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available,
            });
        }
        balances.insert(from, available - amount);
        let credited = balances.entry(to).or_insert_with(U256::zero);
        *credited = credited.saturating_add(amount);
        Ok(())
    }
}

/// In-memory item balances keyed by (holder, item).
#[derive(Debug, Default)]
pub struct InMemoryItems {
    balances: RwLock<HashMap<(Address, ItemId), u64>>,
}

impl InMemoryItems {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemLedger for InMemoryItems {
    fn balance_of(&self, owner: Address, item: ItemId) -> u64 {
        self.balances
            .read()
            .get(&(owner, item))
            .copied()
            .unwrap_or(0)
    }

    fn burn(&self, owner: Address, item: ItemId, amount: u64) -> Result<(), LedgerError> {
        let mut balances = self.balances.write();
        let available = balances.get(&(owner, item)).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                item,
                required: amount,
                available,
            });
        }
        balances.insert((owner, item), available - amount);
        Ok(())
    }

    fn mint(&self, owner: Address, item: ItemId, amount: u64) -> Result<(), LedgerError> {
        let mut balances = self.balances.write();
        let balance = balances.entry((owner, item)).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Unavailable(format!("item {item} balance overflow")))?;
        Ok(())
    }
}
