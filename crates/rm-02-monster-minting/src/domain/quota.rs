//! # Quota Ledger
//!
//! Epoch-scoped counters and the one-shot free-mint flags. This is the single
//! source of truth for whether an allowance is exhausted.
//!
//! Every write takes the request's `Journal` so a later failure can restore
//! the exact previous value.

use super::entities::QuotaKey;
use super::journal::{Journal, UndoEntry};
use crate::errors::MintError;
use shared_types::Address;
use std::collections::{HashMap, HashSet};

/// Counter store. Absent keys read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotaLedger {
    counters: HashMap<QuotaKey, u64>,
    free_claims: HashSet<Address>,
}

impl QuotaLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count for `key`.
    #[must_use]
    pub fn count(&self, key: &QuotaKey) -> u64 {
        self.counters.get(key).copied().unwrap_or(0)
    }

    /// Read-only check that `key` has room under `limit`.
    pub fn check(&self, key: &QuotaKey, limit: u64) -> Result<u64, MintError> {
        let count = self.count(key);
        if count >= limit {
            return Err(MintError::QuotaExceeded { key: *key, limit });
        }
        Ok(count)
    }

    /// Fails without mutation if `key` is at `limit`, else increments.
    ///
    /// Returns the new count.
    pub fn check_and_increment(
        &mut self,
        key: QuotaKey,
        limit: u64,
        journal: &mut Journal,
    ) -> Result<u64, MintError> {
        let count = self.check(&key, limit)?;
        self.write(key, count + 1, journal);
        Ok(count + 1)
    }

    /// Checks every key first, then increments all of them.
    ///
    /// Either all counters move or none do.
    pub fn check_all_and_increment(
        &mut self,
        keys: &[QuotaKey],
        limit: u64,
        journal: &mut Journal,
    ) -> Result<(), MintError> {
        for key in keys {
            self.check(key, limit)?;
        }
        for key in keys {
            let count = self.count(key);
            self.write(*key, count + 1, journal);
        }
        Ok(())
    }

    /// Overwrites the counter for `key`.
    pub fn set(&mut self, key: QuotaKey, value: u64, journal: &mut Journal) {
        self.write(key, value, journal);
    }

    fn write(&mut self, key: QuotaKey, value: u64, journal: &mut Journal) {
        let previous = self.count(&key);
        journal.record(UndoEntry::Counter { key, previous });
        self.restore_counter(key, value);
    }

    /// Whether `owner` took the free mint.
    #[must_use]
    pub fn has_claimed_free(&self, owner: &Address) -> bool {
        self.free_claims.contains(owner)
    }

    /// Claims the free mint for `owner`; fails with `AlreadyClaimed` afterwards.
    pub fn claim_free(&mut self, owner: Address, journal: &mut Journal) -> Result<(), MintError> {
        if !self.free_claims.insert(owner) {
            return Err(MintError::AlreadyClaimed(owner));
        }
        journal.record(UndoEntry::FreeClaim(owner));
        Ok(())
    }

    // Zero is stored as absence so equal ledgers compare equal
    pub(crate) fn restore_counter(&mut self, key: QuotaKey, value: u64) {
        if value == 0 {
            self.counters.remove(&key);
        } else {
            self.counters.insert(key, value);
        }
    }

    pub(crate) fn release_free_claim(&mut self, owner: &Address) {
        self.free_claims.remove(owner);
    }

    /// Iterates over non-zero counters.
    pub fn iter(&self) -> impl Iterator<Item = (&QuotaKey, &u64)> {
        self.counters.iter()
    }
}
