//! # Regeneration State
//!
//! Per-(owner, source, useIndex) record of whether an item-bound slot is in
//! use. A slot is in use from its first mint until its counter reaches the
//! cap; only a slot that is no longer in use can be refreshed.

use super::journal::{Journal, UndoEntry};
use serde::{Deserialize, Serialize};
use shared_types::{Address, SourceType};
use std::collections::HashMap;

/// Identifies one owner's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegenerationKey {
    /// Slot holder.
    pub owner: Address,
    /// Item-bound source.
    pub source: SourceType,
    /// Slot index.
    pub use_index: u64,
}

/// In-use flags for every slot that has been minted from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegenerationBook {
    in_use: HashMap<RegenerationKey, bool>,
}

impl RegenerationBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded flag, `None` if the slot was never minted from by this owner.
    #[must_use]
    pub fn state(&self, key: &RegenerationKey) -> Option<bool> {
        self.in_use.get(key).copied()
    }

    /// Whether the slot is currently marked in use.
    #[must_use]
    pub fn in_use(&self, key: &RegenerationKey) -> bool {
        self.state(key).unwrap_or(false)
    }

    /// Sets the flag, journaling the previous one.
    pub fn mark(&mut self, key: RegenerationKey, in_use: bool, journal: &mut Journal) {
        let previous = self.in_use.insert(key, in_use);
        journal.record(UndoEntry::Regeneration { key, previous });
    }

    pub(crate) fn restore(&mut self, key: RegenerationKey, previous: Option<bool>) {
        match previous {
            Some(flag) => {
                self.in_use.insert(key, flag);
            }
            None => {
                self.in_use.remove(&key);
            }
        }
    }
}
