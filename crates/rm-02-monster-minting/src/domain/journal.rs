//! # Request Journal
//!
//! Records what one request changed so that a failure at any step leaves no
//! trace.
//!
//! Two kinds of entries are kept:
//!
//! - **Undo entries** for the engine's own state (counters, free claims,
//!   regeneration flags), restored by assignment.
//! - **Completed effects** on collaborators (payments, burns, retirements,
//!   creations), recorded only once the port call returned and compensated
//!   by the engine with the inverse port operation.
//!
//! Both are replayed newest-first. Everything lives in memory for the length
//! of one request, so an effect is either completed or was never applied.

use super::quota::QuotaLedger;
use super::regeneration::{RegenerationBook, RegenerationKey};
use super::entities::QuotaKey;
use shared_types::{Address, EntityId, HashKind, ItemId, U256};

/// Restores one piece of engine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoEntry {
    /// Counter value before the write.
    Counter {
        /// Counter written.
        key: QuotaKey,
        /// Value before the write.
        previous: u64,
    },
    /// A free claim to release.
    FreeClaim(Address),
    /// Regeneration flag before the write.
    Regeneration {
        /// Slot written.
        key: RegenerationKey,
        /// Flag before the write.
        previous: Option<bool>,
    },
}

/// A collaborator call that completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Currency moved from payer to treasury.
    Payment {
        /// Payer.
        from: Address,
        /// Treasury.
        to: Address,
        /// Amount moved.
        amount: U256,
    },
    /// Items burned from a holder.
    ItemBurn {
        /// Holder.
        owner: Address,
        /// Item kind.
        item: ItemId,
        /// Units burned.
        amount: u64,
    },
    /// A hash retired in its registry.
    HashRetired {
        /// Registry.
        kind: HashKind,
        /// Hash id.
        id: EntityId,
    },
    /// A monster retired in the entity registry.
    EntityRetired(EntityId),
    /// A monster created in the entity registry.
    EntityCreated(EntityId),
}

/// Engine-owned mutable state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgeState {
    /// Counters and free claims.
    pub quotas: QuotaLedger,
    /// In-use flags.
    pub regeneration: RegenerationBook,
}

/// Per-request change log.
#[derive(Debug, Default)]
pub struct Journal {
    undo: Vec<UndoEntry>,
    completed: Vec<Effect>,
}

impl Journal {
    /// Create an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an own-state change.
    pub fn record(&mut self, entry: UndoEntry) {
        self.undo.push(entry);
    }

    /// Records a completed collaborator call.
    pub fn record_completed(&mut self, effect: Effect) {
        self.completed.push(effect);
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.undo.is_empty() && self.completed.is_empty()
    }

    /// Completed effects, oldest first.
    #[must_use]
    pub fn completed(&self) -> &[Effect] {
        &self.completed
    }

    /// Removes the completed effects, newest first, for compensation.
    pub fn take_completed(&mut self) -> Vec<Effect> {
        let mut taken = std::mem::take(&mut self.completed);
        taken.reverse();
        taken
    }

    /// Restores every own-state change, newest first.
    pub fn undo(&mut self, state: &mut ForgeState) {
        while let Some(entry) = self.undo.pop() {
            match entry {
                UndoEntry::Counter { key, previous } => state.quotas.restore_counter(key, previous),
                UndoEntry::FreeClaim(owner) => state.quotas.release_free_claim(&owner),
                UndoEntry::Regeneration { key, previous } => {
                    state.regeneration.restore(key, previous);
                }
            }
        }
    }
}
