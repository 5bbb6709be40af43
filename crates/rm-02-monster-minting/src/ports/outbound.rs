//! # Driven Ports (SPI - Outbound)
//!
//! Collaborators the engine depends on. Adapters implement these traits.
//!
//! The ports are synchronous: the engine runs each request to completion
//! under `&mut self`, so no collaborator call can re-enter it mid-request.
//!
//! ## Compensation
//!
//! Some operations exist only so the engine can compensate a completed effect
//! when a later step of the same request fails:
//!
//! | Forward | Inverse |
//! |---------|---------|
//! | `CurrencyLedger::transfer(a, b, x)` | `transfer(b, a, x)` |
//! | `ItemLedger::burn` | `ItemLedger::mint` |
//! | `EntityRegistry::retire` | `EntityRegistry::restore` |
//! | `EntityRegistry::create` | `EntityRegistry::retire` |
//! | `HashRegistry::retire` | `HashRegistry::restore` |

use crate::domain::entities::{ChipRecord, EntityOrigin, HashRecord};
use crate::errors::LedgerError;
use crate::events::ForgeEvent;
use shared_types::{Address, EntityId, ItemId, Timestamp, U256};

// =============================================================================
// REGISTRIES
// =============================================================================

/// Registry of monsters: identity, ownership and per-owner enumeration.
pub trait EntityRegistry: Send + Sync {
    /// Holder of a live monster, `None` if unknown or retired.
    fn owner_of(&self, id: EntityId) -> Option<Address>;

    /// Creates a monster for `owner`, returning its id.
    fn create(&self, owner: Address, origin: EntityOrigin) -> Result<EntityId, LedgerError>;

    /// Retires a live monster.
    fn retire(&self, id: EntityId) -> Result<(), LedgerError>;

    /// Brings a retired monster back.
    fn restore(&self, id: EntityId) -> Result<(), LedgerError>;

    /// Live monsters held by `owner`, ascending by id.
    fn tokens_of(&self, owner: Address) -> Vec<EntityId>;
}

/// Registry of genesis or general hashes.
pub trait HashRegistry: Send + Sync {
    /// Looks up a hash, retired or not.
    fn hash_of(&self, id: EntityId) -> Option<HashRecord>;

    /// Marks a hash retired.
    fn retire(&self, id: EntityId) -> Result<(), LedgerError>;

    /// Clears a hash's retired mark.
    fn restore(&self, id: EntityId) -> Result<(), LedgerError>;
}

/// External collection whose entries authorize mints.
pub trait ExternalRegistry: Send + Sync {
    /// Holder of an entry.
    fn owner_of(&self, id: EntityId) -> Option<Address>;
}

/// Registry of chips.
pub trait ChipRegistry: Send + Sync {
    /// Looks up a chip.
    fn chip_of(&self, id: EntityId) -> Option<ChipRecord>;
}

// =============================================================================
// LEDGERS
// =============================================================================

/// Fungible currency used to pay mint costs.
pub trait CurrencyLedger: Send + Sync {
    /// Balance of `owner`.
    fn balance_of(&self, owner: Address) -> U256;

    /// Moves `amount` from `from` to `to`.
    ///
    /// # Errors
    /// `InsufficientFunds` if `from` holds less than `amount`.
    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError>;
}

/// Fungible auxiliary items.
pub trait ItemLedger: Send + Sync {
    /// Units of `item` held by `owner`.
    fn balance_of(&self, owner: Address, item: ItemId) -> u64;

    /// Destroys `amount` units.
    ///
    /// # Errors
    /// `InsufficientBalance` if `owner` holds fewer than `amount`.
    fn burn(&self, owner: Address, item: ItemId, amount: u64) -> Result<(), LedgerError>;

    /// Creates `amount` units. Used to compensate a burn.
    fn mint(&self, owner: Address, item: ItemId, amount: u64) -> Result<(), LedgerError>;
}

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Source of the current time for expiry checks.
pub trait Clock: Send + Sync {
    /// Unix seconds.
    fn now(&self) -> Timestamp;
}

/// Receives events after a request commits.
pub trait EventSink: Send + Sync {
    /// Delivers one event. Must not fail.
    fn emit(&self, event: ForgeEvent);
}
