//! # Domain Entities
//!
//! Quota addressing, entity provenance and the records collaborators hand back.

use rm_01_authorization::AuthorizationProof;
use serde::{Deserialize, Serialize};
use shared_types::{Address, EntityId, Epoch, FusionVariant, ItemId, SourceType, Timestamp, U256};
use std::fmt;

// =============================================================================
// QUOTA KEYS
// =============================================================================

/// Counter family: one per mint source and one per fusion variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaBucket {
    /// A mint source.
    Mint(SourceType),
    /// A fusion variant.
    Fusion(FusionVariant),
}

/// Position within a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaSlot {
    /// A use index (entity id, chip id, item id).
    Index(u64),
    /// An ordered (genesis, general) hash pair.
    Pair(EntityId, EntityId),
    /// A requester identity.
    Owner(Address),
}

/// Address of one epoch-scoped counter.
///
/// Keys embed the epoch, so advancing it makes every counter start at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuotaKey {
    /// Season the counter belongs to.
    pub epoch: Epoch,
    /// Counter family.
    pub bucket: QuotaBucket,
    /// Slot within the family.
    pub slot: QuotaSlot,
}

impl QuotaKey {
    /// Key for a mint source slot: `(epoch, source, use_index)`.
    #[must_use]
    pub const fn mint(epoch: Epoch, source: SourceType, use_index: u64) -> Self {
        Self {
            epoch,
            bucket: QuotaBucket::Mint(source),
            slot: QuotaSlot::Index(use_index),
        }
    }

    /// Key for a fusion variant slot.
    #[must_use]
    pub const fn fusion(epoch: Epoch, variant: FusionVariant, slot: QuotaSlot) -> Self {
        Self {
            epoch,
            bucket: QuotaBucket::Fusion(variant),
            slot,
        }
    }
}

impl fmt::Display for QuotaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch {}/", self.epoch)?;
        match self.bucket {
            QuotaBucket::Mint(source) => write!(f, "{source}/")?,
            QuotaBucket::Fusion(variant) => write!(f, "fusion:{variant}/")?,
        }
        match self.slot {
            QuotaSlot::Index(index) => write!(f, "{index}"),
            QuotaSlot::Pair(a, b) => write!(f, "({a},{b})"),
            QuotaSlot::Owner(owner) => write!(f, "{owner}"),
        }
    }
}

// =============================================================================
// PROVENANCE
// =============================================================================

/// How a monster came to exist. Stored by the entity registry at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityOrigin {
    /// Minted from a source slot.
    Mint {
        /// Source spent.
        source: SourceType,
        /// Slot spent.
        use_index: u64,
    },
    /// Produced by fusing two inputs.
    Fusion {
        /// Variant applied.
        variant: FusionVariant,
        /// First input.
        input_a: EntityId,
        /// Second input.
        input_b: EntityId,
    },
}

// =============================================================================
// COLLABORATOR RECORDS
// =============================================================================

/// A genesis or general hash as its registry reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRecord {
    /// Current holder.
    pub owner: Address,
    /// Limit group.
    pub group: u64,
    /// Detail (specie) within the group.
    pub detail: u64,
    /// Retired hashes can neither mint nor fuse.
    pub retired: bool,
}

/// A chip as its registry reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipRecord {
    /// Current holder.
    pub owner: Address,
    /// Sub-type selecting the chip's slot limit.
    pub sub_type: u64,
}

// =============================================================================
// REQUESTS
// =============================================================================

/// A signed mint or refresh request. The caller is the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    /// Source to mint from.
    pub source: SourceType,
    /// Slot within the source.
    pub use_index: u64,
    /// Currency cost, bound into the proof.
    pub cost: U256,
    /// Proof expiry, Unix seconds.
    pub expiry: Timestamp,
    /// Validator signature over the payload.
    pub proof: AuthorizationProof,
}

/// Two inputs plus optional items to burn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionRequest {
    /// Requester; both inputs must belong to them.
    pub owner: Address,
    /// First input id.
    pub input_a: EntityId,
    /// Second input id.
    pub input_b: EntityId,
    /// Item kinds to burn.
    #[serde(default)]
    pub item_ids: Vec<ItemId>,
    /// Units to burn, positionally matched with `item_ids`.
    #[serde(default)]
    pub item_amounts: Vec<u64>,
}

impl FusionRequest {
    /// A request burning no items.
    #[must_use]
    pub fn new(owner: Address, input_a: EntityId, input_b: EntityId) -> Self {
        Self {
            owner,
            input_a,
            input_b,
            item_ids: Vec::new(),
            item_amounts: Vec::new(),
        }
    }

    /// Adds items to burn.
    #[must_use]
    pub fn with_items(mut self, ids: Vec<ItemId>, amounts: Vec<u64>) -> Self {
        self.item_ids = ids;
        self.item_amounts = amounts;
        self
    }
}
