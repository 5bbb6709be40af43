//! # Error Types
//!
//! Rejections produced by the minting engine and its collaborators.
//!
//! Every `MintError` is terminal for the request that raised it: the engine
//! rolls back all of the request's effects before returning it.

use crate::domain::entities::QuotaKey;
use rm_01_authorization::{AuthError, SignatureError};
use shared_types::{Address, EntityId, HashKind, ItemId, SourceType, Timestamp, U256};
use std::fmt;
use thiserror::Error;

// =============================================================================
// MINT ERRORS
// =============================================================================

/// Why a minting, refresh or fusion request was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MintError {
    /// The authorization's expiry is not after the current time.
    #[error("authorization expired at {expiry} (now {now})")]
    ExpiredAuthorization {
        /// Expiry carried in the payload.
        expiry: Timestamp,
        /// Engine clock at verification.
        now: Timestamp,
    },

    /// The proof does not come from the configured validator.
    #[error("untrusted signer: expected {expected}, recovered {recovered:?}")]
    UntrustedSigner {
        /// Configured validator identity.
        expected: Address,
        /// Recovered identity, if any.
        recovered: Option<Address>,
        /// Structural proof failure, if any.
        cause: Option<SignatureError>,
    },

    /// A source-specific precondition does not hold.
    #[error("ineligible: {0}")]
    Ineligible(IneligibleReason),

    /// The slot's counter already reached its cap this epoch.
    #[error("quota exceeded for {key} (limit {limit})")]
    QuotaExceeded {
        /// Exhausted counter.
        key: QuotaKey,
        /// Cap in force.
        limit: u64,
    },

    /// The owner already took the one-shot free mint.
    #[error("free mint already claimed by {0}")]
    AlreadyClaimed(Address),

    /// Refresh attempted on a slot that still has uses left.
    #[error("{source_type} slot {use_index} is still in use")]
    ItemInUse {
        /// Source of the slot.
        source_type: SourceType,
        /// Slot index.
        use_index: u64,
    },

    /// A fusion input does not belong to the requester.
    #[error("fusion input {input} ({id}) is not owned by {expected}")]
    OwnerMismatch {
        /// Which input failed.
        input: FusionInput,
        /// The offending id.
        id: EntityId,
        /// The requester.
        expected: Address,
    },

    /// A fusion was requested on behalf of another owner.
    #[error("{caller} cannot fuse for {owner}")]
    NotRequestOwner {
        /// The requester.
        caller: Address,
        /// Owner named in the request.
        owner: Address,
    },

    /// The payer cannot cover the cost.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Cost charged.
        required: U256,
        /// Payer balance.
        available: U256,
    },

    /// The owner holds fewer items than the request burns.
    #[error("insufficient balance of item {item}: required {required}, available {available}")]
    InsufficientItemBalance {
        /// Item kind.
        item: ItemId,
        /// Units requested.
        required: u64,
        /// Units held.
        available: u64,
    },

    /// A group limit, identity or collaborator has not been configured.
    #[error("configuration missing: {0}")]
    ConfigurationMissing(MissingConfig),

    /// An administrative command was presented without the engine's capability.
    #[error("unauthorized administrative command")]
    Unauthorized,

    /// An administrative command would leave the configuration invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// A collaborator failed in a way that has no dedicated variant.
    #[error("collaborator failure: {0}")]
    Collaborator(String),
}

impl MintError {
    /// Stable short name, used for statistics and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ExpiredAuthorization { .. } => "expired_authorization",
            Self::UntrustedSigner { .. } => "untrusted_signer",
            Self::Ineligible(_) => "ineligible",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::AlreadyClaimed(_) => "already_claimed",
            Self::ItemInUse { .. } => "item_in_use",
            Self::OwnerMismatch { .. } => "owner_mismatch",
            Self::NotRequestOwner { .. } => "not_request_owner",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::InsufficientItemBalance { .. } => "insufficient_item_balance",
            Self::ConfigurationMissing(_) => "configuration_missing",
            Self::Unauthorized => "unauthorized",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Collaborator(_) => "collaborator",
        }
    }
}

impl From<AuthError> for MintError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ExpiredAuthorization { expiry, now } => {
                Self::ExpiredAuthorization { expiry, now }
            }
            AuthError::UntrustedSigner {
                expected,
                recovered,
                cause,
            } => Self::UntrustedSigner {
                expected,
                recovered,
                cause,
            },
        }
    }
}

impl From<IneligibleReason> for MintError {
    fn from(reason: IneligibleReason) -> Self {
        Self::Ineligible(reason)
    }
}

impl From<LedgerError> for MintError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds {
                required,
                available,
            } => Self::InsufficientFunds {
                required,
                available,
            },
            LedgerError::InsufficientBalance {
                item,
                required,
                available,
            } => Self::InsufficientItemBalance {
                item,
                required,
                available,
            },
            other => Self::Collaborator(other.to_string()),
        }
    }
}

/// The unmet source-specific condition behind `MintError::Ineligible`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IneligibleReason {
    /// The external entry is not held by the caller.
    #[error("external entry {0} not owned by caller")]
    NotEntryOwner(EntityId),
    /// The hash does not exist in its registry.
    #[error("{kind:?} hash {id} does not exist")]
    UnknownHash {
        /// Registry searched.
        kind: HashKind,
        /// Hash id.
        id: EntityId,
    },
    /// The hash is held by someone else.
    #[error("{kind:?} hash {id} not owned by caller")]
    NotHashOwner {
        /// Registry searched.
        kind: HashKind,
        /// Hash id.
        id: EntityId,
    },
    /// The hash has been retired and can no longer mint or fuse.
    #[error("{kind:?} hash {id} is retired")]
    HashRetired {
        /// Registry searched.
        kind: HashKind,
        /// Hash id.
        id: EntityId,
    },
    /// The chip does not exist.
    #[error("chip {0} does not exist")]
    UnknownChip(EntityId),
    /// The chip is held by someone else.
    #[error("chip {0} not owned by caller")]
    NotChipOwner(EntityId),
    /// The caller holds none of the item.
    #[error("no balance of item {0}")]
    NoItemBalance(ItemId),
    /// The source has no regeneration slot.
    #[error("{0} slots cannot be refreshed")]
    NotRefreshable(SourceType),
    /// The source cannot be minted through this entry point.
    #[error("{0} cannot be minted directly")]
    NotMintable(SourceType),
    /// Both fusion inputs name the same entity.
    #[error("fusion inputs are both {0}")]
    DuplicateInput(EntityId),
    /// Item id and amount lists differ in length.
    #[error("{ids} item ids but {amounts} amounts")]
    ItemListMismatch {
        /// Number of ids.
        ids: usize,
        /// Number of amounts.
        amounts: usize,
    },
}

/// Which side of a fusion request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FusionInput {
    /// First input.
    A,
    /// Second input.
    B,
}

impl fmt::Display for FusionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// The configuration item that was absent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MissingConfig {
    /// No validator identity set.
    #[error("validator identity")]
    Validator,
    /// No treasury set.
    #[error("treasury")]
    Treasury,
    /// The hash's group has no cap.
    #[error("{kind:?} limit group {group}")]
    LimitGroup {
        /// Registry the group belongs to.
        kind: HashKind,
        /// Group id.
        group: u64,
    },
    /// A collaborator port is unbound.
    #[error("{0} collaborator")]
    Collaborator(&'static str),
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Structural problems in an `EngineConfig`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Chain id 0 is reserved.
    #[error("chain id must be non-zero")]
    ZeroChainId,
    /// The item source must burn at least one unit.
    #[error("item burn quantity must be at least 1")]
    ZeroBurnQuantity,
    /// An identity was set to the zero address.
    #[error("{0} must not be the zero address")]
    ZeroAddress(&'static str),
    /// A detail cap references a group with no cap.
    #[error("{kind:?} detail ({group}, {detail}) has no group cap")]
    OrphanDetail {
        /// Registry.
        kind: HashKind,
        /// Group id.
        group: u64,
        /// Detail id.
        detail: u64,
    },
    /// The source has no slot-limit table.
    #[error("{0} has no slot limits")]
    NoSlotTable(SourceType),
    /// Production deployments require this value.
    #[error("{0} is required")]
    Required(&'static str),
}

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Failures reported by collaborator ports.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Currency transfer exceeds the payer's balance.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Requested amount.
        required: U256,
        /// Payer balance.
        available: U256,
    },
    /// Item burn exceeds the holder's balance.
    #[error("insufficient item {item}: required {required}, available {available}")]
    InsufficientBalance {
        /// Item kind.
        item: ItemId,
        /// Requested units.
        required: u64,
        /// Held units.
        available: u64,
    },
    /// No such entity.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
    /// Entity was already retired.
    #[error("entity {0} already retired")]
    AlreadyRetired(EntityId),
    /// Restore requested for a live entity.
    #[error("entity {0} is not retired")]
    NotRetired(EntityId),
    /// The collaborator refused or could not be reached.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// TESTS
// =============================================================================
