//! # Source Adapters
//!
//! One adapter per mint source. Each checks its source-specific
//! preconditions and answers with the quota key, the cap and any follow-up
//! effects; it never mutates anything.
//!
//! | Source | Adapter | Slot | Cap |
//! |--------|---------|------|-----|
//! | `EXTERNAL_ENTRY` | `ExternalEntryAdapter` | entry id | external slot limits |
//! | `GENESIS_HASH` | `HashAdapter` | hash id | min(season, group, detail) |
//! | `GENERAL_HASH` | `HashAdapter` | hash id | min(season, group, detail) |
//! | `CHIP_ENTRY` | `ChipAdapter` | chip id | chip slot limits by sub-type |
//! | `REGENERATION_ITEM` | `ItemAdapter` | item id | item slot limits |
//!
//! `FREE` and `FUSION` have no adapter.

mod chip;
mod external;
mod hash;
mod item;

pub use chip::ChipAdapter;
pub use external::ExternalEntryAdapter;
pub use hash::HashAdapter;
pub use item::ItemAdapter;

use crate::collaborators::Collaborators;
use crate::config::EngineConfig;
use crate::domain::entities::QuotaKey;
use crate::errors::MintError;
use shared_types::{Address, Epoch, HashKind, ItemId, SourceType};

/// What an adapter reads while deciding.
#[derive(Debug, Clone, Copy)]
pub struct SourceContext<'a> {
    /// Current season.
    pub epoch: Epoch,
    /// Configuration snapshot for this request.
    pub config: &'a EngineConfig,
    /// Bound ports.
    pub collaborators: &'a Collaborators,
}

/// Side effects the orchestrator performs once the quota is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Burn `amount` of `item` from the requester.
    BurnItem {
        /// Item kind.
        item: ItemId,
        /// Units.
        amount: u64,
    },
    /// Retire the hash if this mint exhausts its counter.
    RetireHashWhenExhausted {
        /// Registry.
        kind: HashKind,
        /// Hash id.
        id: u64,
    },
}

/// A positive eligibility answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    /// Counter to charge.
    pub key: QuotaKey,
    /// Cap for that counter.
    pub cap: u64,
    /// Effects to apply after the counter moves.
    pub follow_ups: Vec<FollowUp>,
}

impl Eligibility {
    /// Eligibility without follow-ups.
    #[must_use]
    pub fn new(key: QuotaKey, cap: u64) -> Self {
        Self {
            key,
            cap,
            follow_ups: Vec::new(),
        }
    }
}

/// Source-specific eligibility check.
pub trait SourceAdapter: Send + Sync {
    /// The source this adapter serves.
    fn source(&self) -> SourceType;

    /// Decides whether `owner` may spend slot `use_index`.
    ///
    /// # Errors
    /// `Ineligible` naming the unmet condition, or `ConfigurationMissing`.
    fn eligible(
        &self,
        owner: Address,
        use_index: u64,
        ctx: &SourceContext<'_>,
    ) -> Result<Eligibility, MintError>;
}

static EXTERNAL: ExternalEntryAdapter = ExternalEntryAdapter;
static GENESIS: HashAdapter = HashAdapter::new(HashKind::Genesis);
static GENERAL: HashAdapter = HashAdapter::new(HashKind::General);
static CHIP: ChipAdapter = ChipAdapter;
static ITEM: ItemAdapter = ItemAdapter;

/// Adapter for `source`, `None` for `FREE` and `FUSION`.
#[must_use]
pub fn adapter_for(source: SourceType) -> Option<&'static dyn SourceAdapter> {
    match source {
        SourceType::ExternalEntry => Some(&EXTERNAL),
        SourceType::GenesisHash => Some(&GENESIS),
        SourceType::GeneralHash => Some(&GENERAL),
        SourceType::ChipEntry => Some(&CHIP),
        SourceType::RegenerationItem => Some(&ITEM),
        SourceType::Free | SourceType::Fusion => None,
    }
}
