//! # Forge Events
//!
//! Records emitted to the `EventSink` after a request commits. A rejected
//! request emits nothing.

use serde::{Deserialize, Serialize};
use shared_types::{Address, EntityId, Epoch, FusionVariant, SourceType};

/// Event topics, one per variant.
pub mod topics {
    /// `ForgeEvent::MonsterCreated`.
    pub const MONSTER_CREATED: &str = "forge.monster_created";
    /// `ForgeEvent::FusionCompleted`.
    pub const FUSION_COMPLETED: &str = "forge.fusion_completed";
    /// `ForgeEvent::RegenerationRefreshed`.
    pub const REGENERATION_REFRESHED: &str = "forge.regeneration_refreshed";
    /// `ForgeEvent::EpochAdvanced`.
    pub const EPOCH_ADVANCED: &str = "forge.epoch_advanced";
}

/// Something the engine committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ForgeEvent {
    /// A mint created a monster.
    MonsterCreated {
        /// New monster.
        entity_id: EntityId,
        /// Source spent.
        source: SourceType,
        /// New holder.
        owner: Address,
    },
    /// A fusion consumed two inputs and created a monster.
    FusionCompleted {
        /// Variant applied.
        variant: FusionVariant,
        /// New monster.
        entity_id: EntityId,
        /// First input.
        input_a: EntityId,
        /// Second input.
        input_b: EntityId,
        /// Holder.
        owner: Address,
    },
    /// An exhausted slot was refreshed.
    RegenerationRefreshed {
        /// Source of the slot.
        source: SourceType,
        /// Slot index.
        use_index: u64,
        /// Holder.
        owner: Address,
        /// Counter after the refresh.
        counter: u64,
    },
    /// A new season started.
    EpochAdvanced {
        /// The new epoch.
        epoch: Epoch,
    },
}

impl ForgeEvent {
    /// Topic string for routing.
    #[must_use]
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::MonsterCreated { .. } => topics::MONSTER_CREATED,
            Self::FusionCompleted { .. } => topics::FUSION_COMPLETED,
            Self::RegenerationRefreshed { .. } => topics::REGENERATION_REFRESHED,
            Self::EpochAdvanced { .. } => topics::EPOCH_ADVANCED,
        }
    }
}
