//! # Monster Forge Minting Engine (RM-02)
//!
//! Mints monsters from signed, priced requests, refreshes exhausted
//! regeneration slots and fuses owned inputs into new monsters, all under
//! per-epoch quotas.
//!
//! ## Architecture
//!
//! | Layer | Module | Contents |
//! |-------|--------|----------|
//! | Domain | `domain/` | quota ledger, regeneration book, journal, invariants |
//! | Sources | `sources/` | one eligibility adapter per mint source |
//! | Engine | `engine.rs`, `orchestrator.rs`, `fusion.rs` | the synchronous state machine |
//! | Ports | `ports/` | `MintingApi` inbound, registries and ledgers outbound |
//! | Adapters | `adapters/` | in-memory collaborators |
//! | Service | `service.rs` | async `MintingService` with statistics |
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Counter never exceeds its cap | `domain/quota.rs` - `check_and_increment()` |
//! | INVARIANT-2 | Rejected request leaves no trace | `engine.rs` - `settle()` |
//! | INVARIANT-3 | Fusion inputs are distinct | `fusion.rs` - `try_fuse()` |
//! | INVARIANT-4 | Epoch never decreases | `engine.rs` - `apply()` |
//!
//! ## Security
//!
//! - **Checks before effects**: every eligibility and quota check completes
//!   before the first collaborator call that moves value.
//! - **No reentrancy**: collaborator ports are synchronous and the engine holds
//!   `&mut self` for the whole request.
//! - **Replay**: a proof carries no nonce and may be presented repeatedly
//!   until it expires; the per-slot quota is the only bound.
//! - **Fusion on behalf of others**: only the owner named in a fusion request
//!   may submit it, since fusion retires inputs and burns items.
//! - **Administration**: privileged commands require the `AdminCapability`
//!   issued when the engine is built.
//!
//! ## Usage Example
//!
//! ```ignore
//! use rm_02_monster_minting::prelude::*;
//!
//! let forge = InMemoryForge::new(now);
//! let (engine, admin) = MintingEngine::new(config, forge.collaborators())?;
//! let service = MintingService::new(engine);
//!
//! let id = service.mint(caller, request).await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod collaborators;
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod events;
pub mod fusion;
pub mod orchestrator;
pub mod ports;
pub mod service;
pub mod sources;

#[cfg(test)]
mod testkit;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::entities::{
        ChipRecord, EntityOrigin, FusionRequest, HashRecord, MintRequest, QuotaBucket, QuotaKey,
        QuotaSlot,
    };
    pub use crate::domain::regeneration::RegenerationKey;

    // Configuration
    pub use crate::config::{
        AdminCommand, EngineConfig, FusionLimits, HashSourcePolicy, LimitGroupTable,
        RefreshPolicy, SlotLimits, DEFAULT_CHAIN_ID,
    };

    // Engine
    pub use crate::collaborators::{CollaboratorBinding, Collaborators};
    pub use crate::engine::{AdminCapability, MintingEngine};

    // Ports
    pub use crate::ports::inbound::MintingApi;
    pub use crate::ports::outbound::{
        ChipRegistry, Clock, CurrencyLedger, EntityRegistry, EventSink, ExternalRegistry,
        HashRegistry, ItemLedger,
    };

    // Events
    pub use crate::events::{topics, ForgeEvent};

    // Errors
    pub use crate::errors::{
        ConfigError, FusionInput, IneligibleReason, LedgerError, MintError, MissingConfig,
    };

    // Adapters
    pub use crate::adapters::{
        InMemoryChipRegistry, InMemoryCurrency, InMemoryEntityRegistry, InMemoryExternalRegistry,
        InMemoryForge, InMemoryHashRegistry, InMemoryItems, ManualClock, RecordingEventSink,
        SystemClock,
    };

    // Service
    pub use crate::service::{MintingService, ServiceStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
