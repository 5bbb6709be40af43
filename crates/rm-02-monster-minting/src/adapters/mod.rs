//! # Adapters Layer
//!
//! In-memory implementations of every outbound port, used by the runtime's
//! script replay and by tests.

mod environment;
mod ledgers;
mod registries;

pub use environment::{ManualClock, RecordingEventSink, SystemClock};
pub use ledgers::{InMemoryCurrency, InMemoryItems};
pub use registries::{
    InMemoryChipRegistry, InMemoryEntityRegistry, InMemoryExternalRegistry, InMemoryHashRegistry,
    MonsterRecord,
};

use crate::collaborators::{CollaboratorBinding, Collaborators};
use shared_types::{HashKind, Timestamp};
use std::sync::Arc;

/// One in-memory instance of every collaborator.
///
/// Fields stay reachable so callers can seed balances and inspect results
/// while the engine holds the same `Arc`s.
#[derive(Debug, Clone)]
pub struct InMemoryForge {
    /// Currency balances.
    pub currency: Arc<InMemoryCurrency>,
    /// Monster registry.
    pub monsters: Arc<InMemoryEntityRegistry>,
    /// Genesis hash registry.
    pub genesis: Arc<InMemoryHashRegistry>,
    /// General hash registry.
    pub general: Arc<InMemoryHashRegistry>,
    /// External collection.
    pub external: Arc<InMemoryExternalRegistry>,
    /// Chip registry.
    pub chips: Arc<InMemoryChipRegistry>,
    /// Item balances.
    pub items: Arc<InMemoryItems>,
    /// Clock.
    pub clock: Arc<ManualClock>,
    /// Recorded events.
    pub events: Arc<RecordingEventSink>,
}

impl InMemoryForge {
    /// Empty collaborators with the clock at `now`.
    #[must_use]
    pub fn new(now: Timestamp) -> Self {
        Self {
            currency: Arc::new(InMemoryCurrency::new()),
            monsters: Arc::new(InMemoryEntityRegistry::new()),
            genesis: Arc::new(InMemoryHashRegistry::new()),
            general: Arc::new(InMemoryHashRegistry::new()),
            external: Arc::new(InMemoryExternalRegistry::new()),
            chips: Arc::new(InMemoryChipRegistry::new()),
            items: Arc::new(InMemoryItems::new()),
            clock: Arc::new(ManualClock::new(now)),
            events: Arc::new(RecordingEventSink::new()),
        }
    }

    /// The hash registry for `kind`.
    #[must_use]
    pub fn hashes(&self, kind: HashKind) -> &InMemoryHashRegistry {
        match kind {
            HashKind::Genesis => &self.genesis,
            HashKind::General => &self.general,
        }
    }

    /// Every port bound to these instances.
    #[must_use]
    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new()
            .with(CollaboratorBinding::Currency(self.currency.clone()))
            .with(CollaboratorBinding::Monsters(self.monsters.clone()))
            .with(CollaboratorBinding::GenesisHashes(self.genesis.clone()))
            .with(CollaboratorBinding::GeneralHashes(self.general.clone()))
            .with(CollaboratorBinding::External(self.external.clone()))
            .with(CollaboratorBinding::Chips(self.chips.clone()))
            .with(CollaboratorBinding::Items(self.items.clone()))
            .with(CollaboratorBinding::Clock(self.clock.clone()))
            .with(CollaboratorBinding::Events(self.events.clone()))
    }
}
