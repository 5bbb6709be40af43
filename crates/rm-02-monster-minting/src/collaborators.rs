//! # Collaborator Bindings
//!
//! The set of ports the engine calls, each optional until bound. Using an
//! unbound port fails the request with `ConfigurationMissing`.

use crate::errors::{MintError, MissingConfig};
use crate::events::ForgeEvent;
use crate::ports::outbound::{
    ChipRegistry, Clock, CurrencyLedger, EntityRegistry, EventSink, ExternalRegistry,
    HashRegistry, ItemLedger,
};
use shared_types::HashKind;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One port to (re)bind.
#[derive(Clone)]
pub enum CollaboratorBinding {
    /// Currency ledger.
    Currency(Arc<dyn CurrencyLedger>),
    /// Monster registry.
    Monsters(Arc<dyn EntityRegistry>),
    /// Genesis hash registry.
    GenesisHashes(Arc<dyn HashRegistry>),
    /// General hash registry.
    GeneralHashes(Arc<dyn HashRegistry>),
    /// External entry registry.
    External(Arc<dyn ExternalRegistry>),
    /// Chip registry.
    Chips(Arc<dyn ChipRegistry>),
    /// Item ledger.
    Items(Arc<dyn ItemLedger>),
    /// Clock.
    Clock(Arc<dyn Clock>),
    /// Event sink.
    Events(Arc<dyn EventSink>),
}

impl CollaboratorBinding {
    /// Port name for logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Currency(_) => "currency",
            Self::Monsters(_) => "monster registry",
            Self::GenesisHashes(_) => "genesis hash registry",
            Self::GeneralHashes(_) => "general hash registry",
            Self::External(_) => "external registry",
            Self::Chips(_) => "chip registry",
            Self::Items(_) => "item ledger",
            Self::Clock(_) => "clock",
            Self::Events(_) => "event sink",
        }
    }
}

impl fmt::Debug for CollaboratorBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CollaboratorBinding").field(&self.name()).finish()
    }
}

/// Bound ports.
#[derive(Clone, Default)]
pub struct Collaborators {
    currency: Option<Arc<dyn CurrencyLedger>>,
    monsters: Option<Arc<dyn EntityRegistry>>,
    genesis: Option<Arc<dyn HashRegistry>>,
    general: Option<Arc<dyn HashRegistry>>,
    external: Option<Arc<dyn ExternalRegistry>>,
    chips: Option<Arc<dyn ChipRegistry>>,
    items: Option<Arc<dyn ItemLedger>>,
    clock: Option<Arc<dyn Clock>>,
    events: Option<Arc<dyn EventSink>>,
}

fn required<'a, T: ?Sized>(
    port: &'a Option<Arc<T>>,
    name: &'static str,
) -> Result<&'a Arc<T>, MintError> {
    port.as_ref()
        .ok_or(MintError::ConfigurationMissing(MissingConfig::Collaborator(name)))
}

impl Collaborators {
    /// No ports bound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds one port, builder style.
    #[must_use]
    pub fn with(mut self, binding: CollaboratorBinding) -> Self {
        self.bind(binding);
        self
    }

    /// Binds or replaces one port.
    pub fn bind(&mut self, binding: CollaboratorBinding) {
        debug!(port = binding.name(), "Binding collaborator");
        match binding {
            CollaboratorBinding::Currency(p) => self.currency = Some(p),
            CollaboratorBinding::Monsters(p) => self.monsters = Some(p),
            CollaboratorBinding::GenesisHashes(p) => self.genesis = Some(p),
            CollaboratorBinding::GeneralHashes(p) => self.general = Some(p),
            CollaboratorBinding::External(p) => self.external = Some(p),
            CollaboratorBinding::Chips(p) => self.chips = Some(p),
            CollaboratorBinding::Items(p) => self.items = Some(p),
            CollaboratorBinding::Clock(p) => self.clock = Some(p),
            CollaboratorBinding::Events(p) => self.events = Some(p),
        }
    }

    /// Currency ledger.
    pub fn currency(&self) -> Result<&Arc<dyn CurrencyLedger>, MintError> {
        required(&self.currency, "currency")
    }

    /// Monster registry.
    pub fn monsters(&self) -> Result<&Arc<dyn EntityRegistry>, MintError> {
        required(&self.monsters, "monster registry")
    }

    /// Hash registry for `kind`.
    pub fn hashes(&self, kind: HashKind) -> Result<&Arc<dyn HashRegistry>, MintError> {
        match kind {
            HashKind::Genesis => required(&self.genesis, "genesis hash registry"),
            HashKind::General => required(&self.general, "general hash registry"),
        }
    }

    /// External entry registry.
    pub fn external(&self) -> Result<&Arc<dyn ExternalRegistry>, MintError> {
        required(&self.external, "external registry")
    }

    /// Chip registry.
    pub fn chips(&self) -> Result<&Arc<dyn ChipRegistry>, MintError> {
        required(&self.chips, "chip registry")
    }

    /// Item ledger.
    pub fn items(&self) -> Result<&Arc<dyn ItemLedger>, MintError> {
        required(&self.items, "item ledger")
    }

    /// Clock.
    pub fn clock(&self) -> Result<&Arc<dyn Clock>, MintError> {
        required(&self.clock, "clock")
    }

    /// Delivers an event if a sink is bound.
    pub fn emit(&self, event: ForgeEvent) {
        if let Some(sink) = &self.events {
            sink.emit(event);
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("currency", &self.currency.is_some())
            .field("monsters", &self.monsters.is_some())
            .field("genesis", &self.genesis.is_some())
            .field("general", &self.general.is_some())
            .field("external", &self.external.is_some())
            .field("chips", &self.chips.is_some())
            .field("items", &self.items.is_some())
            .field("clock", &self.clock.is_some())
            .field("events", &self.events.is_some())
            .finish()
    }
}
