//! # Minting Engine
//!
//! The synchronous state machine behind the service. It owns the quota
//! ledger, the regeneration book, the epoch and the configuration snapshot,
//! and runs every request to completion under `&mut self`.
//!
//! ## Request lifecycle
//!
//! 1. Checks: authorization, source eligibility, quota
//! 2. Own-state effects, journaled
//! 3. Collaborator effects, journaled once completed
//! 4. Event emission
//!
//! A failure at any step hands the journal to `settle`, which reverses the
//! completed effects newest-first and then restores own state.
//!
//! The mint operations live in `orchestrator.rs`, fusion in `fusion.rs`.

use crate::collaborators::{CollaboratorBinding, Collaborators};
use crate::config::{AdminCommand, EngineConfig};
use crate::domain::entities::{EntityOrigin, MintRequest, QuotaKey};
use crate::domain::invariants;
use crate::domain::journal::{ForgeState, Effect, Journal};
use crate::domain::regeneration::RegenerationKey;
use crate::errors::{MintError, MissingConfig};
use crate::events::ForgeEvent;
use crate::sources::SourceContext;
use rm_01_authorization::{AuthorizationApi, AuthorizationPayload, AuthorizationValidator};
use shared_types::{Address, EntityId, Epoch, U256};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

// =============================================================================
// ADMIN CAPABILITY
// =============================================================================

/// Proof of administrative authority over one engine.
///
/// Issued once by `MintingEngine::new`; every privileged command must present
/// it. A capability from another engine is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCapability {
    token: Uuid,
}

impl AdminCapability {
    fn issue() -> Self {
        Self {
            token: Uuid::new_v4(),
        }
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Minting, regeneration and fusion state machine.
#[derive(Debug)]
pub struct MintingEngine {
    pub(crate) config: Arc<EngineConfig>,
    pub(crate) collaborators: Collaborators,
    pub(crate) state: ForgeState,
    pub(crate) epoch: Epoch,
    admin: Uuid,
}

impl MintingEngine {
    /// Builds an engine at epoch 0 and issues its admin capability.
    ///
    /// # Errors
    /// `InvalidConfig` if `config` fails validation.
    pub fn new(
        config: EngineConfig,
        collaborators: Collaborators,
    ) -> Result<(Self, AdminCapability), MintError> {
        config.validate()?;
        let capability = AdminCapability::issue();
        info!(
            chain_id = config.chain_id,
            validator = ?config.validator,
            treasury = ?config.treasury,
            "Minting engine initialized"
        );
        let engine = Self {
            config: Arc::new(config),
            collaborators,
            state: ForgeState::default(),
            epoch: 0,
            admin: capability.token,
        };
        Ok((engine, capability))
    }

    // =========================================================================
    // Administration
    // =========================================================================

    fn authorize_admin(&self, capability: &AdminCapability) -> Result<(), MintError> {
        if capability.token != self.admin {
            warn!("Administrative command with foreign capability");
            return Err(MintError::Unauthorized);
        }
        Ok(())
    }

    /// Applies a privileged command.
    ///
    /// Configuration commands swap in a validated copy of the snapshot;
    /// `AdvanceEpoch` moves every counter to a fresh epoch.
    ///
    /// # Errors
    /// `Unauthorized` for a foreign capability, `InvalidConfig` if the change
    /// would leave the configuration invalid. Either way nothing changes.
    pub fn apply(
        &mut self,
        capability: &AdminCapability,
        command: &AdminCommand,
    ) -> Result<(), MintError> {
        self.authorize_admin(capability)?;

        if let AdminCommand::AdvanceEpoch = command {
            let next = self.epoch.saturating_add(1);
            debug_assert!(invariants::check_epoch_advance(self.epoch, next));
            self.epoch = next;
            info!(epoch = next, "Epoch advanced");
            self.collaborators
                .emit(ForgeEvent::EpochAdvanced { epoch: next });
            return Ok(());
        }

        let next = self.config.with(command)?;
        self.config = Arc::new(next);
        info!(?command, "Configuration updated");
        Ok(())
    }

    /// Binds or replaces a collaborator port.
    ///
    /// # Errors
    /// `Unauthorized` for a foreign capability.
    pub fn rebind(
        &mut self,
        capability: &AdminCapability,
        binding: CollaboratorBinding,
    ) -> Result<(), MintError> {
        self.authorize_admin(capability)?;
        info!(port = binding.name(), "Collaborator rebound");
        self.collaborators.bind(binding);
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current season.
    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Configuration snapshot in force.
    #[must_use]
    pub fn config(&self) -> Arc<EngineConfig> {
        Arc::clone(&self.config)
    }

    /// Engine-owned state, for inspection.
    #[must_use]
    pub fn state(&self) -> &ForgeState {
        &self.state
    }

    /// Counter value for `key`.
    #[must_use]
    pub fn quota_count(&self, key: &QuotaKey) -> u64 {
        self.state.quotas.count(key)
    }

    /// Whether `owner` took the free mint.
    #[must_use]
    pub fn has_claimed_free(&self, owner: &Address) -> bool {
        self.state.quotas.has_claimed_free(owner)
    }

    /// In-use flag of a slot.
    #[must_use]
    pub fn regeneration_state(&self, key: &RegenerationKey) -> Option<bool> {
        self.state.regeneration.state(key)
    }

    /// Live monsters held by `owner`.
    ///
    /// # Errors
    /// `ConfigurationMissing` if no monster registry is bound.
    pub fn tokens_of(&self, owner: Address) -> Result<Vec<EntityId>, MintError> {
        Ok(self.collaborators.monsters()?.tokens_of(owner))
    }

    // =========================================================================
    // Shared request steps
    // =========================================================================

    pub(crate) fn context<'a>(&'a self, config: &'a EngineConfig) -> SourceContext<'a> {
        SourceContext {
            epoch: self.epoch,
            config,
            collaborators: &self.collaborators,
        }
    }

    /// Verifies the validator's proof over the request at the current time.
    pub(crate) fn authorize(
        &self,
        config: &EngineConfig,
        request: &MintRequest,
    ) -> Result<(), MintError> {
        let validator = config
            .validator
            .ok_or(MintError::ConfigurationMissing(MissingConfig::Validator))?;
        let now = self.collaborators.clock()?.now();
        let payload = AuthorizationPayload {
            source: request.source,
            cost: request.cost,
            use_index: request.use_index,
            chain_id: config.chain_id,
            expiry: request.expiry,
        };
        AuthorizationValidator::new(validator).verify(&payload, &request.proof, now)?;
        Ok(())
    }

    /// Resolves where a payment of `cost` goes, before any effect.
    ///
    /// `None` for a zero cost.
    pub(crate) fn payment_route(
        &self,
        config: &EngineConfig,
        cost: U256,
    ) -> Result<Option<Address>, MintError> {
        if cost.is_zero() {
            return Ok(None);
        }
        let treasury = config
            .treasury
            .ok_or(MintError::ConfigurationMissing(MissingConfig::Treasury))?;
        self.collaborators.currency()?;
        Ok(Some(treasury))
    }

    pub(crate) fn charge(
        &self,
        payer: Address,
        treasury: Option<Address>,
        cost: U256,
        journal: &mut Journal,
    ) -> Result<(), MintError> {
        let Some(treasury) = treasury else {
            return Ok(());
        };
        self.collaborators
            .currency()?
            .transfer(payer, treasury, cost)?;
        journal.record_completed(Effect::Payment {
            from: payer,
            to: treasury,
            amount: cost,
        });
        Ok(())
    }

    pub(crate) fn create(
        &self,
        owner: Address,
        origin: EntityOrigin,
        journal: &mut Journal,
    ) -> Result<EntityId, MintError> {
        let id = self.collaborators.monsters()?.create(owner, origin)?;
        journal.record_completed(Effect::EntityCreated(id));
        Ok(id)
    }

    /// Finishes a request: success passes through, failure is rolled back.
    pub(crate) fn settle<T>(
        &mut self,
        mut journal: Journal,
        result: Result<T, MintError>,
    ) -> Result<T, MintError> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                if !journal.is_empty() {
                    debug!(kind = err.kind(), "Rolling back request");
                    for effect in journal.take_completed() {
                        self.compensate(&effect);
                    }
                    journal.undo(&mut self.state);
                }
                Err(err)
            }
        }
    }

    fn compensate(&self, effect: &Effect) {
        let outcome = match *effect {
            Effect::Payment { from, to, amount } => self
                .collaborators
                .currency()
                .and_then(|c| Ok(c.transfer(to, from, amount)?)),
            Effect::ItemBurn {
                owner,
                item,
                amount,
            } => self
                .collaborators
                .items()
                .and_then(|items| Ok(items.mint(owner, item, amount)?)),
            Effect::HashRetired { kind, id } => self
                .collaborators
                .hashes(kind)
                .and_then(|hashes| Ok(hashes.restore(id)?)),
            Effect::EntityRetired(id) => self
                .collaborators
                .monsters()
                .and_then(|monsters| Ok(monsters.restore(id)?)),
            Effect::EntityCreated(id) => self
                .collaborators
                .monsters()
                .and_then(|monsters| Ok(monsters.retire(id)?)),
        };
        if let Err(err) = outcome {
            error!(?effect, "Compensation failed: {}", err);
        }
    }
}
