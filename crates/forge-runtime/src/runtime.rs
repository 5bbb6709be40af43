//! # Forge Runtime
//!
//! Binds the in-memory collaborators to a `MintingService` and replays
//! scripts against it.

use crate::config::RuntimeConfig;
use crate::script::{OrderStep, ScriptStep, DEFAULT_PROOF_TTL};
use rm_01_authorization::{AuthorizationPayload, PayloadSigner, SignatureError};
use rm_02_monster_minting::adapters::InMemoryForge;
use rm_02_monster_minting::domain::entities::MintRequest;
use rm_02_monster_minting::engine::{AdminCapability, MintingEngine};
use rm_02_monster_minting::errors::{LedgerError, MintError};
use rm_02_monster_minting::events::ForgeEvent;
use rm_02_monster_minting::ports::inbound::MintingApi;
use rm_02_monster_minting::ports::outbound::{Clock, CurrencyLedger, ItemLedger};
use rm_02_monster_minting::service::{MintingService, ServiceStats};
use serde::Serialize;
use serde_json::{json, Value};
use shared_types::{Epoch, Timestamp};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a script step failed.
#[derive(Debug, Error)]
pub enum StepError {
    /// The engine rejected the request.
    #[error(transparent)]
    Rejected(#[from] MintError),

    /// A seeding step was refused by a collaborator.
    #[error("seeding failed: {0}")]
    Seed(#[from] LedgerError),

    /// The order has no proof and the runtime has no signing key.
    #[error("order carries no proof and no signing key is configured")]
    NoSigner,

    /// Signing the order failed.
    #[error("signing failed: {0}")]
    Signer(#[from] SignatureError),
}

impl StepError {
    /// Stable identifier for reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            StepError::Rejected(e) => e.kind(),
            StepError::Seed(_) => "seed_failed",
            StepError::NoSigner => "no_signer",
            StepError::Signer(_) => "signer_failed",
        }
    }
}

/// Result of one replayed step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    /// Position in the script.
    pub index: usize,
    /// Step tag.
    pub op: &'static str,
    /// Step output when it succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Error kind when it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    /// Error message when it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepOutcome {
    /// Whether the step succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.kind.is_none()
    }
}

/// Everything a replay produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// One outcome per step, in order.
    pub outcomes: Vec<StepOutcome>,
    /// Epoch after the last step.
    pub epoch: Epoch,
    /// Committed events, in order.
    pub events: Vec<ForgeEvent>,
    /// Service statistics.
    pub stats: ServiceStats,
}

impl ReplayReport {
    /// Number of failed steps.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }
}

/// A minting service over in-memory collaborators.
#[derive(Debug)]
pub struct ForgeRuntime {
    forge: InMemoryForge,
    service: MintingService,
    admin: AdminCapability,
    signer: Option<PayloadSigner>,
}

impl ForgeRuntime {
    /// Builds the runtime with the clock at `now`.
    pub fn new(config: RuntimeConfig, now: Timestamp) -> Result<Self, MintError> {
        let forge = InMemoryForge::new(now);
        let chain_id = config.engine.chain_id;
        let (engine, admin) = MintingEngine::new(config.engine, forge.collaborators())?;

        info!(
            chain_id,
            signer = ?config.signer.as_ref().map(PayloadSigner::address),
            "Forge runtime ready"
        );
        Ok(Self {
            forge,
            service: MintingService::new(engine),
            admin,
            signer: config.signer,
        })
    }

    /// The collaborators, for seeding and inspection.
    #[must_use]
    pub fn forge(&self) -> &InMemoryForge {
        &self.forge
    }

    /// The minting service.
    #[must_use]
    pub fn service(&self) -> &MintingService {
        &self.service
    }

    /// Runs every step in order. Failures are recorded and replay continues.
    pub async fn replay(&self, steps: &[ScriptStep]) -> ReplayReport {
        let mut outcomes = Vec::with_capacity(steps.len());

        for (index, step) in steps.iter().enumerate() {
            let outcome = match self.run_step(step).await {
                Ok(value) => StepOutcome {
                    index,
                    op: step.op(),
                    value: Some(value),
                    kind: None,
                    error: None,
                },
                Err(e) => {
                    if !step.is_request() {
                        warn!(index, op = step.op(), "Script step failed: {}", e);
                    }
                    StepOutcome {
                        index,
                        op: step.op(),
                        value: None,
                        kind: Some(e.kind()),
                        error: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let report = ReplayReport {
            outcomes,
            epoch: self.service.current_epoch().await,
            events: self.forge.events.events(),
            stats: self.service.stats().await,
        };
        info!(
            steps = steps.len(),
            failures = report.failures(),
            events = report.events.len(),
            "Replay finished"
        );
        report
    }

    /// Runs one step and returns its JSON output.
    pub async fn run_step(&self, step: &ScriptStep) -> Result<Value, StepError> {
        debug!(op = step.op(), "Running step");
        match step {
            ScriptStep::CreditCurrency { owner, amount } => {
                self.forge.currency.credit(*owner, *amount);
                Ok(json!({ "balance": self.forge.currency.balance_of(*owner) }))
            }
            ScriptStep::CreditItems {
                owner,
                item,
                amount,
            } => {
                self.forge.items.mint(*owner, *item, *amount)?;
                Ok(json!({ "balance": self.forge.items.balance_of(*owner, *item) }))
            }
            ScriptStep::AssignExternal { id, owner } => {
                self.forge.external.assign(*id, *owner);
                Ok(json!({ "id": id }))
            }
            ScriptStep::IssueHash {
                kind,
                id,
                owner,
                group,
                detail,
            } => {
                self.forge
                    .hashes(*kind)
                    .issue(*id, *owner, *group, *detail);
                Ok(json!({ "id": id }))
            }
            ScriptStep::IssueChip {
                id,
                owner,
                sub_type,
            } => {
                self.forge.chips.issue(*id, *owner, *sub_type);
                Ok(json!({ "id": id }))
            }
            ScriptStep::TransferMonster { id, to } => {
                self.forge.monsters.transfer(*id, *to)?;
                Ok(json!({ "id": id }))
            }
            ScriptStep::TransferHash { kind, id, to } => {
                self.forge.hashes(*kind).transfer(*id, *to)?;
                Ok(json!({ "id": id }))
            }
            ScriptStep::SetTime { now } => {
                self.forge.clock.set(*now);
                Ok(json!({ "now": now }))
            }
            ScriptStep::AdvanceTime { secs } => {
                self.forge.clock.advance(*secs);
                Ok(json!({ "now": self.forge.clock.now() }))
            }
            ScriptStep::Mint(order) => {
                let request = self.sign(order).await?;
                let id = self.service.mint(order.caller, request).await?;
                Ok(json!({ "id": id }))
            }
            ScriptStep::Refresh(order) => {
                let request = self.sign(order).await?;
                let counter = self
                    .service
                    .refresh_regeneration(order.caller, request)
                    .await?;
                Ok(json!({ "counter": counter }))
            }
            ScriptStep::MintFree { caller } => {
                let id = self.service.mint_free(*caller).await?;
                Ok(json!({ "id": id }))
            }
            ScriptStep::MintFromItem { caller, item } => {
                let id = self.service.mint_from_item(*caller, *item).await?;
                Ok(json!({ "id": id }))
            }
            ScriptStep::Fuse(fuse) => {
                let id = self.service.fuse(fuse.caller(), fuse.variant, fuse.request()).await?;
                Ok(json!({ "id": id }))
            }
            ScriptStep::Admin { command } => {
                self.service.apply(&self.admin, command).await?;
                Ok(json!({ "epoch": self.service.current_epoch().await }))
            }
            ScriptStep::TokensOf { owner } => {
                let tokens = self.service.tokens_of(*owner).await?;
                Ok(json!({ "tokens": tokens }))
            }
        }
    }

    async fn sign(&self, order: &OrderStep) -> Result<MintRequest, StepError> {
        let expiry = order
            .expiry
            .unwrap_or_else(|| self.forge.clock.now().saturating_add(DEFAULT_PROOF_TTL));

        let proof = match &order.proof {
            Some(proof) => proof.clone(),
            None => {
                let signer = self.signer.as_ref().ok_or(StepError::NoSigner)?;
                let payload = AuthorizationPayload {
                    source: order.source,
                    cost: order.cost,
                    use_index: order.use_index,
                    chain_id: self.service.config().await.chain_id,
                    expiry,
                };
                signer.sign(&payload)?
            }
        };

        Ok(MintRequest {
            source: order.source,
            use_index: order.use_index,
            cost: order.cost,
            expiry,
            proof,
        })
    }
}
