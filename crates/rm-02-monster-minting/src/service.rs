//! # Minting Service
//!
//! Async facade over `MintingEngine` implementing `MintingApi`.
//!
//! Requests are serialized through one `tokio::sync::Mutex`, so the engine
//! sees a single globally ordered stream. Each request runs inside a span
//! carrying a fresh correlation id, and its outcome feeds `ServiceStats`.

use crate::collaborators::CollaboratorBinding;
use crate::config::{AdminCommand, EngineConfig};
use crate::domain::entities::{FusionRequest, MintRequest, QuotaKey};
use crate::domain::regeneration::RegenerationKey;
use crate::engine::{AdminCapability, MintingEngine};
use crate::errors::MintError;
use crate::ports::inbound::MintingApi;
use async_trait::async_trait;
use serde::Serialize;
use shared_types::{Address, EntityId, Epoch, FusionVariant, ItemId};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Statistics for the Minting Service.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStats {
    /// Requests handled, accepted or not.
    pub requests: u64,
    /// Requests that committed.
    pub accepted: u64,
    /// Requests that were rolled back.
    pub rejected: u64,
    /// Rejections keyed by `MintError::kind`.
    pub rejected_by_kind: BTreeMap<&'static str, u64>,
    /// Monsters created by mints and fusions.
    pub monsters_created: u64,
    /// Committed fusions.
    pub fusions: u64,
    /// Committed refreshes.
    pub refreshes: u64,
    /// Average request latency in microseconds.
    pub avg_latency_us: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Mint,
    Fusion,
    Refresh,
}

/// The main Minting Service.
#[derive(Debug, Clone)]
pub struct MintingService {
    engine: Arc<Mutex<MintingEngine>>,
    stats: Arc<RwLock<ServiceStats>>,
}

impl MintingService {
    /// Wraps an engine.
    #[must_use]
    pub fn new(engine: MintingEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Applies a privileged command between requests.
    ///
    /// # Errors
    /// `Unauthorized` or `InvalidConfig`.
    #[instrument(skip(self, capability), fields(correlation_id = %Uuid::new_v4()))]
    pub async fn apply(
        &self,
        capability: &AdminCapability,
        command: &AdminCommand,
    ) -> Result<(), MintError> {
        self.engine.lock().await.apply(capability, command)
    }

    /// Rebinds a collaborator between requests.
    ///
    /// # Errors
    /// `Unauthorized`.
    #[instrument(skip(self, capability, binding), fields(port = binding.name()))]
    pub async fn rebind(
        &self,
        capability: &AdminCapability,
        binding: CollaboratorBinding,
    ) -> Result<(), MintError> {
        self.engine.lock().await.rebind(capability, binding)
    }

    async fn record<T>(&self, operation: Operation, result: &Result<T, MintError>, started: Instant) {
        let elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        let mut stats = self.stats.write().await;
        stats.requests += 1;
        match result {
            Ok(_) => {
                stats.accepted += 1;
                match operation {
                    Operation::Mint => stats.monsters_created += 1,
                    Operation::Fusion => {
                        stats.fusions += 1;
                        stats.monsters_created += 1;
                    }
                    Operation::Refresh => stats.refreshes += 1,
                }
                debug!(?operation, elapsed_us, "Request accepted");
            }
            Err(e) => {
                stats.rejected += 1;
                *stats.rejected_by_kind.entry(e.kind()).or_insert(0) += 1;
                warn!(?operation, kind = e.kind(), "Request rejected: {}", e);
            }
        }
        stats.avg_latency_us = running_mean(stats.avg_latency_us, elapsed_us, stats.requests);
    }
}

/// Folds the `count`-th sample into `mean`.
fn running_mean(mean: u64, sample: u64, count: u64) -> u64 {
    if count == 0 {
        return mean;
    }
    let mean = i128::from(mean);
    let next = mean + (i128::from(sample) - mean) / i128::from(count);
    u64::try_from(next).unwrap_or(u64::MAX)
}

#[async_trait]
impl MintingApi for MintingService {
    #[instrument(
        skip(self, request),
        fields(correlation_id = %Uuid::new_v4(), source = %request.source, use_index = request.use_index)
    )]
    async fn mint(&self, caller: Address, request: MintRequest) -> Result<EntityId, MintError> {
        let started = Instant::now();
        let result = self.engine.lock().await.mint(caller, request);
        self.record(Operation::Mint, &result, started).await;
        result
    }

    #[instrument(skip(self), fields(correlation_id = %Uuid::new_v4()))]
    async fn mint_free(&self, caller: Address) -> Result<EntityId, MintError> {
        let started = Instant::now();
        let result = self.engine.lock().await.mint_free(caller);
        self.record(Operation::Mint, &result, started).await;
        result
    }

    #[instrument(skip(self), fields(correlation_id = %Uuid::new_v4()))]
    async fn mint_from_item(&self, caller: Address, item: ItemId) -> Result<EntityId, MintError> {
        let started = Instant::now();
        let result = self.engine.lock().await.mint_from_item(caller, item);
        self.record(Operation::Mint, &result, started).await;
        result
    }

    #[instrument(
        skip(self, request),
        fields(correlation_id = %Uuid::new_v4(), source = %request.source, use_index = request.use_index)
    )]
    async fn refresh_regeneration(
        &self,
        caller: Address,
        request: MintRequest,
    ) -> Result<u64, MintError> {
        let started = Instant::now();
        let result = self.engine.lock().await.refresh_regeneration(caller, request);
        self.record(Operation::Refresh, &result, started).await;
        result
    }

    #[instrument(
        skip(self, request),
        fields(correlation_id = %Uuid::new_v4(), owner = %request.owner)
    )]
    async fn fuse(
        &self,
        caller: Address,
        variant: FusionVariant,
        request: FusionRequest,
    ) -> Result<EntityId, MintError> {
        let started = Instant::now();
        let result = self.engine.lock().await.fuse(caller, variant, request);
        self.record(Operation::Fusion, &result, started).await;
        result
    }

    async fn current_epoch(&self) -> Epoch {
        self.engine.lock().await.epoch()
    }

    async fn quota_count(&self, key: QuotaKey) -> u64 {
        self.engine.lock().await.quota_count(&key)
    }

    async fn has_claimed_free(&self, owner: Address) -> bool {
        self.engine.lock().await.has_claimed_free(&owner)
    }

    async fn regeneration_state(&self, key: RegenerationKey) -> Option<bool> {
        self.engine.lock().await.regeneration_state(&key)
    }

    async fn config(&self) -> Arc<EngineConfig> {
        self.engine.lock().await.config()
    }

    async fn tokens_of(&self, owner: Address) -> Result<Vec<EntityId>, MintError> {
        self.engine.lock().await.tokens_of(owner)
    }
}
