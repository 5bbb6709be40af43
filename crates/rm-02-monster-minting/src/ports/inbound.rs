//! # Driving Ports (API - Inbound)
//!
//! The public API of the forge. `MintingService` implements it; the runtime
//! binary and integration tests drive it.

use crate::config::EngineConfig;
use crate::domain::entities::{FusionRequest, MintRequest, QuotaKey};
use crate::domain::regeneration::RegenerationKey;
use crate::errors::MintError;
use async_trait::async_trait;
use shared_types::{Address, EntityId, Epoch, FusionVariant, ItemId};
use std::sync::Arc;

/// Minting, regeneration and fusion API.
///
/// Requests are serialized; each one either commits fully or leaves no trace.
#[async_trait]
pub trait MintingApi: Send + Sync {
    // =========================================================================
    // Minting
    // =========================================================================

    /// Signed mint from any source. `FREE` routes to `mint_free`.
    async fn mint(&self, caller: Address, request: MintRequest) -> Result<EntityId, MintError>;

    /// One-shot free mint.
    async fn mint_free(&self, caller: Address) -> Result<EntityId, MintError>;

    /// Mint by burning a regeneration item; no proof and no payment.
    async fn mint_from_item(&self, caller: Address, item: ItemId) -> Result<EntityId, MintError>;

    /// Refreshes an exhausted item-bound slot, returning the new counter.
    async fn refresh_regeneration(
        &self,
        caller: Address,
        request: MintRequest,
    ) -> Result<u64, MintError>;

    // =========================================================================
    // Fusion
    // =========================================================================

    /// Fuses two inputs under `variant`. `caller` must be the request's owner.
    async fn fuse(
        &self,
        caller: Address,
        variant: FusionVariant,
        request: FusionRequest,
    ) -> Result<EntityId, MintError>;

    /// Two monsters.
    async fn fuse_entities(
        &self,
        caller: Address,
        request: FusionRequest,
    ) -> Result<EntityId, MintError> {
        self.fuse(caller, FusionVariant::Monster, request).await
    }

    /// Two genesis hashes.
    async fn fuse_genesis_hashes(
        &self,
        caller: Address,
        request: FusionRequest,
    ) -> Result<EntityId, MintError> {
        self.fuse(caller, FusionVariant::GenesisHash, request).await
    }

    /// Two general hashes.
    async fn fuse_general_hashes(
        &self,
        caller: Address,
        request: FusionRequest,
    ) -> Result<EntityId, MintError> {
        self.fuse(caller, FusionVariant::GeneralHash, request).await
    }

    /// A genesis hash (`input_a`) and a general hash (`input_b`).
    async fn fuse_multiple_hashes(
        &self,
        caller: Address,
        request: FusionRequest,
    ) -> Result<EntityId, MintError> {
        self.fuse(caller, FusionVariant::MultipleHash, request).await
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current season.
    async fn current_epoch(&self) -> Epoch;

    /// Counter value for `key`.
    async fn quota_count(&self, key: QuotaKey) -> u64;

    /// Whether `owner` took the free mint.
    async fn has_claimed_free(&self, owner: Address) -> bool;

    /// In-use flag of a slot, `None` if never minted from.
    async fn regeneration_state(&self, key: RegenerationKey) -> Option<bool>;

    /// Configuration snapshot in force.
    async fn config(&self) -> Arc<EngineConfig>;

    /// Live monsters held by `owner`.
    async fn tokens_of(&self, owner: Address) -> Result<Vec<EntityId>, MintError>;
}
