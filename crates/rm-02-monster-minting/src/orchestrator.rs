//! # Minting Orchestrator
//!
//! Signed mints, the one-shot free mint, item mints and slot refresh.
//!
//! ## Mint order
//!
//! | Step | Check or effect | Failure |
//! |------|-----------------|---------|
//! | 1 | Proof verification (skipped for `FREE` and item mints) | `ExpiredAuthorization`, `UntrustedSigner` |
//! | 2 | Source eligibility | `Ineligible`, `ConfigurationMissing` |
//! | 3 | Counter check-and-increment, regeneration flag | `QuotaExceeded` |
//! | 4 | Payment to the treasury | `InsufficientFunds` |
//! | 5 | Item burn, hash retirement | `InsufficientItemBalance` |
//! | 6 | Monster creation, `MonsterCreated` | collaborator failure |
//!
//! Any failure after step 3 rolls back every earlier step.

use crate::domain::entities::{EntityOrigin, MintRequest};
use crate::domain::invariants;
use crate::domain::journal::{Effect, Journal};
use crate::domain::regeneration::RegenerationKey;
use crate::engine::MintingEngine;
use crate::errors::{IneligibleReason, MintError};
use crate::events::ForgeEvent;
use crate::sources::{adapter_for, Eligibility, FollowUp};
use shared_types::{Address, EntityId, ItemId, SourceType, U256};
use std::sync::Arc;
use tracing::{debug, info};

impl MintingEngine {
    /// Mints a monster from a signed request. `FREE` routes to `mint_free`.
    ///
    /// # Errors
    /// Any `MintError`; the request leaves no trace when it fails.
    pub fn mint(&mut self, caller: Address, request: MintRequest) -> Result<EntityId, MintError> {
        if request.source == SourceType::Free {
            return self.mint_free(caller);
        }
        let mut journal = Journal::new();
        let result = self.try_mint(caller, &request, &mut journal);
        self.settle(journal, result)
    }

    /// The one-shot free mint.
    ///
    /// # Errors
    /// `AlreadyClaimed` on every call after the first for `caller`.
    pub fn mint_free(&mut self, caller: Address) -> Result<EntityId, MintError> {
        let mut journal = Journal::new();
        let result = self.try_mint_free(caller, &mut journal);
        self.settle(journal, result)
    }

    /// Mints by burning a regeneration item, without proof or payment.
    ///
    /// # Errors
    /// `Ineligible(NoItemBalance)`, `QuotaExceeded` or
    /// `InsufficientItemBalance`.
    pub fn mint_from_item(&mut self, caller: Address, item: ItemId) -> Result<EntityId, MintError> {
        let mut journal = Journal::new();
        let result = self.try_mint_from_item(caller, item, &mut journal);
        self.settle(journal, result)
    }

    /// Refreshes an item-bound slot that is no longer in use and returns its
    /// new counter.
    ///
    /// Under `RefreshPolicy::Complement` the counter becomes the slot's current
    /// cap minus its counter, so after a cap change the slot regains as many
    /// uses as it had spent, never more than the cap.
    ///
    /// # Errors
    /// `Ineligible(NotRefreshable)` for sources without slots, `ItemInUse`
    /// while the slot is in use or was never minted from this season, plus
    /// the signed-mint failures.
    pub fn refresh_regeneration(
        &mut self,
        caller: Address,
        request: MintRequest,
    ) -> Result<u64, MintError> {
        let mut journal = Journal::new();
        let result = self.try_refresh(caller, &request, &mut journal);
        self.settle(journal, result)
    }

    fn try_mint(
        &mut self,
        caller: Address,
        request: &MintRequest,
        journal: &mut Journal,
    ) -> Result<EntityId, MintError> {
        let source = request.source;
        let adapter = adapter_for(source).ok_or(IneligibleReason::NotMintable(source))?;
        let config = Arc::clone(&self.config);

        self.authorize(&config, request)?;
        let eligibility = adapter.eligible(caller, request.use_index, &self.context(&config))?;
        let treasury = self.payment_route(&config, request.cost)?;

        self.commit_mint(
            caller,
            source,
            request.use_index,
            eligibility,
            Payment {
                treasury,
                cost: request.cost,
            },
            journal,
        )
    }

    fn try_mint_free(&mut self, caller: Address, journal: &mut Journal) -> Result<EntityId, MintError> {
        self.collaborators.monsters()?;
        self.state.quotas.claim_free(caller, journal)?;

        let origin = EntityOrigin::Mint {
            source: SourceType::Free,
            use_index: 0,
        };
        let entity_id = self.create(caller, origin, journal)?;
        self.collaborators.emit(ForgeEvent::MonsterCreated {
            entity_id,
            source: SourceType::Free,
            owner: caller,
        });
        info!(%caller, entity_id, "Free mint claimed");
        Ok(entity_id)
    }

    fn try_mint_from_item(
        &mut self,
        caller: Address,
        item: ItemId,
        journal: &mut Journal,
    ) -> Result<EntityId, MintError> {
        let source = SourceType::RegenerationItem;
        let adapter = adapter_for(source).ok_or(IneligibleReason::NotMintable(source))?;
        let config = Arc::clone(&self.config);
        let eligibility = adapter.eligible(caller, item, &self.context(&config))?;

        self.commit_mint(caller, source, item, eligibility, Payment::none(), journal)
    }

    /// Steps 3 to 6 of the mint order, shared by every source with an adapter.
    fn commit_mint(
        &mut self,
        caller: Address,
        source: SourceType,
        use_index: u64,
        eligibility: Eligibility,
        payment: Payment,
        journal: &mut Journal,
    ) -> Result<EntityId, MintError> {
        let Eligibility {
            key,
            cap,
            follow_ups,
        } = eligibility;

        let count = self.state.quotas.check_and_increment(key, cap, journal)?;
        debug_assert!(invariants::check_quota_bound(count, cap));
        let exhausted = count >= cap;

        if source.is_item_bound() {
            let slot = RegenerationKey {
                owner: caller,
                source,
                use_index,
            };
            self.state.regeneration.mark(slot, !exhausted, journal);
        }

        self.charge(caller, payment.treasury, payment.cost, journal)?;

        for follow_up in follow_ups {
            match follow_up {
                FollowUp::BurnItem { item, amount } => {
                    self.collaborators.items()?.burn(caller, item, amount)?;
                    journal.record_completed(Effect::ItemBurn {
                        owner: caller,
                        item,
                        amount,
                    });
                }
                FollowUp::RetireHashWhenExhausted { kind, id } if exhausted => {
                    self.collaborators.hashes(kind)?.retire(id)?;
                    journal.record_completed(Effect::HashRetired { kind, id });
                    debug!(?kind, id, "Exhausted hash retired");
                }
                FollowUp::RetireHashWhenExhausted { .. } => {}
            }
        }

        let entity_id = self.create(caller, EntityOrigin::Mint { source, use_index }, journal)?;
        self.collaborators.emit(ForgeEvent::MonsterCreated {
            entity_id,
            source,
            owner: caller,
        });
        info!(%caller, %source, use_index, entity_id, count, cap, "Monster minted");
        Ok(entity_id)
    }

    fn try_refresh(
        &mut self,
        caller: Address,
        request: &MintRequest,
        journal: &mut Journal,
    ) -> Result<u64, MintError> {
        let source = request.source;
        if !source.is_item_bound() {
            return Err(IneligibleReason::NotRefreshable(source).into());
        }
        let adapter = adapter_for(source).ok_or(IneligibleReason::NotRefreshable(source))?;
        let config = Arc::clone(&self.config);

        self.authorize(&config, request)?;
        let Eligibility { key, cap, .. } =
            adapter.eligible(caller, request.use_index, &self.context(&config))?;

        let slot = RegenerationKey {
            owner: caller,
            source,
            use_index: request.use_index,
        };
        let count = self.state.quotas.count(&key);
        if self.state.regeneration.in_use(&slot) || count == 0 {
            return Err(MintError::ItemInUse {
                source_type: source,
                use_index: request.use_index,
            });
        }
        let treasury = self.payment_route(&config, request.cost)?;

        let counter = config.refresh_policy.refreshed(count, cap);
        self.state.quotas.set(key, counter, journal);
        self.state.regeneration.mark(slot, true, journal);
        self.charge(caller, treasury, request.cost, journal)?;

        self.collaborators.emit(ForgeEvent::RegenerationRefreshed {
            source,
            use_index: request.use_index,
            owner: caller,
            counter,
        });
        info!(%caller, %source, use_index = request.use_index, counter, "Regeneration refreshed");
        Ok(counter)
    }
}

/// Where a mint's cost goes; `treasury` is `None` when nothing is charged.
#[derive(Debug, Clone, Copy)]
struct Payment {
    treasury: Option<Address>,
    cost: U256,
}

impl Payment {
    fn none() -> Self {
        Self {
            treasury: None,
            cost: U256::zero(),
        }
    }
}
