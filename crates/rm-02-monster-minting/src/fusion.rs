//! # Fusion Engine
//!
//! Combines two owned inputs, optionally burning items, into a new monster.
//!
//! | Variant | Inputs | Counter(s) | Inputs afterwards |
//! |---------|--------|------------|-------------------|
//! | `Monster` | two monsters | one per owner | retired |
//! | `GenesisHash` | two genesis hashes | one per input hash | kept, or retired with `retire_hash_inputs` |
//! | `GeneralHash` | two general hashes | one per input hash | kept, or retired with `retire_hash_inputs` |
//! | `MultipleHash` | genesis `A`, general `B` | one per (A, B) pair | kept, or retired with `retire_hash_inputs` |
//!
//! Burns and retirements happen strictly after the counters move, so a
//! `QuotaExceeded` leaves every balance untouched.

use crate::domain::entities::{EntityOrigin, FusionRequest, QuotaKey, QuotaSlot};
use crate::domain::invariants;
use crate::domain::journal::{Effect, Journal};
use crate::engine::MintingEngine;
use crate::errors::{FusionInput, IneligibleReason, MintError};
use crate::events::ForgeEvent;
use shared_types::{Address, EntityId, Epoch, FusionVariant, HashKind, ItemId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Which registry each side of a variant is resolved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputRegistry {
    Monsters,
    Hashes(HashKind),
}

const fn registries(variant: FusionVariant) -> (InputRegistry, InputRegistry) {
    match variant {
        FusionVariant::Monster => (InputRegistry::Monsters, InputRegistry::Monsters),
        FusionVariant::GenesisHash => (
            InputRegistry::Hashes(HashKind::Genesis),
            InputRegistry::Hashes(HashKind::Genesis),
        ),
        FusionVariant::GeneralHash => (
            InputRegistry::Hashes(HashKind::General),
            InputRegistry::Hashes(HashKind::General),
        ),
        FusionVariant::MultipleHash => (
            InputRegistry::Hashes(HashKind::Genesis),
            InputRegistry::Hashes(HashKind::General),
        ),
    }
}

/// Counters a fusion charges.
fn quota_keys(epoch: Epoch, variant: FusionVariant, request: &FusionRequest) -> Vec<QuotaKey> {
    let key = |slot| QuotaKey::fusion(epoch, variant, slot);
    match variant {
        FusionVariant::Monster => vec![key(QuotaSlot::Owner(request.owner))],
        FusionVariant::GenesisHash | FusionVariant::GeneralHash => vec![
            key(QuotaSlot::Index(request.input_a)),
            key(QuotaSlot::Index(request.input_b)),
        ],
        FusionVariant::MultipleHash => {
            vec![key(QuotaSlot::Pair(request.input_a, request.input_b))]
        }
    }
}

impl MintingEngine {
    /// Fuses two of `caller`'s inputs under `variant` and returns the new
    /// monster.
    ///
    /// # Errors
    /// `NotRequestOwner` unless `caller` is the request's owner,
    /// `OwnerMismatch` naming the first input not held by the owner,
    /// `Ineligible` for duplicate or retired inputs and malformed item lists,
    /// `InsufficientItemBalance`, `QuotaExceeded`. Nothing changes on failure.
    pub fn fuse(
        &mut self,
        caller: Address,
        variant: FusionVariant,
        request: FusionRequest,
    ) -> Result<EntityId, MintError> {
        if caller != request.owner {
            return Err(MintError::NotRequestOwner {
                caller,
                owner: request.owner,
            });
        }
        let mut journal = Journal::new();
        let result = self.try_fuse(variant, &request, &mut journal);
        self.settle(journal, result)
    }

    fn try_fuse(
        &mut self,
        variant: FusionVariant,
        request: &FusionRequest,
        journal: &mut Journal,
    ) -> Result<EntityId, MintError> {
        let config = Arc::clone(&self.config);
        let owner = request.owner;
        let (registry_a, registry_b) = registries(variant);

        self.check_input(registry_a, FusionInput::A, request.input_a, owner)?;
        self.check_input(registry_b, FusionInput::B, request.input_b, owner)?;
        if registry_a == registry_b
            && !invariants::check_distinct_inputs(request.input_a, request.input_b)
        {
            return Err(IneligibleReason::DuplicateInput(request.input_a).into());
        }

        let burns = self.item_burns(owner, &request.item_ids, &request.item_amounts)?;
        self.collaborators.monsters()?;

        let keys = quota_keys(self.epoch, variant, request);
        let cap = config.fusion_limits.cap(variant);
        self.state
            .quotas
            .check_all_and_increment(&keys, cap, journal)?;

        for (item, amount) in burns {
            self.collaborators.items()?.burn(owner, item, amount)?;
            journal.record_completed(Effect::ItemBurn {
                owner,
                item,
                amount,
            });
        }

        let retire_inputs = variant == FusionVariant::Monster || config.retire_hash_inputs;
        if retire_inputs {
            self.retire_input(registry_a, request.input_a, journal)?;
            self.retire_input(registry_b, request.input_b, journal)?;
        }

        let origin = EntityOrigin::Fusion {
            variant,
            input_a: request.input_a,
            input_b: request.input_b,
        };
        let entity_id = self.create(owner, origin, journal)?;
        self.collaborators.emit(ForgeEvent::FusionCompleted {
            variant,
            entity_id,
            input_a: request.input_a,
            input_b: request.input_b,
            owner,
        });
        info!(
            %variant,
            %owner,
            input_a = request.input_a,
            input_b = request.input_b,
            entity_id,
            "Fusion completed"
        );
        Ok(entity_id)
    }

    fn check_input(
        &self,
        registry: InputRegistry,
        input: FusionInput,
        id: EntityId,
        owner: Address,
    ) -> Result<(), MintError> {
        let mismatch = MintError::OwnerMismatch {
            input,
            id,
            expected: owner,
        };
        match registry {
            InputRegistry::Monsters => {
                if self.collaborators.monsters()?.owner_of(id) != Some(owner) {
                    return Err(mismatch);
                }
            }
            InputRegistry::Hashes(kind) => {
                let record = self.collaborators.hashes(kind)?.hash_of(id);
                match record {
                    Some(record) if record.owner == owner => {
                        if record.retired {
                            return Err(IneligibleReason::HashRetired { kind, id }.into());
                        }
                    }
                    _ => return Err(mismatch),
                }
            }
        }
        Ok(())
    }

    /// Validates the item lists and returns the per-item totals to burn.
    ///
    /// Zero amounts are dropped and repeated ids are summed, so the balance
    /// check covers what will actually be burned.
    fn item_burns(
        &self,
        owner: Address,
        ids: &[ItemId],
        amounts: &[u64],
    ) -> Result<BTreeMap<ItemId, u64>, MintError> {
        if ids.len() != amounts.len() {
            return Err(IneligibleReason::ItemListMismatch {
                ids: ids.len(),
                amounts: amounts.len(),
            }
            .into());
        }

        let mut totals: BTreeMap<ItemId, u64> = BTreeMap::new();
        for (&item, &amount) in ids.iter().zip(amounts) {
            if amount == 0 {
                continue;
            }
            let total = totals.entry(item).or_insert(0);
            *total = total.saturating_add(amount);
        }
        if totals.is_empty() {
            return Ok(totals);
        }

        let items = self.collaborators.items()?;
        for (&item, &required) in &totals {
            let available = items.balance_of(owner, item);
            if available < required {
                debug!(item, required, available, "Fusion item pre-check failed");
                return Err(MintError::InsufficientItemBalance {
                    item,
                    required,
                    available,
                });
            }
        }
        Ok(totals)
    }

    fn retire_input(
        &self,
        registry: InputRegistry,
        id: EntityId,
        journal: &mut Journal,
    ) -> Result<(), MintError> {
        match registry {
            InputRegistry::Monsters => {
                self.collaborators.monsters()?.retire(id)?;
                journal.record_completed(Effect::EntityRetired(id));
            }
            InputRegistry::Hashes(kind) => {
                self.collaborators.hashes(kind)?.retire(id)?;
                journal.record_completed(Effect::HashRetired { kind, id });
            }
        }
        Ok(())
    }
}
