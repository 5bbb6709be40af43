//! # Registry Adapters
//!
//! In-memory registries for monsters, hashes, external entries and chips.
//! A production deployment would back these with the on-chain collections.

use crate::domain::entities::{ChipRecord, EntityOrigin, HashRecord};
use crate::errors::LedgerError;
use crate::ports::outbound::{ChipRegistry, EntityRegistry, ExternalRegistry, HashRegistry};
use parking_lot::RwLock;
use shared_types::{Address, EntityId};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

// =============================================================================
// MONSTERS
// =============================================================================

/// Stored monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonsterRecord {
    /// Holder.
    pub owner: Address,
    /// Provenance.
    pub origin: EntityOrigin,
    /// Retired monsters have no owner.
    pub retired: bool,
}

/// In-memory monster registry. Ids start at 1.
#[derive(Debug)]
pub struct InMemoryEntityRegistry {
    next_id: RwLock<EntityId>,
    monsters: RwLock<BTreeMap<EntityId, MonsterRecord>>,
    refuse_creation: AtomicBool,
}

impl InMemoryEntityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: RwLock::new(1),
            monsters: RwLock::new(BTreeMap::new()),
            refuse_creation: AtomicBool::new(false),
        }
    }

    /// Looks up a monster, retired or not.
    #[must_use]
    pub fn record(&self, id: EntityId) -> Option<MonsterRecord> {
        self.monsters.read().get(&id).copied()
    }

    /// Number of monsters ever created.
    #[must_use]
    pub fn total_created(&self) -> usize {
        self.monsters.read().len()
    }

    /// Makes every later `create` fail, to exercise rollback.
    pub fn set_refuse_creation(&self, refuse: bool) {
        self.refuse_creation.store(refuse, Ordering::SeqCst);
    }

    /// Moves a live monster to `to`.
    pub fn transfer(&self, id: EntityId, to: Address) -> Result<(), LedgerError> {
        let mut monsters = self.monsters.write();
        let record = monsters.get_mut(&id).ok_or(LedgerError::UnknownEntity(id))?;
        if record.retired {
            return Err(LedgerError::AlreadyRetired(id));
        }
        record.owner = to;
        Ok(())
    }
}

impl Default for InMemoryEntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry for InMemoryEntityRegistry {
    fn owner_of(&self, id: EntityId) -> Option<Address> {
        self.monsters
            .read()
            .get(&id)
            .filter(|record| !record.retired)
            .map(|record| record.owner)
    }

    fn create(&self, owner: Address, origin: EntityOrigin) -> Result<EntityId, LedgerError> {
        if self.refuse_creation.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("monster registry refused creation".into()));
        }
        let mut next_id = self.next_id.write();
        let id = *next_id;
        *next_id += 1;
        self.monsters.write().insert(
            id,
            MonsterRecord {
                owner,
                origin,
                retired: false,
            },
        );
        Ok(id)
    }

    fn retire(&self, id: EntityId) -> Result<(), LedgerError> {
        let mut monsters = self.monsters.write();
        let record = monsters.get_mut(&id).ok_or(LedgerError::UnknownEntity(id))?;
        if record.retired {
            return Err(LedgerError::AlreadyRetired(id));
        }
        record.retired = true;
        Ok(())
    }

    fn restore(&self, id: EntityId) -> Result<(), LedgerError> {
        let mut monsters = self.monsters.write();
        let record = monsters.get_mut(&id).ok_or(LedgerError::UnknownEntity(id))?;
        if !record.retired {
            return Err(LedgerError::NotRetired(id));
        }
        record.retired = false;
        Ok(())
    }

    fn tokens_of(&self, owner: Address) -> Vec<EntityId> {
        self.monsters
            .read()
            .iter()
            .filter(|(_, record)| record.owner == owner && !record.retired)
            .map(|(id, _)| *id)
            .collect()
    }
}

// =============================================================================
// HASHES
// =============================================================================

/// In-memory genesis or general hash registry.
#[derive(Debug, Default)]
pub struct InMemoryHashRegistry {
    hashes: RwLock<HashMap<EntityId, HashRecord>>,
}

impl InMemoryHashRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a live hash.
    pub fn issue(&self, id: EntityId, owner: Address, group: u64, detail: u64) {
        self.hashes.write().insert(
            id,
            HashRecord {
                owner,
                group,
                detail,
                retired: false,
            },
        );
    }

    /// Moves a hash to `to`.
    pub fn transfer(&self, id: EntityId, to: Address) -> Result<(), LedgerError> {
        let mut hashes = self.hashes.write();
        let record = hashes.get_mut(&id).ok_or(LedgerError::UnknownEntity(id))?;
        record.owner = to;
        Ok(())
    }

    /// Live hashes held by `owner`.
    #[must_use]
    pub fn balance_of(&self, owner: Address) -> usize {
        self.hashes
            .read()
            .values()
            .filter(|record| record.owner == owner && !record.retired)
            .count()
    }
}

impl HashRegistry for InMemoryHashRegistry {
    fn hash_of(&self, id: EntityId) -> Option<HashRecord> {
        self.hashes.read().get(&id).copied()
    }

    fn retire(&self, id: EntityId) -> Result<(), LedgerError> {
        let mut hashes = self.hashes.write();
        let record = hashes.get_mut(&id).ok_or(LedgerError::UnknownEntity(id))?;
        if record.retired {
            return Err(LedgerError::AlreadyRetired(id));
        }
        record.retired = true;
        Ok(())
    }

    fn restore(&self, id: EntityId) -> Result<(), LedgerError> {
        let mut hashes = self.hashes.write();
        let record = hashes.get_mut(&id).ok_or(LedgerError::UnknownEntity(id))?;
        if !record.retired {
            return Err(LedgerError::NotRetired(id));
        }
        record.retired = false;
        Ok(())
    }
}

// =============================================================================
// EXTERNAL ENTRIES AND CHIPS
// =============================================================================

/// In-memory external collection.
#[derive(Debug, Default)]
pub struct InMemoryExternalRegistry {
    owners: RwLock<HashMap<EntityId, Address>>,
}

impl InMemoryExternalRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `owner` as holder of entry `id`.
    pub fn assign(&self, id: EntityId, owner: Address) {
        self.owners.write().insert(id, owner);
    }
}

impl ExternalRegistry for InMemoryExternalRegistry {
    fn owner_of(&self, id: EntityId) -> Option<Address> {
        self.owners.read().get(&id).copied()
    }
}

/// In-memory chip registry.
#[derive(Debug, Default)]
pub struct InMemoryChipRegistry {
    chips: RwLock<HashMap<EntityId, ChipRecord>>,
}

impl InMemoryChipRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a chip.
    pub fn issue(&self, id: EntityId, owner: Address, sub_type: u64) {
        self.chips.write().insert(id, ChipRecord { owner, sub_type });
    }
}

impl ChipRegistry for InMemoryChipRegistry {
    fn chip_of(&self, id: EntityId) -> Option<ChipRecord> {
        self.chips.read().get(&id).copied()
    }
}
