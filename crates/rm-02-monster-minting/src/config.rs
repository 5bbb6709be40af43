//! # Engine Configuration
//!
//! Everything the engine reads at call time: identities, caps and policies.
//!
//! The engine holds an `Arc<EngineConfig>` snapshot. Administrative commands
//! build a modified copy, validate it and swap it in; a request in flight
//! always sees one consistent snapshot.
//!
//! ## Defaults
//!
//! | Setting | Value |
//! |---------|-------|
//! | External entry cap | 3 per useIndex per season |
//! | Chip cap | 3 per sub-type per season |
//! | Item cap | 100 per item id per season |
//! | Genesis hash season cap | 5 |
//! | General hash season cap | 3 (retired on exhaustion) |
//! | Fusion caps | monster 10, genesis 5, general 3, multiple 3 |
//! | Genesis groups 1..=5 | 800, 800, 1000, 800, 800 (details 200) |
//! | General groups 1..=5 | 400, 400, 500, 400, 400 (details 100) |

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use shared_types::{Address, ChainId, FusionVariant, HashKind, SourceType};
use std::collections::BTreeMap;

/// Chain id used when none is configured (local development chain).
pub const DEFAULT_CHAIN_ID: ChainId = 31337;

// =============================================================================
// LIMIT TABLES
// =============================================================================

/// Two-level cap table for a hash registry: group caps and (group, detail) caps.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitGroupTable {
    /// Cap per group id.
    #[serde(default)]
    pub groups: BTreeMap<u64, u64>,
    /// Finer cap per (group id, detail id).
    #[serde_as(as = "Vec<(_, _)>")]
    #[serde(default)]
    pub details: BTreeMap<(u64, u64), u64>,
}

impl LimitGroupTable {
    /// Cap for `group`, `None` if unconfigured.
    #[must_use]
    pub fn group_cap(&self, group: u64) -> Option<u64> {
        self.groups.get(&group).copied()
    }

    /// Cap for `(group, detail)`, `None` if unconfigured.
    #[must_use]
    pub fn detail_cap(&self, group: u64, detail: u64) -> Option<u64> {
        self.details.get(&(group, detail)).copied()
    }

    fn deployment(group_caps: [u64; 5], detail_cap: u64) -> Self {
        // Group 3 has five species, the others four
        let mut table = Self::default();
        for (group, cap) in (1u64..).zip(group_caps) {
            table.groups.insert(group, cap);
            let species = if group == 3 { 5 } else { 4 };
            for detail in 1..=species {
                table.details.insert((group, detail), detail_cap);
            }
        }
        table
    }
}

/// Default cap plus per-index overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotLimits {
    /// Cap for any index without an override.
    pub default_cap: u64,
    /// Index-specific caps.
    #[serde(default)]
    pub overrides: BTreeMap<u64, u64>,
}

impl SlotLimits {
    /// Limits with only a default cap.
    #[must_use]
    pub fn uniform(default_cap: u64) -> Self {
        Self {
            default_cap,
            overrides: BTreeMap::new(),
        }
    }

    /// Cap in force for `index`.
    #[must_use]
    pub fn cap_for(&self, index: u64) -> u64 {
        self.overrides
            .get(&index)
            .copied()
            .unwrap_or(self.default_cap)
    }
}

/// Per-registry policy for the genesis and general hash sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashSourcePolicy {
    /// Mints per hash per season.
    pub season_cap: u64,
    /// Retire the hash once its season counter reaches the cap.
    pub retire_on_exhaustion: bool,
    /// Group and detail caps.
    pub limits: LimitGroupTable,
}

/// Caps for each fusion variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusionLimits {
    /// Monster fusions per owner per season.
    pub monster: u64,
    /// Fusions per genesis hash per season.
    pub genesis_hash: u64,
    /// Fusions per general hash per season.
    pub general_hash: u64,
    /// Fusions per (genesis, general) pair per season.
    pub multiple_hash: u64,
}

impl FusionLimits {
    /// Cap for `variant`.
    #[must_use]
    pub const fn cap(&self, variant: FusionVariant) -> u64 {
        match variant {
            FusionVariant::Monster => self.monster,
            FusionVariant::GenesisHash => self.genesis_hash,
            FusionVariant::GeneralHash => self.general_hash,
            FusionVariant::MultipleHash => self.multiple_hash,
        }
    }

    fn set(&mut self, variant: FusionVariant, cap: u64) {
        match variant {
            FusionVariant::Monster => self.monster = cap,
            FusionVariant::GenesisHash => self.genesis_hash = cap,
            FusionVariant::GeneralHash => self.general_hash = cap,
            FusionVariant::MultipleHash => self.multiple_hash = cap,
        }
    }
}

impl Default for FusionLimits {
    fn default() -> Self {
        Self {
            monster: 10,
            genesis_hash: 5,
            general_hash: 3,
            multiple_hash: 3,
        }
    }
}

/// How `refresh_regeneration` rewrites an exhausted slot's counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// `counter := cap - counter`.
    #[default]
    Complement,
    /// `counter := 0`.
    Reset,
}

impl RefreshPolicy {
    /// New counter value for a slot currently at `count` under `cap`.
    #[must_use]
    pub const fn refreshed(self, count: u64, cap: u64) -> u64 {
        match self {
            Self::Complement => cap.saturating_sub(count),
            Self::Reset => 0,
        }
    }
}

// =============================================================================
// ENGINE CONFIG
// =============================================================================

/// Full engine configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chain id bound into every authorization payload.
    pub chain_id: ChainId,
    /// Identity whose proofs are accepted.
    pub validator: Option<Address>,
    /// Recipient of mint and refresh payments.
    pub treasury: Option<Address>,
    /// External entry caps by useIndex.
    pub external_limits: SlotLimits,
    /// Chip caps by sub-type.
    pub chip_limits: SlotLimits,
    /// Regeneration item caps by item id.
    pub item_limits: SlotLimits,
    /// Genesis hash source.
    pub genesis: HashSourcePolicy,
    /// General hash source.
    pub general: HashSourcePolicy,
    /// Fusion caps.
    pub fusion_limits: FusionLimits,
    /// Retire hash fusion inputs instead of only spending a use.
    pub retire_hash_inputs: bool,
    /// Counter rewrite applied by refresh.
    pub refresh_policy: RefreshPolicy,
    /// Units burned per item-source mint.
    pub item_burn_quantity: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            validator: None,
            treasury: None,
            external_limits: SlotLimits::uniform(3),
            chip_limits: SlotLimits::uniform(3),
            item_limits: SlotLimits::uniform(100),
            genesis: HashSourcePolicy {
                season_cap: 5,
                retire_on_exhaustion: false,
                limits: LimitGroupTable::deployment([800, 800, 1000, 800, 800], 200),
            },
            general: HashSourcePolicy {
                season_cap: 3,
                retire_on_exhaustion: true,
                limits: LimitGroupTable::deployment([400, 400, 500, 400, 400], 100),
            },
            fusion_limits: FusionLimits::default(),
            retire_hash_inputs: false,
            refresh_policy: RefreshPolicy::default(),
            item_burn_quantity: 1,
        }
    }
}

impl EngineConfig {
    /// Policy for a hash registry.
    #[must_use]
    pub const fn hash_policy(&self, kind: HashKind) -> &HashSourcePolicy {
        match kind {
            HashKind::Genesis => &self.genesis,
            HashKind::General => &self.general,
        }
    }

    fn hash_policy_mut(&mut self, kind: HashKind) -> &mut HashSourcePolicy {
        match kind {
            HashKind::Genesis => &mut self.genesis,
            HashKind::General => &mut self.general,
        }
    }

    /// Slot limits for the sources that have them.
    #[must_use]
    pub const fn slot_limits(&self, source: SourceType) -> Option<&SlotLimits> {
        match source {
            SourceType::ExternalEntry => Some(&self.external_limits),
            SourceType::ChipEntry => Some(&self.chip_limits),
            SourceType::RegenerationItem => Some(&self.item_limits),
            _ => None,
        }
    }

    fn slot_limits_mut(&mut self, source: SourceType) -> Result<&mut SlotLimits, ConfigError> {
        match source {
            SourceType::ExternalEntry => Ok(&mut self.external_limits),
            SourceType::ChipEntry => Ok(&mut self.chip_limits),
            SourceType::RegenerationItem => Ok(&mut self.item_limits),
            other => Err(ConfigError::NoSlotTable(other)),
        }
    }

    /// Structural validation; run on construction and after every change.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_id == 0 {
            return Err(ConfigError::ZeroChainId);
        }
        if self.item_burn_quantity == 0 {
            return Err(ConfigError::ZeroBurnQuantity);
        }
        if self.validator.is_some_and(|a| a.is_zero()) {
            return Err(ConfigError::ZeroAddress("validator"));
        }
        if self.treasury.is_some_and(|a| a.is_zero()) {
            return Err(ConfigError::ZeroAddress("treasury"));
        }
        for kind in [HashKind::Genesis, HashKind::General] {
            let limits = &self.hash_policy(kind).limits;
            if let Some(&(group, detail)) = limits
                .details
                .keys()
                .find(|(group, _)| !limits.groups.contains_key(group))
            {
                return Err(ConfigError::OrphanDetail {
                    kind,
                    group,
                    detail,
                });
            }
        }
        Ok(())
    }

    /// Validation plus the identities a live deployment cannot run without.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.validator.is_none() {
            return Err(ConfigError::Required("validator"));
        }
        if self.treasury.is_none() {
            return Err(ConfigError::Required("treasury"));
        }
        Ok(())
    }

    /// Returns a copy with `command` applied and validated.
    ///
    /// `AdvanceEpoch` is engine state rather than configuration and leaves the
    /// copy unchanged.
    pub fn with(&self, command: &AdminCommand) -> Result<Self, ConfigError> {
        let mut next = self.clone();
        match command {
            AdminCommand::SetValidator { validator } => next.validator = Some(*validator),
            AdminCommand::SetTreasury { treasury } => next.treasury = Some(*treasury),
            AdminCommand::SetChainId { chain_id } => next.chain_id = *chain_id,
            AdminCommand::SetGroupLimit { kind, group, cap } => {
                next.hash_policy_mut(*kind).limits.groups.insert(*group, *cap);
            }
            AdminCommand::SetDetailLimit {
                kind,
                group,
                detail,
                cap,
            } => {
                next.hash_policy_mut(*kind)
                    .limits
                    .details
                    .insert((*group, *detail), *cap);
            }
            AdminCommand::SetSlotLimits { source, limits } => {
                *next.slot_limits_mut(*source)? = limits.clone();
            }
            AdminCommand::SetSlotOverride { source, index, cap } => {
                next.slot_limits_mut(*source)?.overrides.insert(*index, *cap);
            }
            AdminCommand::SetSeasonCap { kind, cap } => {
                next.hash_policy_mut(*kind).season_cap = *cap;
            }
            AdminCommand::SetRetireOnExhaustion { kind, enabled } => {
                next.hash_policy_mut(*kind).retire_on_exhaustion = *enabled;
            }
            AdminCommand::SetFusionCap { variant, cap } => next.fusion_limits.set(*variant, *cap),
            AdminCommand::SetRetireHashInputs { enabled } => next.retire_hash_inputs = *enabled,
            AdminCommand::SetRefreshPolicy { policy } => next.refresh_policy = *policy,
            AdminCommand::SetItemBurnQuantity { quantity } => next.item_burn_quantity = *quantity,
            AdminCommand::ReplaceConfig { config } => next = (**config).clone(),
            AdminCommand::AdvanceEpoch => {}
        }
        next.validate()?;
        Ok(next)
    }
}

// =============================================================================
// ADMIN COMMANDS
// =============================================================================

/// Privileged configuration changes.
///
/// Collaborator rebinding is a separate call because ports are not
/// serializable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AdminCommand {
    /// Trust proofs from `validator`.
    SetValidator {
        /// New validator identity.
        validator: Address,
    },
    /// Pay mint costs to `treasury`.
    SetTreasury {
        /// New treasury.
        treasury: Address,
    },
    /// Bind proofs to `chain_id`.
    SetChainId {
        /// New chain id.
        chain_id: ChainId,
    },
    /// Set a hash group cap.
    SetGroupLimit {
        /// Registry.
        kind: HashKind,
        /// Group id.
        group: u64,
        /// Cap.
        cap: u64,
    },
    /// Set a (group, detail) cap.
    SetDetailLimit {
        /// Registry.
        kind: HashKind,
        /// Group id.
        group: u64,
        /// Detail id.
        detail: u64,
        /// Cap.
        cap: u64,
    },
    /// Replace a slot-limit table.
    SetSlotLimits {
        /// External, chip or item source.
        source: SourceType,
        /// New table.
        limits: SlotLimits,
    },
    /// Override one slot's cap.
    SetSlotOverride {
        /// External, chip or item source.
        source: SourceType,
        /// Slot index.
        index: u64,
        /// Cap.
        cap: u64,
    },
    /// Set a hash registry's per-hash season cap.
    SetSeasonCap {
        /// Registry.
        kind: HashKind,
        /// Cap.
        cap: u64,
    },
    /// Toggle retiring a hash when its season counter is exhausted.
    SetRetireOnExhaustion {
        /// Registry.
        kind: HashKind,
        /// New setting.
        enabled: bool,
    },
    /// Set a fusion variant's cap.
    SetFusionCap {
        /// Variant.
        variant: FusionVariant,
        /// Cap.
        cap: u64,
    },
    /// Toggle retiring hash fusion inputs.
    SetRetireHashInputs {
        /// New setting.
        enabled: bool,
    },
    /// Choose the refresh counter rewrite.
    SetRefreshPolicy {
        /// New policy.
        policy: RefreshPolicy,
    },
    /// Units burned per item mint.
    SetItemBurnQuantity {
        /// Units, at least 1.
        quantity: u64,
    },
    /// Swap the whole configuration.
    ReplaceConfig {
        /// New configuration.
        config: Box<EngineConfig>,
    },
    /// Start the next season; every counter starts again from zero.
    AdvanceEpoch,
}
