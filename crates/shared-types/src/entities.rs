//! # Core Domain Entities
//!
//! Primitives shared by every Monster Forge crate.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`, `Hash`
//! - **Scalars**: `EntityId`, `ItemId`, `Epoch`, `Timestamp`, `ChainId`, `U256`
//! - **Discriminants**: `SourceType`, `FusionVariant`, `HashKind`

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::TypeError;

// Re-export U256 from primitive-types for currency amounts across all crates
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte hash (Keccak-256).
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style account identity.
///
/// Serialized as a `0x`-prefixed lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address (0x0000...0000).
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 20 {
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| TypeError::InvalidAddress(s.to_string()))?;
        Self::from_slice(&bytes).ok_or_else(|| TypeError::InvalidAddress(s.to_string()))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// CLUSTER B: SCALARS
// =============================================================================

/// Identifier of a unique entity (monster, hash, chip or external entry).
pub type EntityId = u64;

/// Identifier of a fungible auxiliary item kind.
pub type ItemId = u64;

/// Administrative season counter scoping every quota.
pub type Epoch = u64;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Chain identifier bound into every authorization payload.
pub type ChainId = u64;

// =============================================================================
// CLUSTER C: DISCRIMINANTS
// =============================================================================

/// Category of resource authorizing a mint.
///
/// The discriminants are part of the signed payload encoding and MUST NOT be
/// renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum SourceType {
    /// An entry held in an external collection.
    ExternalEntry = 0,
    /// A genesis hash entity.
    GenesisHash = 1,
    /// A general hash entity.
    GeneralHash = 2,
    /// A chip entity.
    ChipEntry = 3,
    /// A consumable regeneration item.
    RegenerationItem = 4,
    /// The one-shot free mint.
    Free = 5,
    /// Output of a fusion.
    Fusion = 6,
}

impl SourceType {
    /// All source types in discriminant order.
    pub const ALL: [SourceType; 7] = [
        SourceType::ExternalEntry,
        SourceType::GenesisHash,
        SourceType::GeneralHash,
        SourceType::ChipEntry,
        SourceType::RegenerationItem,
        SourceType::Free,
        SourceType::Fusion,
    ];

    /// Wire discriminant.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Sources whose slot can be regenerated with `refresh_regeneration`.
    #[must_use]
    pub const fn is_item_bound(self) -> bool {
        matches!(
            self,
            SourceType::ExternalEntry
                | SourceType::GenesisHash
                | SourceType::GeneralHash
                | SourceType::ChipEntry
        )
    }

    /// Sources reachable through the signed `mint` entry point.
    #[must_use]
    pub const fn is_mintable(self) -> bool {
        !matches!(self, SourceType::Fusion)
    }
}

impl TryFrom<u8> for SourceType {
    type Error = TypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(TypeError::UnknownSourceType(value))
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceType::ExternalEntry => "EXTERNAL_ENTRY",
            SourceType::GenesisHash => "GENESIS_HASH",
            SourceType::GeneralHash => "GENERAL_HASH",
            SourceType::ChipEntry => "CHIP_ENTRY",
            SourceType::RegenerationItem => "REGENERATION_ITEM",
            SourceType::Free => "FREE",
            SourceType::Fusion => "FUSION",
        };
        f.write_str(name)
    }
}

/// The two hash-entity registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashKind {
    /// Genesis hash registry.
    Genesis,
    /// General hash registry.
    General,
}

impl HashKind {
    /// The mint source backed by this registry.
    #[must_use]
    pub const fn source(self) -> SourceType {
        match self {
            HashKind::Genesis => SourceType::GenesisHash,
            HashKind::General => SourceType::GeneralHash,
        }
    }
}

/// Fusion flavours, each with its own limit counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionVariant {
    /// Two monsters.
    Monster,
    /// Two genesis hashes.
    GenesisHash,
    /// Two general hashes.
    GeneralHash,
    /// One genesis hash and one general hash.
    MultipleHash,
}

impl fmt::Display for FusionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FusionVariant::Monster => "monster",
            FusionVariant::GenesisHash => "genesis_hash",
            FusionVariant::GeneralHash => "general_hash",
            FusionVariant::MultipleHash => "multiple_hash",
        };
        f.write_str(name)
    }
}

// =============================================================================
// TESTS
// =============================================================================
