//! # Domain Layer
//!
//! Engine-owned state and pure rules. Nothing here talks to a collaborator.

pub mod entities;
pub mod invariants;
pub mod journal;
pub mod quota;
pub mod regeneration;

pub use entities::{
    ChipRecord, EntityOrigin, FusionRequest, HashRecord, MintRequest, QuotaBucket, QuotaKey,
    QuotaSlot,
};
pub use journal::{Effect, ForgeState, Journal, UndoEntry};
pub use quota::QuotaLedger;
pub use regeneration::{RegenerationBook, RegenerationKey};
