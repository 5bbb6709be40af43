//! # Domain Invariants
//!
//! Conditions that must hold across every request.
//!
//! - INVARIANT-1: Counter never exceeds its cap after a successful operation
//! - INVARIANT-2: A rejected request leaves engine state unchanged
//! - INVARIANT-3: Fusion consumes two distinct inputs
//! - INVARIANT-4: The epoch never decreases

use super::journal::ForgeState;
use shared_types::{EntityId, Epoch};

/// INVARIANT-1: Quota bound.
///
/// Exceeding is rejected, never clamped, so a successful increment always
/// lands at or below the cap.
#[must_use]
pub const fn check_quota_bound(count: u64, limit: u64) -> bool {
    count <= limit
}

/// INVARIANT-2: No state change on rejection.
#[must_use]
pub fn check_rollback_invariant(before: &ForgeState, after: &ForgeState) -> bool {
    before == after
}

/// INVARIANT-3: Distinct fusion inputs.
///
/// Only meaningful when both inputs come from the same registry.
#[must_use]
pub const fn check_distinct_inputs(input_a: EntityId, input_b: EntityId) -> bool {
    input_a != input_b
}

/// INVARIANT-4: Epoch monotonicity.
#[must_use]
pub const fn check_epoch_advance(current: Epoch, next: Epoch) -> bool {
    next > current
}
