use super::{Eligibility, SourceAdapter, SourceContext};
use crate::domain::entities::QuotaKey;
use crate::errors::{IneligibleReason, MintError};
use shared_types::{Address, SourceType};
use tracing::debug;

/// `useIndex` is an entry of the external collection held by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalEntryAdapter;

impl SourceAdapter for ExternalEntryAdapter {
    fn source(&self) -> SourceType {
        SourceType::ExternalEntry
    }

    fn eligible(
        &self,
        owner: Address,
        use_index: u64,
        ctx: &SourceContext<'_>,
    ) -> Result<Eligibility, MintError> {
        let holder = ctx.collaborators.external()?.owner_of(use_index);
        if holder != Some(owner) {
            debug!(use_index, ?holder, "External entry not held by caller");
            return Err(IneligibleReason::NotEntryOwner(use_index).into());
        }

        let cap = ctx.config.external_limits.cap_for(use_index);
        Ok(Eligibility::new(
            QuotaKey::mint(ctx.epoch, SourceType::ExternalEntry, use_index),
            cap,
        ))
    }
}
