use super::{Eligibility, FollowUp, SourceAdapter, SourceContext};
use crate::domain::entities::QuotaKey;
use crate::errors::{IneligibleReason, MintError};
use shared_types::{Address, SourceType};
use tracing::debug;

/// The caller holds item `useIndex`; the configured quantity is burned after
/// the quota is taken.
///
/// Only a zero balance is rejected here. A balance below the burn quantity
/// surfaces as `InsufficientItemBalance` from the burn itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemAdapter;

impl SourceAdapter for ItemAdapter {
    fn source(&self) -> SourceType {
        SourceType::RegenerationItem
    }

    fn eligible(
        &self,
        owner: Address,
        use_index: u64,
        ctx: &SourceContext<'_>,
    ) -> Result<Eligibility, MintError> {
        let balance = ctx.collaborators.items()?.balance_of(owner, use_index);
        if balance == 0 {
            return Err(IneligibleReason::NoItemBalance(use_index).into());
        }
        debug!(item = use_index, balance, "Item eligible");

        let mut eligibility = Eligibility::new(
            QuotaKey::mint(ctx.epoch, SourceType::RegenerationItem, use_index),
            ctx.config.item_limits.cap_for(use_index),
        );
        eligibility.follow_ups.push(FollowUp::BurnItem {
            item: use_index,
            amount: ctx.config.item_burn_quantity,
        });
        Ok(eligibility)
    }
}
