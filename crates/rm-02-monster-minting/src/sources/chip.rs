use super::{Eligibility, SourceAdapter, SourceContext};
use crate::domain::entities::QuotaKey;
use crate::errors::{IneligibleReason, MintError};
use shared_types::{Address, SourceType};

/// `useIndex` is a chip held by the caller; its sub-type selects the cap.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChipAdapter;

impl SourceAdapter for ChipAdapter {
    fn source(&self) -> SourceType {
        SourceType::ChipEntry
    }

    fn eligible(
        &self,
        owner: Address,
        use_index: u64,
        ctx: &SourceContext<'_>,
    ) -> Result<Eligibility, MintError> {
        let chip = ctx
            .collaborators
            .chips()?
            .chip_of(use_index)
            .ok_or(IneligibleReason::UnknownChip(use_index))?;
        if chip.owner != owner {
            return Err(IneligibleReason::NotChipOwner(use_index).into());
        }

        Ok(Eligibility::new(
            QuotaKey::mint(ctx.epoch, SourceType::ChipEntry, use_index),
            ctx.config.chip_limits.cap_for(chip.sub_type),
        ))
    }
}
