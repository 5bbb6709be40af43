use super::{Eligibility, FollowUp, SourceAdapter, SourceContext};
use crate::domain::entities::QuotaKey;
use crate::errors::{IneligibleReason, MintError, MissingConfig};
use shared_types::{Address, HashKind, SourceType};
use tracing::debug;

/// `useIndex` is a live genesis or general hash held by the caller.
///
/// The cap is the smallest of the per-hash season cap, the hash's group cap
/// and, when configured, its detail cap. A hash whose group has no cap cannot
/// mint at all.
#[derive(Debug, Clone, Copy)]
pub struct HashAdapter {
    kind: HashKind,
}

impl HashAdapter {
    /// Adapter for one hash registry.
    #[must_use]
    pub const fn new(kind: HashKind) -> Self {
        Self { kind }
    }
}

impl SourceAdapter for HashAdapter {
    fn source(&self) -> SourceType {
        self.kind.source()
    }

    fn eligible(
        &self,
        owner: Address,
        use_index: u64,
        ctx: &SourceContext<'_>,
    ) -> Result<Eligibility, MintError> {
        let kind = self.kind;
        let record = ctx
            .collaborators
            .hashes(kind)?
            .hash_of(use_index)
            .ok_or(IneligibleReason::UnknownHash { kind, id: use_index })?;

        if record.owner != owner {
            return Err(IneligibleReason::NotHashOwner { kind, id: use_index }.into());
        }
        if record.retired {
            return Err(IneligibleReason::HashRetired { kind, id: use_index }.into());
        }

        let policy = ctx.config.hash_policy(kind);
        let group_cap = policy.limits.group_cap(record.group).ok_or(
            MintError::ConfigurationMissing(MissingConfig::LimitGroup {
                kind,
                group: record.group,
            }),
        )?;
        let mut cap = policy.season_cap.min(group_cap);
        if let Some(detail_cap) = policy.limits.detail_cap(record.group, record.detail) {
            cap = cap.min(detail_cap);
        }

        debug!(
            ?kind,
            id = use_index,
            group = record.group,
            detail = record.detail,
            cap,
            "Hash eligible"
        );

        let mut eligibility =
            Eligibility::new(QuotaKey::mint(ctx.epoch, kind.source(), use_index), cap);
        if policy.retire_on_exhaustion {
            eligibility
                .follow_ups
                .push(FollowUp::RetireHashWhenExhausted { kind, id: use_index });
        }
        Ok(eligibility)
    }
}
