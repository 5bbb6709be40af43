//! # Proof Replay
//!
//! A valid proof is bound to one `(source, cost, useIndex, chainId, expiry)`.
//! Proofs carry no nonce, so re-presenting the same proof is accepted until
//! the slot's quota runs out; every other reuse must fail.

#[cfg(test)]
mod tests {
    use crate::fixture::{TestForge, ALICE, MALLORY, TREASURY};
    use rm_02_monster_minting::prelude::*;
    use shared_types::{SourceType, U256};

    // =============================================================================
    // SAME PAYLOAD
    // =============================================================================

    #[tokio::test]
    async fn test_same_proof_bounded_by_quota() {
        let t = TestForge::new();
        t.fund(ALICE, 1_000);
        t.forge.external.assign(1, ALICE);
        let request = t.request(SourceType::ExternalEntry, 1, 10).await;

        for _ in 0..3 {
            t.service.mint(ALICE, request.clone()).await.unwrap();
        }
        assert!(matches!(
            t.service.mint(ALICE, request).await,
            Err(MintError::QuotaExceeded { limit: 3, .. })
        ));
        // Every accepted replay paid in full
        assert_eq!(t.balance(TREASURY), U256::from(30));
    }

    #[tokio::test]
    async fn test_stolen_proof_needs_ownership() {
        let t = TestForge::new();
        t.forge.external.assign(1, ALICE);
        let request = t.request(SourceType::ExternalEntry, 1, 0).await;

        assert_eq!(
            t.service.mint(MALLORY, request).await,
            Err(MintError::Ineligible(IneligibleReason::NotEntryOwner(1)))
        );
    }

    // =============================================================================
    // ALTERED FIELDS
    // =============================================================================

    #[tokio::test]
    async fn test_lowered_cost_rejected() {
        let t = TestForge::new();
        t.fund(ALICE, 1_000);
        t.forge.external.assign(1, ALICE);
        let mut request = t.request(SourceType::ExternalEntry, 1, 500).await;
        request.cost = U256::zero();

        assert!(matches!(
            t.service.mint(ALICE, request).await,
            Err(MintError::UntrustedSigner { .. })
        ));
        assert_eq!(t.balance(ALICE), U256::from(1_000));
    }

    #[tokio::test]
    async fn test_proof_moved_to_other_slot_rejected() {
        let t = TestForge::new();
        t.forge.external.assign(1, ALICE);
        t.forge.external.assign(2, ALICE);
        let mut request = t.request(SourceType::ExternalEntry, 1, 0).await;
        request.use_index = 2;

        assert!(matches!(
            t.service.mint(ALICE, request).await,
            Err(MintError::UntrustedSigner { .. })
        ));
    }

    #[tokio::test]
    async fn test_proof_moved_to_other_source_rejected() {
        let t = TestForge::new();
        t.forge.external.assign(4, ALICE);
        t.forge.genesis.issue(4, ALICE, 1, 1);
        let mut request = t.request(SourceType::ExternalEntry, 4, 0).await;
        request.source = SourceType::GenesisHash;

        assert!(matches!(
            t.service.mint(ALICE, request).await,
            Err(MintError::UntrustedSigner { .. })
        ));
    }

    #[tokio::test]
    async fn test_mint_proof_doubles_as_refresh_proof() {
        let t = TestForge::with_config(|c| c.external_limits = SlotLimits::uniform(1));
        t.fund(ALICE, 1_000);
        t.forge.external.assign(1, ALICE);
        let free = t.request(SourceType::ExternalEntry, 1, 0).await;
        t.service.mint(ALICE, free.clone()).await.unwrap();

        // The zero-cost mint proof covers the same payload a free refresh would,
        // so it is accepted; a priced refresh needs its own proof.
        assert_eq!(t.service.refresh_regeneration(ALICE, free).await, Ok(0));

        let mut cheap = t.request(SourceType::ExternalEntry, 1, 100).await;
        cheap.cost = U256::from(1);
        assert!(t.service.refresh_regeneration(ALICE, cheap).await.is_err());
    }

    // =============================================================================
    // CROSS-CHAIN
    // =============================================================================

    #[tokio::test]
    async fn test_chain_id_change_invalidates_proofs() {
        let t = TestForge::new();
        t.forge.external.assign(1, ALICE);
        let other_chain = t.request(SourceType::ExternalEntry, 1, 0).await;

        t.service
            .apply(&t.admin, &AdminCommand::SetChainId { chain_id: 8453 })
            .await
            .unwrap();
        assert!(matches!(
            t.service.mint(ALICE, other_chain).await,
            Err(MintError::UntrustedSigner { .. })
        ));

        let current = t.request(SourceType::ExternalEntry, 1, 0).await;
        t.service.mint(ALICE, current).await.unwrap();
    }

    #[tokio::test]
    async fn test_fusion_source_not_mintable() {
        let t = TestForge::new();
        let request = t.request(SourceType::Fusion, 0, 0).await;
        assert_eq!(
            t.service.mint(ALICE, request).await,
            Err(MintError::Ineligible(IneligibleReason::NotMintable(
                SourceType::Fusion
            )))
        );
    }
}
