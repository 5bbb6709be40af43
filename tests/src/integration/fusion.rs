//! # Fusion Flows
//!
//! All four fusion variants through the service, with item burns, input
//! retirement and per-season caps.

#[cfg(test)]
mod tests {
    use crate::fixture::{TestForge, ALICE, BOB};
    use rm_02_monster_minting::prelude::*;
    use shared_types::FusionVariant;

    fn request(a: u64, b: u64) -> FusionRequest {
        FusionRequest::new(ALICE, a, b)
    }

    async fn two_monsters(t: &TestForge) -> (u64, u64) {
        let a = t.service.mint_free(ALICE).await.unwrap();
        let b = t.service.mint_free(BOB).await.unwrap();
        t.forge.monsters.transfer(b, ALICE).unwrap();
        (a, b)
    }

    // =============================================================================
    // MONSTER FUSION
    // =============================================================================

    #[tokio::test]
    async fn test_monster_fusion_retires_inputs() {
        let t = TestForge::new();
        let (a, b) = two_monsters(&t).await;

        let child = t.service.fuse_entities(ALICE, request(a, b)).await.unwrap();

        assert_eq!(t.service.tokens_of(ALICE).await.unwrap(), vec![child]);
        assert_eq!(t.forge.monsters.owner_of(a), None);
        assert_eq!(
            t.forge.monsters.record(child).unwrap().origin,
            EntityOrigin::Fusion {
                variant: FusionVariant::Monster,
                input_a: a,
                input_b: b
            }
        );
    }

    #[tokio::test]
    async fn test_monster_fusion_cap_per_owner() {
        let t = TestForge::with_config(|c| c.fusion_limits.monster = 1);
        let (a, b) = two_monsters(&t).await;
        let child = t.service.fuse_entities(ALICE, request(a, b)).await.unwrap();

        // A second pair fails on the owner's season counter
        let origin = EntityOrigin::Mint {
            source: shared_types::SourceType::Free,
            use_index: 0,
        };
        let c = t.forge.monsters.create(ALICE, origin).unwrap();
        assert!(matches!(
            t.service.fuse_entities(ALICE, request(child, c)).await,
            Err(MintError::QuotaExceeded { limit: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_fusion_burns_items() {
        let t = TestForge::new();
        let (a, b) = two_monsters(&t).await;
        t.forge.items.mint(ALICE, 1, 4).unwrap();
        t.forge.items.mint(ALICE, 2, 1).unwrap();

        let mut req = request(a, b);
        req.item_ids = vec![1, 2, 1];
        req.item_amounts = vec![2, 1, 1];
        t.service.fuse_entities(ALICE, req).await.unwrap();

        assert_eq!(t.forge.items.balance_of(ALICE, 1), 1);
        assert_eq!(t.forge.items.balance_of(ALICE, 2), 0);
    }

    #[tokio::test]
    async fn test_fusion_item_shortfall_rejected_before_effects() {
        let t = TestForge::new();
        let (a, b) = two_monsters(&t).await;
        t.forge.items.mint(ALICE, 1, 2).unwrap();

        let mut req = request(a, b);
        req.item_ids = vec![1, 1];
        req.item_amounts = vec![2, 1];
        assert_eq!(
            t.service.fuse_entities(ALICE, req).await,
            Err(MintError::InsufficientItemBalance {
                item: 1,
                required: 3,
                available: 2
            })
        );
        assert_eq!(t.forge.items.balance_of(ALICE, 1), 2);
        assert_eq!(t.forge.monsters.owner_of(a), Some(ALICE));
    }

    // =============================================================================
    // HASH FUSION
    // =============================================================================

    #[tokio::test]
    async fn test_genesis_fusion_counts_each_input() {
        let t = TestForge::with_config(|c| c.fusion_limits.genesis_hash = 1);
        t.forge.genesis.issue(1, ALICE, 1, 1);
        t.forge.genesis.issue(2, ALICE, 1, 1);
        t.forge.genesis.issue(3, ALICE, 1, 1);

        t.service.fuse_genesis_hashes(ALICE, request(1, 2)).await.unwrap();
        // Hashes stay live, so hash 2 can be presented again but its counter is spent
        assert!(!t.forge.genesis.hash_of(1).unwrap().retired);
        assert!(matches!(
            t.service.fuse_genesis_hashes(ALICE, request(3, 2)).await,
            Err(MintError::QuotaExceeded { .. })
        ));
    }

    #[tokio::test]
    async fn test_general_fusion_retires_when_configured() {
        let t = TestForge::with_config(|c| c.retire_hash_inputs = true);
        t.forge.general.issue(1, ALICE, 1, 1);
        t.forge.general.issue(2, ALICE, 1, 1);

        t.service.fuse_general_hashes(ALICE, request(1, 2)).await.unwrap();
        assert!(t.forge.general.hash_of(1).unwrap().retired);
        assert_eq!(
            t.service.fuse_general_hashes(ALICE, request(1, 2)).await,
            Err(MintError::Ineligible(IneligibleReason::HashRetired {
                kind: shared_types::HashKind::General,
                id: 1
            }))
        );
    }

    #[tokio::test]
    async fn test_multiple_hash_fusion_same_ids_allowed() {
        let t = TestForge::new();
        t.forge.genesis.issue(5, ALICE, 1, 1);
        t.forge.general.issue(5, ALICE, 1, 1);

        let child = t.service.fuse_multiple_hashes(ALICE, request(5, 5)).await.unwrap();
        assert_eq!(t.service.tokens_of(ALICE).await.unwrap(), vec![child]);
        assert_eq!(
            t.service
                .quota_count(QuotaKey::fusion(
                    0,
                    FusionVariant::MultipleHash,
                    QuotaSlot::Pair(5, 5)
                ))
                .await,
            1
        );
    }

    #[tokio::test]
    async fn test_fusion_cap_resets_next_epoch() {
        let t = TestForge::with_config(|c| c.fusion_limits.multiple_hash = 1);
        t.forge.genesis.issue(1, ALICE, 1, 1);
        t.forge.general.issue(2, ALICE, 1, 1);

        t.service.fuse_multiple_hashes(ALICE, request(1, 2)).await.unwrap();
        assert!(t.service.fuse_multiple_hashes(ALICE, request(1, 2)).await.is_err());

        t.service
            .apply(&t.admin, &AdminCommand::AdvanceEpoch)
            .await
            .unwrap();
        t.service.fuse_multiple_hashes(ALICE, request(1, 2)).await.unwrap();
    }
}
