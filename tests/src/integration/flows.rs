//! # Mint Flows
//!
//! Seasons of signed, free and item-backed mints through the service:
//!
//! 1. **Paid external mints**: quota exhaustion, refresh and re-mint
//! 2. **Hash sources**: group and detail caps, retirement on exhaustion
//! 3. **Chips and items**: sub-type caps and item burns
//! 4. **Seasons**: epoch advance opens fresh counters

#[cfg(test)]
mod tests {
    use crate::fixture::{TestForge, ALICE, BOB, NOW, TREASURY};
    use rm_02_monster_minting::prelude::*;
    use shared_types::{HashKind, SourceType, U256};

    // =============================================================================
    // PAID EXTERNAL MINTS
    // =============================================================================

    #[tokio::test]
    async fn test_external_season_with_refresh() {
        let t = TestForge::new();
        t.fund(ALICE, 1_000);
        t.forge.external.assign(7, ALICE);

        for _ in 0..3 {
            let request = t.request(SourceType::ExternalEntry, 7, 100).await;
            t.service.mint(ALICE, request).await.unwrap();
        }
        let slot = RegenerationKey {
            owner: ALICE,
            source: SourceType::ExternalEntry,
            use_index: 7,
        };
        assert_eq!(t.service.regeneration_state(slot).await, Some(false));

        let request = t.request(SourceType::ExternalEntry, 7, 100).await;
        assert!(matches!(
            t.service.mint(ALICE, request).await,
            Err(MintError::QuotaExceeded { limit: 3, .. })
        ));

        let request = t.request(SourceType::ExternalEntry, 7, 50).await;
        assert_eq!(t.service.refresh_regeneration(ALICE, request).await, Ok(0));
        assert_eq!(t.service.regeneration_state(slot).await, Some(true));

        let request = t.request(SourceType::ExternalEntry, 7, 100).await;
        t.service.mint(ALICE, request).await.unwrap();

        assert_eq!(t.balance(TREASURY), U256::from(450));
        assert_eq!(t.balance(ALICE), U256::from(550));
        assert_eq!(t.service.tokens_of(ALICE).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_refresh_before_exhaustion_rejected() {
        let t = TestForge::new();
        t.forge.external.assign(1, ALICE);
        let request = t.request(SourceType::ExternalEntry, 1, 0).await;
        t.service.mint(ALICE, request).await.unwrap();

        let request = t.request(SourceType::ExternalEntry, 1, 0).await;
        assert_eq!(
            t.service.refresh_regeneration(ALICE, request).await,
            Err(MintError::ItemInUse {
                source_type: SourceType::ExternalEntry,
                use_index: 1
            })
        );
    }

    #[tokio::test]
    async fn test_refresh_policy_reset() {
        let t = TestForge::with_config(|c| {
            c.refresh_policy = RefreshPolicy::Reset;
            c.external_limits = SlotLimits::uniform(2);
        });
        t.forge.external.assign(1, ALICE);
        for _ in 0..2 {
            let request = t.request(SourceType::ExternalEntry, 1, 0).await;
            t.service.mint(ALICE, request).await.unwrap();
        }

        let request = t.request(SourceType::ExternalEntry, 1, 0).await;
        assert_eq!(t.service.refresh_regeneration(ALICE, request).await, Ok(0));
        let key = QuotaKey::mint(0, SourceType::ExternalEntry, 1);
        assert_eq!(t.service.quota_count(key).await, 0);
    }

    #[tokio::test]
    async fn test_free_mint_once_per_owner() {
        let t = TestForge::new();
        t.service.mint_free(ALICE).await.unwrap();
        assert!(t.service.has_claimed_free(ALICE).await);
        assert_eq!(
            t.service.mint_free(ALICE).await,
            Err(MintError::AlreadyClaimed(ALICE))
        );
        t.service.mint_free(BOB).await.unwrap();

        t.service
            .apply(&t.admin, &AdminCommand::AdvanceEpoch)
            .await
            .unwrap();
        assert_eq!(
            t.service.mint_free(ALICE).await,
            Err(MintError::AlreadyClaimed(ALICE))
        );
    }

    // =============================================================================
    // HASH SOURCES
    // =============================================================================

    #[tokio::test]
    async fn test_genesis_hash_detail_cap() {
        let t = TestForge::with_config(|c| {
            c.genesis.limits.details.insert((2, 1), 2);
        });
        t.forge.genesis.issue(40, ALICE, 2, 1);

        for _ in 0..2 {
            let request = t.request(SourceType::GenesisHash, 40, 0).await;
            t.service.mint(ALICE, request).await.unwrap();
        }
        let request = t.request(SourceType::GenesisHash, 40, 0).await;
        assert!(matches!(
            t.service.mint(ALICE, request).await,
            Err(MintError::QuotaExceeded { limit: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_genesis_season_cap_then_refresh() {
        let t = TestForge::new();
        t.forge.genesis.issue(12, ALICE, 3, 5);

        for _ in 0..5 {
            let request = t.request(SourceType::GenesisHash, 12, 0).await;
            t.service.mint(ALICE, request).await.unwrap();
        }
        let request = t.request(SourceType::GenesisHash, 12, 0).await;
        assert!(matches!(
            t.service.mint(ALICE, request).await,
            Err(MintError::QuotaExceeded { limit: 5, .. })
        ));
        // Genesis hashes stay live after exhaustion
        assert!(!t.forge.genesis.hash_of(12).unwrap().retired);

        let request = t.request(SourceType::GenesisHash, 12, 0).await;
        assert_eq!(t.service.refresh_regeneration(ALICE, request).await, Ok(0));
        let request = t.request(SourceType::GenesisHash, 12, 0).await;
        t.service.mint(ALICE, request).await.unwrap();
    }

    #[tokio::test]
    async fn test_hash_without_group_cap_cannot_mint() {
        let t = TestForge::new();
        t.forge.genesis.issue(41, ALICE, 99, 1);
        let request = t.request(SourceType::GenesisHash, 41, 0).await;
        assert_eq!(
            t.service.mint(ALICE, request).await,
            Err(MintError::ConfigurationMissing(MissingConfig::LimitGroup {
                kind: HashKind::Genesis,
                group: 99
            }))
        );
    }

    #[tokio::test]
    async fn test_general_hash_retires_when_exhausted() {
        let t = TestForge::new();
        t.forge.general.issue(9, ALICE, 1, 1);

        for _ in 0..3 {
            let request = t.request(SourceType::GeneralHash, 9, 0).await;
            t.service.mint(ALICE, request).await.unwrap();
        }
        assert!(t.forge.general.hash_of(9).unwrap().retired);
        assert_eq!(t.forge.general.balance_of(ALICE), 0);

        // Retired hashes cannot be refreshed
        let request = t.request(SourceType::GeneralHash, 9, 0).await;
        assert_eq!(
            t.service.refresh_regeneration(ALICE, request).await,
            Err(MintError::Ineligible(IneligibleReason::HashRetired {
                kind: HashKind::General,
                id: 9
            }))
        );
    }

    #[tokio::test]
    async fn test_hash_owned_by_other_rejected() {
        let t = TestForge::new();
        t.forge.genesis.issue(5, BOB, 1, 1);
        let request = t.request(SourceType::GenesisHash, 5, 0).await;
        assert_eq!(
            t.service.mint(ALICE, request).await,
            Err(MintError::Ineligible(IneligibleReason::NotHashOwner {
                kind: HashKind::Genesis,
                id: 5
            }))
        );
    }

    // =============================================================================
    // CHIPS AND ITEMS
    // =============================================================================

    #[tokio::test]
    async fn test_chip_cap_follows_sub_type() {
        let t = TestForge::new();
        t.service
            .apply(
                &t.admin,
                &AdminCommand::SetSlotOverride {
                    source: SourceType::ChipEntry,
                    index: 4,
                    cap: 1,
                },
            )
            .await
            .unwrap();
        t.forge.chips.issue(100, ALICE, 4);
        t.forge.chips.issue(101, ALICE, 2);

        let request = t.request(SourceType::ChipEntry, 100, 0).await;
        t.service.mint(ALICE, request).await.unwrap();
        let request = t.request(SourceType::ChipEntry, 100, 0).await;
        assert!(matches!(
            t.service.mint(ALICE, request).await,
            Err(MintError::QuotaExceeded { limit: 1, .. })
        ));

        for _ in 0..3 {
            let request = t.request(SourceType::ChipEntry, 101, 0).await;
            t.service.mint(ALICE, request).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_item_mint_burns_units() {
        let t = TestForge::with_config(|c| c.item_burn_quantity = 2);
        t.forge.items.mint(ALICE, 3, 5).unwrap();

        t.service.mint_from_item(ALICE, 3).await.unwrap();
        t.service.mint_from_item(ALICE, 3).await.unwrap();
        assert_eq!(t.forge.items.balance_of(ALICE, 3), 1);

        assert_eq!(
            t.service.mint_from_item(ALICE, 3).await,
            Err(MintError::InsufficientItemBalance {
                item: 3,
                required: 2,
                available: 1
            })
        );
        assert_eq!(t.forge.items.balance_of(ALICE, 3), 1);
        assert_eq!(t.service.tokens_of(ALICE).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_item_source_through_signed_mint() {
        let t = TestForge::new();
        t.forge.items.mint(ALICE, 8, 1).unwrap();
        let request = t.request(SourceType::RegenerationItem, 8, 0).await;
        t.service.mint(ALICE, request).await.unwrap();
        assert_eq!(t.forge.items.balance_of(ALICE, 8), 0);
    }

    // =============================================================================
    // SEASONS
    // =============================================================================

    #[tokio::test]
    async fn test_epoch_advance_opens_fresh_counters() {
        let t = TestForge::with_config(|c| c.external_limits = SlotLimits::uniform(1));
        t.forge.external.assign(2, ALICE);

        let request = t.request(SourceType::ExternalEntry, 2, 0).await;
        t.service.mint(ALICE, request).await.unwrap();
        let request = t.request(SourceType::ExternalEntry, 2, 0).await;
        assert!(t.service.mint(ALICE, request).await.is_err());

        t.service
            .apply(&t.admin, &AdminCommand::AdvanceEpoch)
            .await
            .unwrap();
        assert_eq!(t.service.current_epoch().await, 1);

        let request = t.request(SourceType::ExternalEntry, 2, 0).await;
        t.service.mint(ALICE, request).await.unwrap();
        assert_eq!(
            t.service
                .quota_count(QuotaKey::mint(0, SourceType::ExternalEntry, 2))
                .await,
            1
        );
        assert_eq!(
            t.service
                .quota_count(QuotaKey::mint(1, SourceType::ExternalEntry, 2))
                .await,
            1
        );
        assert!(t
            .forge
            .events
            .events()
            .contains(&ForgeEvent::EpochAdvanced { epoch: 1 }));
    }

    #[tokio::test]
    async fn test_treasury_rotation_redirects_payments() {
        let t = TestForge::new();
        let vault = shared_types::Address::new([0x99; 20]);
        t.fund(ALICE, 100);
        t.forge.external.assign(1, ALICE);

        t.service
            .apply(&t.admin, &AdminCommand::SetTreasury { treasury: vault })
            .await
            .unwrap();
        let request = t.request(SourceType::ExternalEntry, 1, 60).await;
        t.service.mint(ALICE, request).await.unwrap();

        assert_eq!(t.balance(vault), U256::from(60));
        assert_eq!(t.balance(TREASURY), U256::zero());
    }
}
