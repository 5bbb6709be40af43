//! # Proof Forgery
//!
//! An attacker without the validator key tries to get a mint accepted.

#[cfg(test)]
mod tests {
    use crate::fixture::{signed_request, TestForge, ALICE, MALLORY, NOW, ROGUE_KEY};
    use rm_01_authorization::{EcdsaSignature, PayloadSigner, SignatureError};
    use rm_02_monster_minting::prelude::*;
    use shared_types::SourceType;

    /// secp256k1 group order, big-endian.
    const ORDER: [u8; 32] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
        0x41, 0x41,
    ];

    /// `n - s`, the other valid S for the same signature.
    fn flip_s(s: &[u8; 32]) -> [u8; 32] {
        let mut out = [0u8; 32];
        let mut borrow = 0i16;
        for i in (0..32).rev() {
            let mut diff = i16::from(ORDER[i]) - i16::from(s[i]) - borrow;
            borrow = if diff < 0 { 1 } else { 0 };
            if diff < 0 {
                diff += 256;
            }
            out[i] = diff as u8;
        }
        out
    }

    fn flip_v(v: u8) -> u8 {
        if v == 27 {
            28
        } else {
            27
        }
    }

    async fn assert_no_trace(t: &TestForge) {
        assert!(t.forge.events.is_empty());
        assert_eq!(t.forge.monsters.total_created(), 0);
        let key = QuotaKey::mint(0, SourceType::ExternalEntry, 1);
        assert_eq!(t.service.quota_count(key).await, 0);
    }

    // =============================================================================
    // UNTRUSTED KEYS
    // =============================================================================

    #[tokio::test]
    async fn test_self_signed_proof_rejected() {
        let t = TestForge::new();
        t.forge.external.assign(1, MALLORY);
        let rogue = PayloadSigner::from_hex(ROGUE_KEY).unwrap();

        let request = signed_request(
            &rogue,
            t.chain_id().await,
            SourceType::ExternalEntry,
            1,
            0,
            NOW + 60,
        );
        let err = t.service.mint(MALLORY, request).await.unwrap_err();
        assert!(matches!(
            err,
            MintError::UntrustedSigner { recovered: Some(r), .. } if r == rogue.address()
        ));
        assert_no_trace(&t).await;
    }

    #[tokio::test]
    async fn test_validator_rotation_revokes_old_proofs() {
        let t = TestForge::new();
        t.forge.external.assign(1, ALICE);
        let stale = t.request(SourceType::ExternalEntry, 1, 0).await;
        let rogue = PayloadSigner::from_hex(ROGUE_KEY).unwrap();

        t.service
            .apply(
                &t.admin,
                &AdminCommand::SetValidator {
                    validator: rogue.address(),
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            t.service.mint(ALICE, stale).await,
            Err(MintError::UntrustedSigner { .. })
        ));
    }

    // =============================================================================
    // TAMPERED SIGNATURES
    // =============================================================================

    #[tokio::test]
    async fn test_malleable_proof_rejected() {
        let t = TestForge::new();
        t.forge.external.assign(1, ALICE);
        let mut request = t.request(SourceType::ExternalEntry, 1, 0).await;
        request.proof = EcdsaSignature {
            r: request.proof.r,
            s: flip_s(&request.proof.s),
            v: flip_v(request.proof.v),
        };

        assert!(matches!(
            t.service.mint(ALICE, request).await,
            Err(MintError::UntrustedSigner {
                cause: Some(SignatureError::MalleableSignature),
                ..
            })
        ));
        assert_no_trace(&t).await;
    }

    #[tokio::test]
    async fn test_zeroed_proof_rejected() {
        let t = TestForge::new();
        t.forge.external.assign(1, ALICE);
        let mut request = t.request(SourceType::ExternalEntry, 1, 0).await;
        request.proof = EcdsaSignature {
            r: [0; 32],
            s: [0; 32],
            v: 27,
        };

        assert!(matches!(
            t.service.mint(ALICE, request).await,
            Err(MintError::UntrustedSigner {
                recovered: None,
                cause: Some(_),
                ..
            })
        ));
        assert_no_trace(&t).await;
    }

    #[tokio::test]
    async fn test_recovery_id_flip_rejected() {
        let t = TestForge::new();
        t.forge.external.assign(1, ALICE);
        let mut request = t.request(SourceType::ExternalEntry, 1, 0).await;
        request.proof.v = flip_v(request.proof.v);

        assert!(matches!(
            t.service.mint(ALICE, request).await,
            Err(MintError::UntrustedSigner { .. })
        ));
    }

    // =============================================================================
    // EXPIRY
    // =============================================================================

    #[tokio::test]
    async fn test_expiry_is_exclusive() {
        let t = TestForge::new();
        t.forge.external.assign(1, ALICE);
        let request = signed_request(
            &t.signer,
            t.chain_id().await,
            SourceType::ExternalEntry,
            1,
            0,
            NOW,
        );

        assert_eq!(
            t.service.mint(ALICE, request).await,
            Err(MintError::ExpiredAuthorization {
                expiry: NOW,
                now: NOW
            })
        );
    }

    #[tokio::test]
    async fn test_extending_expiry_breaks_proof() {
        let t = TestForge::new();
        t.forge.external.assign(1, ALICE);
        let mut request = t.request(SourceType::ExternalEntry, 1, 0).await;
        t.forge.clock.advance(7200);
        request.expiry = NOW + 86_400;

        assert!(matches!(
            t.service.mint(ALICE, request).await,
            Err(MintError::UntrustedSigner { .. })
        ));
        assert_no_trace(&t).await;
    }
}
