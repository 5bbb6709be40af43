//! # Payload Signer
//!
//! Issues authorization proofs. Used by operator tooling and tests; the
//! minting engine itself only ever verifies.

use crate::domain::ecdsa::{address_from_pubkey, sign_digest};
use crate::domain::entities::AuthorizationProof;
use crate::domain::errors::SignatureError;
use crate::domain::payload::AuthorizationPayload;
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::rand_core::CryptoRngCore;
use shared_types::Address;
use zeroize::Zeroize;

/// A secp256k1 key that signs authorization payloads.
///
/// The inner key is zeroized on drop by `k256`.
pub struct PayloadSigner {
    key: SigningKey,
    address: Address,
}

impl PayloadSigner {
    /// Builds a signer from a 32-byte secret scalar.
    pub fn from_slice(secret: &[u8]) -> Result<Self, SignatureError> {
        let key = SigningKey::from_slice(secret).map_err(|_| SignatureError::InvalidSigningKey)?;
        Ok(Self::from_key(key))
    }

    /// Builds a signer from a hex secret, with or without `0x` prefix.
    pub fn from_hex(secret: &str) -> Result<Self, SignatureError> {
        let digits = secret.strip_prefix("0x").unwrap_or(secret);
        let mut bytes = hex::decode(digits).map_err(|_| SignatureError::InvalidSigningKey)?;
        let signer = Self::from_slice(&bytes);
        bytes.zeroize();
        signer
    }

    /// Generates a fresh random key.
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        Self::from_key(SigningKey::random(rng))
    }

    fn from_key(key: SigningKey) -> Self {
        let address = address_from_pubkey(key.verifying_key());
        Self { key, address }
    }

    /// Identity a verifier should trust for this signer.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Signs the payload's personal-sign digest with a low-S proof.
    pub fn sign(&self, payload: &AuthorizationPayload) -> Result<AuthorizationProof, SignatureError> {
        sign_digest(&payload.signing_digest(), &self.key)
    }
}

impl std::fmt::Debug for PayloadSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
