//! # Domain Entities
//!
//! The recoverable signature carried by every priced mint request.

use super::errors::SignatureError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of a serialized proof: r (32) || s (32) || v (1).
pub const PROOF_LENGTH: usize = 65;

/// ECDSA signature on the secp256k1 curve.
///
/// Serialized as a `0x`-prefixed hex string of `r || s || v`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (0, 1, 27, or 28)
    pub v: u8,
}

/// The signature over an authorization payload's canonical encoding.
pub type AuthorizationProof = EcdsaSignature;

impl EcdsaSignature {
    /// Parses the 65-byte `r || s || v` form.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != PROOF_LENGTH {
            return Err(SignatureError::InvalidFormat);
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }

    /// Returns the 65-byte `r || s || v` form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; PROOF_LENGTH] {
        let mut out = [0u8; PROOF_LENGTH];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Parses a hex string, with or without `0x` prefix.
    pub fn from_hex(text: &str) -> Result<Self, SignatureError> {
        let digits = text.strip_prefix("0x").unwrap_or(text);
        let bytes = hex::decode(digits).map_err(|_| SignatureError::InvalidFormat)?;
        Self::from_slice(&bytes)
    }

    /// Renders the `0x`-prefixed hex form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

impl Serialize for EcdsaSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EcdsaSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}
