//! # Authorization Errors
//!
//! Error types for signature recovery and authorization checks.

use shared_types::{Address, Timestamp};
use thiserror::Error;

/// Errors that can occur while recovering a signer from a proof.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The proof format is invalid (wrong length, out-of-range scalar)
    #[error("Invalid signature format")]
    InvalidFormat,

    /// Signature has high S value (EIP-2 malleability protection)
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Invalid recovery ID (v must be 0, 1, 27, or 28)
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// Failed to recover public key from signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// Secret key bytes do not form a valid secp256k1 scalar
    #[error("Invalid signing key")]
    InvalidSigningKey,
}

/// Rejections produced by the authorization validator.
///
/// Both variants are terminal for the request that carried the proof.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// `expiry <= now` at verification time.
    #[error("Authorization expired at {expiry} (now {now})")]
    ExpiredAuthorization {
        /// Expiry carried in the payload.
        expiry: Timestamp,
        /// Verification time.
        now: Timestamp,
    },

    /// The proof does not recover to the configured validator identity.
    #[error("Untrusted signer: expected {expected}, recovered {recovered:?}")]
    UntrustedSigner {
        /// Configured validator identity.
        expected: Address,
        /// Recovered identity, if recovery succeeded at all.
        recovered: Option<Address>,
        /// Underlying recovery failure, if any.
        cause: Option<SignatureError>,
    },
}

impl AuthError {
    /// Builds an `UntrustedSigner` from a failed recovery.
    pub(crate) fn unrecoverable(expected: Address, cause: SignatureError) -> Self {
        Self::UntrustedSigner {
            expected,
            recovered: None,
            cause: Some(cause),
        }
    }
}
