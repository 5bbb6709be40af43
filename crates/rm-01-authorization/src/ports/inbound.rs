//! # Inbound Ports (Driving Ports / API)

use crate::domain::entities::AuthorizationProof;
use crate::domain::errors::AuthError;
use crate::domain::payload::AuthorizationPayload;
use shared_types::{Address, Timestamp};

/// Authorization check consumed by the minting orchestrator.
///
/// Implementations must be pure: verifying the same pair twice yields the
/// same answer and records nothing.
pub trait AuthorizationApi: Send + Sync {
    /// Identity whose proofs are accepted.
    fn trusted_signer(&self) -> Address;

    /// Verifies the pair at `now`, returning the recovered identity.
    ///
    /// # Errors
    /// - `ExpiredAuthorization` if `payload.expiry <= now`
    /// - `UntrustedSigner` if the proof is malformed or recovers elsewhere
    fn verify(
        &self,
        payload: &AuthorizationPayload,
        proof: &AuthorizationProof,
        now: Timestamp,
    ) -> Result<Address, AuthError>;
}
