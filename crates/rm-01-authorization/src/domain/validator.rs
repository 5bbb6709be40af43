//! # Authorization Check
//!
//! Pure verification of a payload/proof pair against a trusted identity.
//! There is no nonce: a proof verifies as often as it is presented, and
//! repetition is bounded only by the quotas downstream.

use super::ecdsa::recover_address;
use super::entities::AuthorizationProof;
use super::errors::AuthError;
use super::payload::AuthorizationPayload;
use shared_types::{Address, Timestamp};

/// Verifies `proof` over `payload` at time `now`.
///
/// Expiry is checked first so an expired proof never reaches recovery.
pub fn verify(
    payload: &AuthorizationPayload,
    proof: &AuthorizationProof,
    trusted: Address,
    now: Timestamp,
) -> Result<Address, AuthError> {
    if payload.expiry <= now {
        return Err(AuthError::ExpiredAuthorization {
            expiry: payload.expiry,
            now,
        });
    }

    let recovered = recover_address(&payload.signing_digest(), proof)
        .map_err(|cause| AuthError::unrecoverable(trusted, cause))?;

    if recovered != trusted {
        return Err(AuthError::UntrustedSigner {
            expected: trusted,
            recovered: Some(recovered),
            cause: None,
        });
    }

    Ok(recovered)
}
