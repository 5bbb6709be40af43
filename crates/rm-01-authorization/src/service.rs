//! # Authorization Service
//!
//! Application service implementing `AuthorizationApi` for one trusted
//! validator identity. Delegates the cryptography to the domain layer and
//! logs each decision.

use crate::domain::entities::AuthorizationProof;
use crate::domain::errors::AuthError;
use crate::domain::payload::AuthorizationPayload;
use crate::domain::validator;
use crate::ports::inbound::AuthorizationApi;
use shared_types::{Address, Timestamp};
use tracing::{debug, warn};

/// Verifies proofs against a single configured validator identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationValidator {
    trusted: Address,
}

impl AuthorizationValidator {
    /// Create a validator trusting `trusted`.
    #[must_use]
    pub fn new(trusted: Address) -> Self {
        Self { trusted }
    }
}

impl AuthorizationApi for AuthorizationValidator {
    fn trusted_signer(&self) -> Address {
        self.trusted
    }

    fn verify(
        &self,
        payload: &AuthorizationPayload,
        proof: &AuthorizationProof,
        now: Timestamp,
    ) -> Result<Address, AuthError> {
        match validator::verify(payload, proof, self.trusted, now) {
            Ok(signer) => {
                debug!(
                    source = %payload.source,
                    use_index = payload.use_index,
                    %signer,
                    "Authorization accepted"
                );
                Ok(signer)
            }
            Err(e) => {
                warn!(source = %payload.source, use_index = payload.use_index, "Authorization rejected: {}", e);
                Err(e)
            }
        }
    }
}
