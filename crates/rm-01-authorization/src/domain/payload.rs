//! # Authorization Payload
//!
//! The tuple a validator signs to authorize one priced mint or refresh, and its
//! canonical 129-byte encoding.
//!
//! ```text
//! [0]      sourceType
//! [1..33]  cost      (big-endian)
//! [33..65] useIndex  (big-endian)
//! [65..97] chainId   (big-endian)
//! [97..129] expiry   (big-endian)
//! ```

use super::ecdsa::{keccak256, personal_sign_digest};
use serde::{Deserialize, Serialize};
use shared_types::{ChainId, Hash, SourceType, Timestamp, U256};

/// Width of one big-endian word in the encoding.
const WORD: usize = 32;

/// Encoded payload length: one discriminant byte plus four words.
pub const ENCODED_LENGTH: usize = 1 + 4 * WORD;

/// What a validator authorizes: a source, a price, a slot, a chain and a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationPayload {
    /// Mint source being authorized.
    pub source: SourceType,
    /// Currency cost charged on success.
    pub cost: U256,
    /// Source-specific slot (entity id, item id).
    pub use_index: u64,
    /// Chain the proof is valid on.
    pub chain_id: ChainId,
    /// Unix seconds after which the proof is rejected.
    pub expiry: Timestamp,
}

impl AuthorizationPayload {
    /// Canonical encoding, see module docs.
    #[must_use]
    pub fn encode(&self) -> [u8; ENCODED_LENGTH] {
        let mut out = [0u8; ENCODED_LENGTH];
        out[0] = self.source.as_u8();

        let mut offset = 1;
        for word in [
            self.cost,
            U256::from(self.use_index),
            U256::from(self.chain_id),
            U256::from(self.expiry),
        ] {
            word.to_big_endian(&mut out[offset..offset + WORD]);
            offset += WORD;
        }
        out
    }

    /// Keccak-256 of the canonical encoding.
    #[must_use]
    pub fn payload_hash(&self) -> Hash {
        keccak256(&self.encode())
    }

    /// The digest actually signed: the personal-sign wrapping of `payload_hash`.
    #[must_use]
    pub fn signing_digest(&self) -> Hash {
        personal_sign_digest(&self.payload_hash())
    }
}
