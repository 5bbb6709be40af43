//! # Authorization Subsystem (RM-01)
//!
//! Decides whether a priced mint or refresh request was sanctioned by the
//! configured validator.
//!
//! ## Architecture
//!
//! | Layer | Module | Contents |
//! |-------|--------|----------|
//! | Domain | `domain/` | secp256k1 recovery, payload encoding, the pure check |
//! | Ports | `ports/` | `AuthorizationApi` |
//! | Service | `service.rs` | `AuthorizationValidator` |
//! | Tooling | `signer.rs` | `PayloadSigner` for issuing proofs |
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: high-S proofs are rejected
//! - **Chain Binding**: the chain id is part of every signed payload
//! - **Replay**: proofs carry no nonce. A proof is valid until its expiry and
//!   may be presented any number of times; the minting engine's quotas are the
//!   only bound on repetition.

#![warn(missing_docs)]

pub mod domain;
pub mod ports;
pub mod service;
pub mod signer;

// Re-export public API
pub use domain::ecdsa::{address_from_pubkey, keccak256, personal_sign_digest, recover_address};
pub use domain::entities::{AuthorizationProof, EcdsaSignature, PROOF_LENGTH};
pub use domain::errors::{AuthError, SignatureError};
pub use domain::payload::{AuthorizationPayload, ENCODED_LENGTH};
pub use ports::inbound::AuthorizationApi;
pub use service::AuthorizationValidator;
pub use signer::PayloadSigner;
