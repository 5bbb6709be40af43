//! # Exploit Simulations
//!
//! Attacks against the minting service, each asserting that the attack is
//! rejected and leaves no trace.
//!
//! | Module | Attack surface |
//! |--------|----------------|
//! | `forgery` | proofs from untrusted keys, tampered or malleable signatures, expiry |
//! | `replay` | reusing a valid proof for other slots, costs, sources or chains |
//! | `rollback` | partial commits, concurrent slot races, privilege escalation |

pub mod forgery;
pub mod replay;
