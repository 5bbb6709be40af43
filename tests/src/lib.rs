//! # Monster Forge Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks
//! └── src/
//!     ├── fixture.rs    # Service over in-memory collaborators
//!     ├── exploits/     # Attack simulations
//!     │   ├── forgery.rs    # Forged, expired and malleable proofs
//!     │   ├── replay.rs     # Proof reuse across slots, costs and chains
//!     │   └── rollback.rs   # Partial-commit and privilege attacks
//!     └── integration/  # End-to-end seasons through the service
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p rm-tests
//!
//! # By category
//! cargo test -p rm-tests integration::
//! cargo test -p rm-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p rm-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod exploits;
pub mod integration;
