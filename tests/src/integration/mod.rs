//! # Integration Tests
//!
//! End-to-end seasons driven through `MintingService` over the in-memory
//! collaborators.

pub mod flows;
pub mod fusion;
pub mod runtime;
