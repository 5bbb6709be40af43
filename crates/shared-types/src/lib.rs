//! # Shared Types Crate
//!
//! Primitives shared by the authorization, minting and runtime crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every cross-crate type is defined here.
//! - **Stable Discriminants**: `SourceType` values are signed over, so their
//!   numeric encoding never changes.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
