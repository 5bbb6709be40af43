//! # Error Types
//!
//! Conversion errors for the shared primitives.

use thiserror::Error;

/// Errors raised while decoding shared primitives from external input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    /// Discriminant does not name a known source type.
    #[error("Unknown source type discriminant: {0}")]
    UnknownSourceType(u8),

    /// Text is not a 20-byte hex address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
