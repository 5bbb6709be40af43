//! # Ports Layer
//!
//! - **Inbound (Driving)**: API that the minting engine calls

pub mod inbound;
