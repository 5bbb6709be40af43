//! # Ports Layer
//!
//! - **Inbound (Driving)**: `MintingApi`, the forge's public API
//! - **Outbound (Driven)**: registries, ledgers, clock and event sink

pub mod inbound;
pub mod outbound;

pub use inbound::MintingApi;
pub use outbound::{
    ChipRegistry, Clock, CurrencyLedger, EntityRegistry, EventSink, ExternalRegistry,
    HashRegistry, ItemLedger,
};
