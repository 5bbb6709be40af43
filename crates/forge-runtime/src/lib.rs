//! # Forge Runtime Library
//!
//! Exposes the runtime's modules for testing. The entry point is the
//! `forge-runtime` binary in `main.rs`.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `config` | engine configuration from file and environment |
//! | `script` | the JSON replay script model |
//! | `runtime` | `ForgeRuntime`, which wires collaborators and replays scripts |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod runtime;
pub mod script;

pub use config::{load_config, RuntimeConfig, RuntimeConfigError};
pub use runtime::{ForgeRuntime, ReplayReport, StepError, StepOutcome};
pub use script::{parse_script, FuseStep, OrderStep, ScriptStep};
