//! # Runtime Configuration
//!
//! The engine configuration is read from the JSON file named by `RM_CONFIG`
//! (defaults when unset), then individual fields are overridden from the
//! environment:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `RM_CONFIG` | Path to an `EngineConfig` JSON document |
//! | `RM_CHAIN_ID` | Overrides `chain_id` |
//! | `RM_VALIDATOR` | Overrides the trusted validator address |
//! | `RM_TREASURY` | Overrides the treasury address |
//! | `RM_SIGNER_KEY` | Hex secret used to sign script requests |
//! | `RM_PRODUCTION` | When `1` or `true`, validator and treasury are required |
//!
//! When a signer key is given and no validator is configured, the signer's
//! address becomes the validator.

use rm_01_authorization::{PayloadSigner, SignatureError};
use rm_02_monster_minting::config::EngineConfig;
use rm_02_monster_minting::errors::ConfigError;
use shared_types::Address;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Path to the engine configuration file.
pub const CONFIG_ENV: &str = "RM_CONFIG";
/// Chain id override.
pub const CHAIN_ID_ENV: &str = "RM_CHAIN_ID";
/// Validator override.
pub const VALIDATOR_ENV: &str = "RM_VALIDATOR";
/// Treasury override.
pub const TREASURY_ENV: &str = "RM_TREASURY";
/// Script signing key.
pub const SIGNER_KEY_ENV: &str = "RM_SIGNER_KEY";
/// Enables production validation.
pub const PRODUCTION_ENV: &str = "RM_PRODUCTION";
/// Script path, when not given on the command line.
pub const SCRIPT_ENV: &str = "RM_SCRIPT";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The configuration file is not a valid `EngineConfig`.
    #[error("cannot parse {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// An override variable holds an unparseable value.
    #[error("invalid {name}: {value:?}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// The signing key is malformed.
    #[error("invalid {SIGNER_KEY_ENV}: {0}")]
    Signer(#[from] SignatureError),

    /// The merged configuration is inconsistent.
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Everything the runtime needs to start.
#[derive(Debug)]
pub struct RuntimeConfig {
    /// Validated engine configuration.
    pub engine: EngineConfig,
    /// Key used to sign script requests, if any.
    pub signer: Option<PayloadSigner>,
}

/// Loads configuration from the process environment.
pub fn load_config() -> Result<RuntimeConfig, RuntimeConfigError> {
    load_from(|name| std::env::var(name).ok())
}

/// Loads configuration using `lookup` for every variable.
pub fn load_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<RuntimeConfig, RuntimeConfigError> {
    let mut engine = match lookup(CONFIG_ENV) {
        Some(path) => read_engine_config(PathBuf::from(path))?,
        None => EngineConfig::default(),
    };

    if let Some(value) = lookup(CHAIN_ID_ENV) {
        engine.chain_id = value.parse().map_err(|_| RuntimeConfigError::InvalidVar {
            name: CHAIN_ID_ENV,
            value,
        })?;
    }
    if let Some(value) = lookup(VALIDATOR_ENV) {
        engine.validator = Some(parse_address(VALIDATOR_ENV, value)?);
    }
    if let Some(value) = lookup(TREASURY_ENV) {
        engine.treasury = Some(parse_address(TREASURY_ENV, value)?);
    }

    let signer = lookup(SIGNER_KEY_ENV)
        .map(|secret| PayloadSigner::from_hex(secret.trim()))
        .transpose()?;

    if let (None, Some(signer)) = (engine.validator, signer.as_ref()) {
        info!(validator = %signer.address(), "Trusting script signer as validator");
        engine.validator = Some(signer.address());
    }

    let production = lookup(PRODUCTION_ENV).is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    if production {
        engine.validate_for_production()?;
    } else {
        engine.validate()?;
    }
    Ok(RuntimeConfig { engine, signer })
}

fn read_engine_config(path: PathBuf) -> Result<EngineConfig, RuntimeConfigError> {
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(source) => return Err(RuntimeConfigError::Read { path, source }),
    };
    match serde_json::from_str(&raw) {
        Ok(config) => {
            info!(path = %path.display(), "Loaded engine configuration");
            Ok(config)
        }
        Err(source) => Err(RuntimeConfigError::Parse { path, source }),
    }
}

fn parse_address(name: &'static str, value: String) -> Result<Address, RuntimeConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| RuntimeConfigError::InvalidVar { name, value })
}
