//! Engine fixture shared by the unit tests.

use crate::adapters::InMemoryForge;
use crate::config::EngineConfig;
use crate::domain::entities::MintRequest;
use crate::engine::{AdminCapability, MintingEngine};
use rm_01_authorization::{AuthorizationPayload, PayloadSigner};
use shared_types::{Address, SourceType, Timestamp, U256};

pub(crate) const NOW: Timestamp = 1_700_000_000;
pub(crate) const ALICE: Address = Address::new([0xa1; 20]);
pub(crate) const BOB: Address = Address::new([0xb0; 20]);
pub(crate) const TREASURY: Address = Address::new([0x7e; 20]);

// Hardhat account #0
const VALIDATOR_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub(crate) struct Fixture {
    pub forge: InMemoryForge,
    pub engine: MintingEngine,
    pub admin: AdminCapability,
    pub signer: PayloadSigner,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(edit: impl FnOnce(&mut EngineConfig)) -> Self {
        let signer = PayloadSigner::from_hex(VALIDATOR_KEY).unwrap();
        let mut config = EngineConfig {
            validator: Some(signer.address()),
            treasury: Some(TREASURY),
            ..EngineConfig::default()
        };
        edit(&mut config);

        let forge = InMemoryForge::new(NOW);
        let (engine, admin) = MintingEngine::new(config, forge.collaborators()).unwrap();
        Self {
            forge,
            engine,
            admin,
            signer,
        }
    }

    /// A request valid for an hour.
    pub fn request(&self, source: SourceType, use_index: u64, cost: u64) -> MintRequest {
        self.request_expiring(source, use_index, cost, NOW + 3600)
    }

    pub fn request_expiring(
        &self,
        source: SourceType,
        use_index: u64,
        cost: u64,
        expiry: Timestamp,
    ) -> MintRequest {
        let payload = AuthorizationPayload {
            source,
            cost: U256::from(cost),
            use_index,
            chain_id: self.engine.config().chain_id,
            expiry,
        };
        MintRequest {
            source,
            use_index,
            cost: payload.cost,
            expiry,
            proof: self.signer.sign(&payload).unwrap(),
        }
    }
}
