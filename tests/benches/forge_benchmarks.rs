//! # Monster Forge Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | Payload encoding and digest | < 10μs |
//! | Proof verification (recovery) | < 1ms |
//! | Signed mint, end to end | < 1ms |
//! | Monster fusion | < 100μs |

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rm_01_authorization::{AuthorizationApi, AuthorizationPayload, AuthorizationValidator, PayloadSigner};
use rm_02_monster_minting::prelude::*;
use shared_types::{Address, SourceType, U256};
use std::time::Duration;

const NOW: u64 = 1_700_000_000;
const VALIDATOR_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn payload(use_index: u64) -> AuthorizationPayload {
    AuthorizationPayload {
        source: SourceType::ExternalEntry,
        cost: U256::from(1_000_000u64),
        use_index,
        chain_id: DEFAULT_CHAIN_ID,
        expiry: NOW + 3600,
    }
}

fn engine_with_owners(owners: u64) -> (InMemoryForge, MintingEngine, PayloadSigner) {
    let signer = PayloadSigner::from_hex(VALIDATOR_KEY).expect("key");
    let config = EngineConfig {
        validator: Some(signer.address()),
        treasury: Some(Address::new([0x7e; 20])),
        ..EngineConfig::default()
    };
    let forge = InMemoryForge::new(NOW);
    for i in 0..owners {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&(i + 1).to_be_bytes());
        forge.external.assign(i, Address::new(bytes));
    }
    let (engine, _) = MintingEngine::new(config, forge.collaborators()).expect("config");
    (forge, engine, signer)
}

// ============================================================================
// AUTHORIZATION
// ============================================================================

fn bench_authorization(c: &mut Criterion) {
    let mut group = c.benchmark_group("rm-01-authorization");
    group.measurement_time(Duration::from_secs(10));

    let signer = PayloadSigner::from_hex(VALIDATOR_KEY).expect("key");
    let validator = AuthorizationValidator::new(signer.address());
    let p = payload(7);
    let proof = signer.sign(&p).expect("sign");

    group.bench_function("payload_digest", |b| {
        b.iter(|| black_box(black_box(&p).signing_digest()))
    });
    group.bench_function("verify_proof", |b| {
        b.iter(|| black_box(validator.verify(&p, &proof, NOW).is_ok()))
    });
    group.bench_function("sign_payload", |b| b.iter(|| black_box(signer.sign(&p))));

    group.finish();
}

// ============================================================================
// ENGINE
// ============================================================================

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("rm-02-monster-minting");

    for owners in [1u64, 100, 1_000] {
        group.bench_with_input(
            BenchmarkId::new("signed_mint", owners),
            &owners,
            |b, &owners| {
                b.iter_batched(
                    || {
                        let (forge, engine, signer) = engine_with_owners(owners);
                        let idx = owners - 1;
                        let p = AuthorizationPayload {
                            cost: U256::zero(),
                            ..payload(idx)
                        };
                        let request = MintRequest {
                            source: p.source,
                            use_index: idx,
                            cost: p.cost,
                            expiry: p.expiry,
                            proof: signer.sign(&p).expect("sign"),
                        };
                        let owner = forge.external.owner_of(idx).expect("owner");
                        (forge, engine, owner, request)
                    },
                    |(_forge, mut engine, owner, request)| {
                        black_box(engine.mint(owner, request).is_ok())
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }

    group.bench_function("monster_fusion", |b| {
        b.iter_batched(
            || {
                let (forge, mut engine, _) = engine_with_owners(0);
                let owner = Address::new([0xa1; 20]);
                let a = engine.mint_free(owner).expect("free mint");
                let other = Address::new([0xb0; 20]);
                let b = engine.mint_free(other).expect("free mint");
                forge.monsters.transfer(b, owner).expect("transfer");
                (forge, engine, FusionRequest::new(owner, a, b))
            },
            |(_forge, mut engine, request)| {
                let caller = request.owner;
                black_box(
                    engine
                        .fuse(caller, shared_types::FusionVariant::Monster, request)
                        .is_ok(),
                )
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_authorization, bench_engine);
criterion_main!(benches);
