//! # Forge Runtime
//!
//! Loads the engine configuration, binds in-memory collaborators and replays
//! a JSON script through the minting service. The replay report is printed to
//! stdout as JSON; logs go to stderr.
//!
//! ```text
//! RM_SIGNER_KEY=0x... RM_TREASURY=0x... forge-runtime script.json
//! ```

use anyhow::{Context, Result};
use forge_runtime::config::SCRIPT_ENV;
use forge_runtime::{load_config, parse_script, ForgeRuntime};
use rm_02_monster_minting::adapters::SystemClock;
use rm_02_monster_minting::ports::outbound::Clock;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        version = rm_02_monster_minting::VERSION,
        "Starting Monster Forge runtime"
    );

    let config = load_config().context("loading forge configuration")?;

    let script_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(SCRIPT_ENV).ok())
        .with_context(|| format!("usage: forge-runtime <script.json> (or set {SCRIPT_ENV})"))?;
    let raw = std::fs::read_to_string(&script_path)
        .with_context(|| format!("reading script {script_path}"))?;
    let steps = parse_script(&raw).with_context(|| format!("parsing script {script_path}"))?;
    info!(path = %script_path, steps = steps.len(), "Script loaded");

    let runtime = ForgeRuntime::new(config, SystemClock.now()).context("building engine")?;
    let report = runtime.replay(&steps).await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
