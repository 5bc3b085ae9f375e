//! Staking engine CLI.
//!
//! A thin consumer of the engine's published surface: connect, print the
//! snapshot, issue commands. Contains no engine logic.
//!
//! # Data Flow
//! ```text
//!     command line ──▶ StakingEngine ──▶ TransactionOrchestrator ──▶ ledger
//!                          │
//!                          ▼
//!                  StateSynchronizer ──▶ EngineSnapshot ──▶ stdout
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use staking_engine::chain::{RpcLedger, Wallet};
use staking_engine::config::load_config;
use staking_engine::contracts::ContractRegistry;
use staking_engine::sync::EngineSnapshot;
use staking_engine::{StakeMode, StakingEngine};

#[derive(Parser)]
#[command(name = "staking-engine", version, about = "Token staking engine CLI")]
struct Cli {
    /// Path to the engine configuration file.
    #[arg(long, default_value = "engine.toml")]
    config: PathBuf,

    /// Address the custom pool instead of the standard pool.
    #[arg(long)]
    custom: bool,

    /// Print the resulting snapshot as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect and print the current snapshot.
    Status,
    /// Approve and stake an amount into the active pool.
    Stake {
        /// Decimal token amount, e.g. "10" or "2.5".
        #[arg(long)]
        amount: String,
    },
    /// Withdraw the full stake from the active pool.
    Unstake,
    /// Claim accumulated reward tokens.
    Claim,
    /// Trigger reward redistribution for the active pool (owner only).
    Redistribute,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("staking_engine={}", config.observability.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        rpc_url = %config.provider.rpc_url,
        networks = config.networks.len(),
        "staking-engine starting"
    );

    let wallet = Wallet::from_env()?;
    let ledger = RpcLedger::new(&config.provider, wallet)?;
    let registry = ContractRegistry::from_config(&config.networks)?;
    let engine = StakingEngine::new(Arc::new(ledger), registry);

    // A fresh engine always starts in standard mode.
    if cli.custom {
        engine.toggle_mode();
    }

    let identity = engine.connect().await?;
    tracing::info!(
        address = %identity.address,
        network = %identity.network_name,
        mode = %engine.current_mode(),
        "Connected"
    );

    match cli.command {
        Command::Status => {}
        Command::Stake { amount } => engine.stake(&amount).await?,
        Command::Unstake => engine.unstake().await?,
        Command::Claim => engine.claim().await?,
        Command::Redistribute => engine.redistribute().await?,
    }

    match engine.snapshot() {
        Some(snapshot) if cli.json => println!("{}", serde_json::to_string_pretty(&*snapshot)?),
        Some(snapshot) => print_snapshot(&snapshot, engine.current_mode()),
        None => println!("no snapshot available"),
    }

    Ok(())
}

fn print_snapshot(snapshot: &EngineSnapshot, mode: StakeMode) {
    let pool = snapshot.pools.pool(mode);
    println!("account:          {}", snapshot.identity.address);
    println!(
        "network:          {} ({})",
        snapshot.identity.network_name, snapshot.identity.network_id
    );
    println!("mode:             {}", mode);
    println!("token balance:    {}", snapshot.token_balance);
    println!("contract balance: {}", snapshot.contract_balance);
    println!("my stake:         {}", pool.my_stake);
    println!("total staked:     {}", pool.total_staked);
    println!("apy:              {:.2}%", pool.apy);
}
