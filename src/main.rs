//! Deployment pipeline entrypoint.
//!
//! # Data Flow
//!
//! ```text
//!  contracts/Lottery.sol
//!          │
//!          ▼
//!   ┌────────────┐    ┌─────────────┐    ┌──────────────┐    ┌───────────┐
//!   │  compiler  │───▶│ blockchain  │───▶│  blockchain  │───▶│   store   │
//!   │   (solc)   │    │ build+sign  │    │   confirm    │    │ (atomic)  │
//!   └────────────┘    └─────────────┘    └──────────────┘    └───────────┘
//!                                                                  │
//!                                                                  ▼
//!                                              data/contract_info.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contract_deployer::{config, pipeline};

#[derive(Parser)]
#[command(name = "deploy")]
#[command(about = "Compile the lottery contract and deploy it over JSON-RPC", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Falls back to ./deployer.toml
    /// when present, then to built-in defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Solidity source to compile, overriding the configured path.
    #[arg(short, long)]
    source: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before anything reads the environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contract_deployer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "Configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    if let Some(source) = cli.source {
        config.contract.source = source.display().to_string();
    }

    match pipeline::run(&config).await {
        Ok(record) => {
            println!("Contract deployed at {}", record.address.to_checksum(None));
            println!("Record written to {}", config.store.record_path);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Deployment failed");
            ExitCode::FAILURE
        }
    }
}
