//! Read-only HTTP server exposing the persisted deployment record.
//!
//! Runs without a signing key: it only needs the record path and a bind
//! address, so it can live on a box that never sees `PRIVATE_KEY`.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contract_deployer::config;
use contract_deployer::server::InfoServer;
use contract_deployer::store::RecordStore;

#[derive(Parser)]
#[command(name = "info-server")]
#[command(about = "Serve the deployed contract's address and ABI over HTTP", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Falls back to ./deployer.toml
    /// when present, then to built-in defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding the configured one.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contract_deployer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;
    let bind_address = cli
        .bind
        .unwrap_or_else(|| config.server.bind_address.clone());

    let store = RecordStore::new(&config.store.record_path);
    let server = InfoServer::new(&config.server, store);

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Info server listening");

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    server.run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
