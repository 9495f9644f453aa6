//! Indexer Admin CLI
//!
//! Command-line interface for the indexer configuration dashboard.

use std::path::PathBuf;

use clap::Parser;
use indexer_admin::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "indexer-admin")]
#[command(about = "Administrative dashboard for indexer configurations")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the configuration API (overrides config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Dashboard port (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, api_url={:?}, port={:?}, log_level={:?}",
        args.config,
        args.api_url,
        args.port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(api_url) = args.api_url {
        config.api.base_url = api_url;
    }
    if let Some(port) = args.port {
        config.dashboard.port = port;
    }
    config.validate()?;

    tracing::info!("Starting indexer admin");
    indexer_admin::run(config).await?;

    Ok(())
}
