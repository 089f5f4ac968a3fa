use std::sync::Arc;

use blockpulse::{
    config::AppConfig,
    http_client::build_http_client,
    price::HistoricalPriceClient,
    providers::rpc::CoreRpcSource,
    supervisor::Supervisor,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the block statistics service.
    Run,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_service().await?,
    }

    Ok(())
}

async fn run_service() -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!("Loading application configuration...");
    let config = AppConfig::new(None)?;
    tracing::debug!(
        rpc_url = %config.rpc_url,
        price_api_url = %config.price_api_url,
        concurrency = config.concurrency,
        "Configuration loaded."
    );

    // One retryable client per upstream; the price client additionally
    // carries its hard per-call deadline inside `HistoricalPriceClient`.
    let rpc_client = build_http_client(&config.http_retry, None)?;
    let data_source = Arc::new(CoreRpcSource::new(
        rpc_client,
        config.rpc_url.clone(),
        config.rpc_user.clone(),
        config.rpc_password.clone(),
    ));
    tracing::info!(rpc_url = %config.rpc_url, "Chain data source initialized.");

    let price_client = build_http_client(&config.http_retry, None)?;
    let price_lookup = Arc::new(HistoricalPriceClient::new(
        price_client,
        config.price_api_url.clone(),
        config.price_timeout,
    ));
    tracing::info!(price_api_url = %config.price_api_url, "Price lookup initialized.");

    let supervisor = Supervisor::builder()
        .config(config)
        .data_source(data_source)
        .price_lookup(price_lookup)
        .build()?;

    tracing::info!("Supervisor initialized, starting services...");

    supervisor.run().await?;

    Ok(())
}
