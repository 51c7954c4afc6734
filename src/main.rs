//! Meal Poll Server
//!
//! Run with: cargo run --bin meal-poll [-- --config path/to/config.toml]
//!
//! # Configuration
//!
//! Config file (`--config`, or the default locations) with environment
//! overrides:
//! - `MEAL_POLL_DATASET`: CSV file (default: meals_data.csv)
//! - `MEAL_POLL_HOST` / `MEAL_POLL_PORT`: bind address (default: 0.0.0.0:8501)
//! - `MEAL_POLL_LOG_LEVEL`: log level (default: info)
//! - `MEAL_POLL_LOG_FORMAT`: pretty or json
//! - `RUST_LOG`: overrides the log filter entirely

use clap::Parser;
use meal_poll::api::{serve, AppState};
use meal_poll::config::{Config, LoggingConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "meal-poll")]
#[command(about = "School meal dashboard with menu voting", long_about = None)]
#[command(version)]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Meal CSV file (overrides config)
    #[arg(short, long)]
    dataset: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }

    init_tracing(&config.logging);

    tracing::info!("Starting meal poll v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Dataset: {}", config.dataset.path);

    let state = AppState::new(&config)?;

    // Warm the cache so a missing file shows up in the startup log
    let outcome = state.load_dataset().await;
    if outcome.is_loaded() {
        tracing::info!("Dataset ready: {} rows", outcome.records().len());
    } else {
        tracing::warn!("Dataset not loaded; the page will show a warning until it appears");
    }

    serve(state, &config.api).await?;

    tracing::info!("Meal poll stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("meal_poll={},tower_http=info", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
