//! Weather-dashboard: backend for the city weather dashboard.
//!
//! Single-binary Tokio application that:
//! 1. Reads the configured city list on every request
//! 2. Resolves current conditions per city, concurrently
//! 3. Serves each city from a 5-minute cache or OpenWeatherMap
//! 4. Exposes the results as JSON for the frontend

mod config;
mod server;

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use tracing::{error, info};

use aggregator::{CityListFile, Dashboard, WeatherAggregator, WeatherCache};
use openweather_client::OpenWeatherClient;

/// City weather dashboard backend
#[derive(Parser)]
#[command(name = "weather-dashboard", about = "City weather dashboard backend")]
struct Cli {
    /// Optional TOML config file; ignored if it does not exist.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Resolve the configured cities once, print JSON, and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "weather_dashboard=info,aggregator=info,openweather_client=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    info!("Weather dashboard starting up...");

    // Load configuration.
    let cfg = match config::load_config(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let cache = WeatherCache::new();
    info!("Cities file: {}", cfg.cities_file.display());
    info!(
        "Cache TTL: {}s, fetch timeout: {}s",
        cache.ttl().as_secs(),
        cfg.fetch_timeout_secs
    );

    let client = OpenWeatherClient::new(
        cfg.openweather_api_key.clone(),
        cfg.openweather_base_url.clone(),
    );
    let aggregator = WeatherAggregator::new(client, cache)
        .with_fetch_timeout(Duration::from_secs(cfg.fetch_timeout_secs));
    let dashboard = Arc::new(Dashboard::new(
        CityListFile::new(cfg.cities_file.clone()),
        aggregator,
    ));

    if cli.once {
        let records = dashboard.current_weather().await;
        let available = records.iter().filter(|r| r.is_available()).count();
        info!("Resolved {} cities ({} available)", records.len(), available);
        match serde_json::to_string_pretty(&records) {
            Ok(body) => println!("{}", body),
            Err(e) => {
                error!("Failed to encode records: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = server::serve(dashboard, cfg.port).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Weather dashboard shut down.");
}
