//! Region classification and funding eligibility server.
//!
//! Loads the region dataset and funding policy at startup, then serves the
//! regions and geocode endpoints.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use regionfund::api::{router, AppState};
use regionfund::config::Config;
use regionfund::eligibility::FundingTable;
use regionfund::geocode::NominatimGeocoder;
use regionfund::regions::{load_regions, RegionClassifier};
use regionfund::resolve::ResolveService;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Region classification and funding eligibility server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides the config file)
    #[arg(short, long)]
    listen: Option<String>,

    /// Region GeoJSON dataset (overrides the config file)
    #[arg(long)]
    regions: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Loading config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(regions) = args.regions {
        config.dataset.path = regions;
    }

    info!("Region funding server");

    let regions = load_regions(&config.dataset.path).context("Failed to load region dataset")?;
    let classifier = Arc::new(RegionClassifier::from_regions(regions));

    let funding = match &config.funding.rules {
        Some(rules) => FundingTable::new(rules).context("Invalid funding rules")?,
        None => FundingTable::default(),
    };
    info!("Funding table has {} rules", funding.rules().count());

    let geocoder = NominatimGeocoder::new(&config.geocoder)?;
    info!(
        "Geocoding via {} (timeout {} ms)",
        config.geocoder.url, config.geocoder.timeout_ms
    );

    let service = ResolveService::new(classifier, Arc::new(geocoder), Arc::new(funding));
    let state = AppState::new(service).context("Failed to encode region dataset")?;
    let app = router(Arc::new(state));

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
