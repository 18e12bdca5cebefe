//! ATS source discovery entrypoint.
//! Runs one discovery pass and optionally exports the validated catalog for
//! the crawler. See `README.md` for configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ats_discovery::config::DiscoveryConfig;
use ats_discovery::export;
use ats_discovery::pipeline::Discovery;
use ats_discovery::probe::HttpProber;
use ats_discovery::providers::{bing::BingProvider, serpapi::SerpApiProvider, SearchProvider};
use ats_discovery::robots::HttpComplianceChecker;
use ats_discovery::store::MemoryStore;

/// Discover and validate ATS job-board sources for the crawler.
#[derive(Parser)]
#[clap(
    name = "ats-discovery",
    version,
    about = "Discover, validate, and export ATS job-board sources"
)]
struct Cli {
    /// Path to a TOML or JSON discovery config. Falls back to
    /// $DISCOVERY_CONFIG_PATH, then config/discovery.{toml,json}.
    #[clap(long)]
    config: Option<PathBuf>,

    /// Export the validated catalog to this YAML file after the run.
    #[clap(long)]
    export: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// Select the configured search backend. Selection is configuration resolved
/// here once; the pipeline itself only sees the trait.
fn search_provider_from_env() -> Arc<dyn SearchProvider> {
    let backend = std::env::var("SEARCH_PROVIDER")
        .unwrap_or_default()
        .to_ascii_lowercase();
    let api_key = std::env::var("SEARCH_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("SEARCH_API_KEY is not set; search queries will return no results");
    }
    match backend.as_str() {
        "serpapi" => Arc::new(SerpApiProvider::new(api_key)),
        _ => Arc::new(BingProvider::new(api_key)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => DiscoveryConfig::load_from(path)?,
        None => DiscoveryConfig::load_default()?,
    };

    let timeout = cfg.request_timeout();
    let store = Arc::new(MemoryStore::new());
    let discovery = Discovery::new(
        cfg.clone(),
        search_provider_from_env(),
        Arc::new(HttpComplianceChecker::new(timeout)),
        Arc::new(HttpProber::new(timeout)),
        store.clone(),
    );

    let report = discovery.run_once().await?;
    tracing::info!(
        persisted = report.persisted,
        valid = report.valid,
        blocked = report.blocked,
        error = report.error,
        "discovered/updated sources"
    );

    if let Some(dest) = &cli.export {
        export::write_catalog(store.as_ref(), dest, cfg.export_limit).await?;
    }
    Ok(())
}
