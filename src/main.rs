//! DEX Book Pricer — Entry Point
//!
//! Thin presentation collaborator around the pricing engine:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging, stderr)
//! 3. Open the ledger snapshot named in the config
//! 4. Read the pricing request (JSON file)
//! 5. Evaluate it and print the report as pretty JSON on stdout
//!
//! Usage: `book-pricer [config.toml] <request.json>`

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{error, info};

use dex_book_pricer::adapters::SnapshotLedger;
use dex_book_pricer::config;
use dex_book_pricer::domain::PricingError;
use dex_book_pricer::usecases::{PricingRequest, PricingService};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, request_path) = match args.as_slice() {
        [request] => ("config.toml", request.as_str()),
        [config, request] => (config.as_str(), request.as_str()),
        _ => bail!("usage: book-pricer [config.toml] <request.json>"),
    };

    // ── 1. Load configuration ───────────────────────────────
    let config = config::loader::load_config(config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.engine.log_level)),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(
        name = %config.engine.name,
        version = env!("CARGO_PKG_VERSION"),
        snapshot = %config.engine.snapshot_path,
        "Starting book pricer"
    );

    // ── 3. Ledger snapshot ──────────────────────────────────
    let ledger = SnapshotLedger::load(Path::new(&config.engine.snapshot_path)).await?;

    // ── 4. Pricing request ──────────────────────────────────
    let raw = tokio::fs::read_to_string(request_path)
        .await
        .with_context(|| format!("Failed to read request: {request_path}"))?;
    let request: PricingRequest =
        serde_json::from_str(&raw).context("Failed to parse pricing request")?;

    // ── 5. Evaluate ─────────────────────────────────────────
    let service = PricingService::new(Arc::new(ledger), config.pricing.clone());
    match service.evaluate(&request).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            if let Some(PricingError::SlippageExceeded { offer_quality, .. }) =
                e.downcast_ref::<PricingError>()
            {
                error!(offer_quality = %offer_quality, "Trade aborted: slippage bound violated");
            } else {
                error!(error = %e, "Pricing failed");
            }
            Err(e)
        }
    }
}
