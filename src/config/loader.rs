//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    name = %config.engine.name,
    tolerance = %config.pricing.slippage_tolerance,
    depth_band = %config.pricing.depth_band,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
///
/// # Errors
/// Fails on malformed TOML or any violated validation rule.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Tolerance within [0, 1)
/// - Non-negative band and warning threshold
/// - Non-empty identity and snapshot path
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.engine.name.is_empty(),
    "engine.name must not be empty"
  );
  anyhow::ensure!(
    !config.engine.snapshot_path.is_empty(),
    "engine.snapshot_path must not be empty"
  );

  let pricing = &config.pricing;
  anyhow::ensure!(
    pricing.slippage_tolerance >= Decimal::ZERO
      && pricing.slippage_tolerance < Decimal::ONE,
    "slippage_tolerance must be in [0, 1), got {}",
    pricing.slippage_tolerance
  );
  anyhow::ensure!(
    pricing.depth_band >= Decimal::ZERO,
    "depth_band must be non-negative, got {}",
    pricing.depth_band
  );
  anyhow::ensure!(
    pricing.slippage_warn_percent >= Decimal::ZERO,
    "slippage_warn_percent must be non-negative, got {}",
    pricing.slippage_warn_percent
  );
  anyhow::ensure!(
    pricing.book_limit > 0,
    "book_limit must be positive"
  );

  Ok(())
}
