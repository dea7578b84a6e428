//! Configuration Module - TOML-based Engine Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! Pricing thresholds are decimals written as strings so they
//! never pass through binary floating point.

pub mod loader;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Process identity, logging and data source.
  pub engine: EngineConfig,
  /// Pricing thresholds.
  #[serde(default)]
  pub pricing: PricingConfig,
}

/// Engine identity and data-source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
  /// Human-readable instance name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// JSON ledger snapshot served by `SnapshotLedger`.
  pub snapshot_path: String,
}

/// Thresholds applied to every pricing request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PricingConfig {
  /// Fractional slippage tolerated by the book walk (0.05 = 5%).
  #[serde(
    with = "rust_decimal::serde::str",
    default = "default_slippage_tolerance"
  )]
  pub slippage_tolerance: Decimal,
  /// Fractional band above the best quality counted as depth.
  #[serde(with = "rust_decimal::serde::str", default = "default_depth_band")]
  pub depth_band: Decimal,
  /// Estimated slippage (percent) above which an advisory is raised.
  #[serde(
    with = "rust_decimal::serde::str",
    default = "default_slippage_warn_percent"
  )]
  pub slippage_warn_percent: Decimal,
  /// Maximum offers requested per book.
  #[serde(default = "default_book_limit")]
  pub book_limit: u32,
}

impl Default for PricingConfig {
  fn default() -> Self {
    Self {
      slippage_tolerance: default_slippage_tolerance(),
      depth_band: default_depth_band(),
      slippage_warn_percent: default_slippage_warn_percent(),
      book_limit: default_book_limit(),
    }
  }
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

fn default_slippage_tolerance() -> Decimal {
  dec!(0.05)
}

fn default_depth_band() -> Decimal {
  dec!(0.05)
}

fn default_slippage_warn_percent() -> Decimal {
  dec!(1)
}

const fn default_book_limit() -> u32 {
  200
}
