//! Pricing Service - One Pricing Request End to End
//!
//! The use case behind the "estimate before you submit" flow:
//! 1. Derives the trade intent from the requested amounts
//! 2. Fetches the primary book, the opposing book and the account
//!    reserve concurrently through `LedgerQuery`
//! 3. Parses both books, skipping malformed entries
//! 4. Computes proposed and reserve-adjusted quality
//! 5. Walks the book under the slippage tolerance
//! 6. Computes book statistics, spread and liquidity ratio
//! 7. Attaches advisories for the presentation layer
//!
//! Slippage violations, invalid input and unsorted snapshots abort the
//! request; callers recover the typed error with
//! `err.downcast_ref::<PricingError>()`.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::PricingConfig;
use crate::domain::amount::Amount;
use crate::domain::arith;
use crate::domain::error::PricingError;
use crate::domain::offer::{ParsedBook, parse_book};
use crate::domain::quality::QualityCalculator;
use crate::domain::spread::{self, SpreadResult};
use crate::domain::stats::{self, StatsResult};
use crate::domain::trade::{Direction, TradeIntent};
use crate::domain::walker::{OrderBookWalker, WalkOutcome, WalkResult};
use crate::ports::ledger::LedgerQuery;

/// A pricing request as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRequest {
  /// Account that would place the offer.
  pub account: String,
  /// Amount the user wants to receive.
  pub want: Amount,
  /// Amount the user is willing to give up.
  pub spend: Amount,
}

/// Advisory output shown to the user before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
  /// The book cannot fill the requested size.
  InsufficientLiquidity {
    /// Requested want amount.
    requested: Decimal,
    /// Volume the walk could match.
    available: Decimal,
  },
  /// Simulated execution drifts from the best quality beyond the threshold.
  SlippageAboveThreshold {
    /// Estimated slippage in percent.
    slippage_percent: Decimal,
    /// Configured threshold in percent.
    threshold_percent: Decimal,
  },
  /// Some snapshot entries could not be parsed and were ignored.
  SkippedMalformedOffers {
    /// Number of skipped entries across both books.
    count: usize,
  },
  /// The reverse book is empty; spread is unavailable.
  EmptyOpposingBook,
}

/// Everything the presentation and transaction layers need.
#[derive(Debug, Clone, Serialize)]
pub struct PricingReport {
  /// Derived trade direction.
  pub direction: Direction,
  /// Spend per unit of want as proposed.
  pub proposed_quality: Decimal,
  /// Proposed quality adjusted for the owner reserve.
  pub effective_quality: Decimal,
  /// Expected outcome of submitting the offer now.
  pub outcome: WalkOutcome,
  /// Raw walk result.
  pub walk: WalkResult,
  /// Statistics of the primary book.
  pub stats: StatsResult,
  /// Spread against the opposing book.
  pub spread: SpreadResult,
  /// Primary over opposing book volume.
  pub liquidity_ratio: Decimal,
  /// Simulated execution quality versus best quality, in percent.
  pub estimated_slippage_percent: Decimal,
  /// Reserve (minor units) required once the new offer exists.
  pub reserve_after_offer: u64,
  /// Warnings for the user.
  pub advisories: Vec<Advisory>,
  /// When the report was produced.
  pub generated_at: DateTime<Utc>,
}

/// Pricing use case bound to a ledger query port.
pub struct PricingService {
  /// Ledger snapshot source.
  ledger: Arc<dyn LedgerQuery>,
  /// Pricing thresholds.
  config: PricingConfig,
}

impl PricingService {
  /// Create a pricing service.
  pub fn new(ledger: Arc<dyn LedgerQuery>, config: PricingConfig) -> Self {
    Self { ledger, config }
  }

  /// Active pricing thresholds.
  pub const fn config(&self) -> &PricingConfig {
    &self.config
  }

  /// Evaluate a proposed trade against a fresh ledger snapshot.
  ///
  /// # Errors
  /// - Snapshot fetch failures (with context)
  /// - `PricingError::Validation` for non-positive or same-asset amounts,
  ///   or book figures beyond the decimal range
  /// - `PricingError::SlippageExceeded` when the best match breaks tolerance
  /// - `PricingError::UnsortedBook` when the snapshot is out of order
  #[instrument(skip(self, request), fields(account = %request.account))]
  pub async fn evaluate(&self, request: &PricingRequest) -> Result<PricingReport> {
    let intent = TradeIntent::new(request.want.clone(), request.spend.clone())?;
    let want_asset = intent.want().asset();
    let spend_asset = intent.spend().asset();
    let limit = self.config.book_limit;

    let (primary_raw, opposing_raw, reserve) = tokio::try_join!(
      self.ledger.book_offers(&want_asset, &spend_asset, limit),
      self.ledger.book_offers(&spend_asset, &want_asset, limit),
      self.ledger.reserve_info(&request.account),
    )
    .with_context(|| format!("Failed to fetch snapshot for {want_asset}/{spend_asset}"))?;

    let primary = Self::parse("primary", &primary_raw);
    let opposing = Self::parse("opposing", &opposing_raw);

    let proposed_quality = intent.proposed_quality()?;
    let effective_quality =
      QualityCalculator::new(reserve).effective_quality(proposed_quality, intent.direction())?;
    debug!(
      direction = %intent.direction(),
      proposed = %proposed_quality,
      effective = %effective_quality,
      "Quality computed"
    );

    let walker = OrderBookWalker::new(self.config.slippage_tolerance)?;
    let walk = walker
      .walk(
        &primary.offers,
        intent.want().as_decimal(),
        proposed_quality,
        effective_quality,
      )
      .inspect_err(|e| warn!(error = %e, "Book walk aborted"))?;

    let stats = stats::compute(
      &primary.offers,
      intent.spend().as_decimal(),
      self.config.depth_band,
    )?;
    let spread = spread::spread(&primary.offers, &opposing.offers)?;
    let liquidity_ratio = spread::liquidity_ratio(&primary.offers, &opposing.offers)?;
    let estimated_slippage_percent = estimated_slippage_percent(&stats)?;

    let advisories = self.advisories(
      &intent,
      &walk,
      estimated_slippage_percent,
      primary.rejected.len() + opposing.rejected.len(),
      opposing.offers.is_empty(),
    );

    let report = PricingReport {
      direction: intent.direction(),
      proposed_quality,
      effective_quality,
      outcome: walk.outcome(),
      walk,
      stats,
      spread,
      liquidity_ratio,
      estimated_slippage_percent,
      reserve_after_offer: reserve.reserve_after_new_offer(),
      advisories,
      generated_at: Utc::now(),
    };

    info!(
      outcome = ?report.outcome,
      best = %report.stats.best_quality,
      vwap = %report.stats.vwap,
      slippage_pct = %report.estimated_slippage_percent,
      advisories = report.advisories.len(),
      "Pricing request evaluated"
    );

    Ok(report)
  }

  /// Parse one raw book, logging every skipped entry.
  fn parse(side: &'static str, raw: &[serde_json::Value]) -> ParsedBook {
    let book = parse_book(raw);
    for rejected in &book.rejected {
      warn!(side, error = %rejected, "Skipping malformed offer");
    }
    debug!(
      side,
      offers = book.offers.len(),
      skipped = book.rejected.len(),
      "Book parsed"
    );
    book
  }

  fn advisories(
    &self,
    intent: &TradeIntent,
    walk: &WalkResult,
    slippage_percent: Decimal,
    skipped: usize,
    opposing_empty: bool,
  ) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    if walk.insufficient_liquidity {
      advisories.push(Advisory::InsufficientLiquidity {
        requested: intent.want().as_decimal(),
        available: walk.running_total,
      });
    }
    if slippage_percent > self.config.slippage_warn_percent {
      advisories.push(Advisory::SlippageAboveThreshold {
        slippage_percent,
        threshold_percent: self.config.slippage_warn_percent,
      });
    }
    if skipped > 0 {
      advisories.push(Advisory::SkippedMalformedOffers { count: skipped });
    }
    if opposing_empty {
      advisories.push(Advisory::EmptyOpposingBook);
    }
    advisories
  }
}

/// Average simulated execution quality versus the best quality, in percent.
///
/// Zero when nothing would execute.
fn estimated_slippage_percent(stats: &StatsResult) -> Result<Decimal, PricingError> {
  let volumes = stats.execution_volumes;
  if volumes.want.is_zero() || stats.best_quality.is_zero() {
    return Ok(Decimal::ZERO);
  }
  let average_quality = arith::div(volumes.spend, volumes.want, "estimated slippage")?;
  let drift = arith::div(
    average_quality - stats.best_quality,
    stats.best_quality,
    "estimated slippage",
  )?;
  arith::mul(drift, Decimal::ONE_HUNDRED, "estimated slippage")
}
