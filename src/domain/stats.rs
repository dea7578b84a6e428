//! Aggregate order-book statistics.
//!
//! Everything here is in the quality orientation (pays per gets) except
//! the simulated execution price, which is reported as want received per
//! unit of spend, the figure shown to the user as "you get X per Y".
//!
//! An empty book is a normal state and yields an all-zero result.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::Serialize;

use super::arith;
use super::error::PricingError;
use super::offer::{Offer, verify_sorted};

/// A pair of volumes on the two sides of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Volumes {
    /// Volume of the asset the taker receives (`TakerGets`).
    pub want: Decimal,
    /// Volume of the asset the taker pays (`TakerPays`).
    pub spend: Decimal,
}

/// Aggregate descriptors of one book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatsResult {
    /// `Σ pays / Σ gets`.
    pub vwap: Decimal,
    /// Arithmetic mean of per-offer quality.
    pub simple_avg: Decimal,
    /// Lowest quality in the book.
    pub best_quality: Decimal,
    /// Highest quality in the book.
    pub worst_quality: Decimal,
    /// Volume within the slippage band above the best quality.
    pub depth_at_slippage: Volumes,
    /// Want per unit of spend over the simulated execution.
    pub execution_price: Decimal,
    /// Volumes actually consumed by the simulated execution.
    pub execution_volumes: Volumes,
    /// The book ran out before the target spend size was consumed.
    pub insufficient_liquidity: bool,
    /// Population standard deviation of per-offer quality.
    pub volatility: Decimal,
    /// Volatility relative to the simple average, in percent.
    pub volatility_percent: Decimal,
}

/// Computes statistics for `offers`, simulating the purchase of up to
/// `target_spend_size` (major units of the pays side) and measuring depth
/// within `slippage_band` (fractional) of the best quality.
///
/// # Errors
/// - `Validation` for a negative target size or band, or when a sum or
///   ratio over the book leaves the decimal range.
/// - `UnsortedBook` if the book is not ascending by quality.
pub fn compute(
    offers: &[Offer],
    target_spend_size: Decimal,
    slippage_band: Decimal,
) -> Result<StatsResult, PricingError> {
    if target_spend_size.is_sign_negative() && !target_spend_size.is_zero() {
        return Err(PricingError::validation(
            "target spend size",
            format!("must be non-negative, got {target_spend_size}"),
        ));
    }
    if slippage_band.is_sign_negative() && !slippage_band.is_zero() {
        return Err(PricingError::validation(
            "slippage band",
            format!("must be non-negative, got {slippage_band}"),
        ));
    }
    if offers.is_empty() {
        return Ok(StatsResult::default());
    }
    verify_sorted(offers)?;

    let mut totals = Volumes::default();
    let mut quality_sum = Decimal::ZERO;
    let mut best_quality = offers[0].quality();
    let mut worst_quality = best_quality;
    for offer in offers {
        totals = totals.accumulate(offer.gets(), offer.pays())?;
        quality_sum = arith::add(quality_sum, offer.quality(), "quality sum")?;
        best_quality = best_quality.min(offer.quality());
        worst_quality = worst_quality.max(offer.quality());
    }

    let count = Decimal::from(offers.len());
    let vwap = arith::div(totals.spend, totals.want, "vwap")?;
    let simple_avg = arith::div(quality_sum, count, "simple average")?;

    let (execution_volumes, insufficient_liquidity) =
        simulate_execution(offers, target_spend_size)?;
    let execution_price = if execution_volumes.spend.is_zero() {
        Decimal::ZERO
    } else {
        arith::div(
            execution_volumes.want,
            execution_volumes.spend,
            "execution price",
        )?
    };

    let (volatility, volatility_percent) = quality_dispersion(offers, simple_avg, count)?;

    Ok(StatsResult {
        vwap,
        simple_avg,
        best_quality,
        worst_quality,
        depth_at_slippage: depth_within(offers, best_quality, slippage_band)?,
        execution_price,
        execution_volumes,
        insufficient_liquidity,
        volatility,
        volatility_percent,
    })
}

impl Volumes {
    fn accumulate(self, want: Decimal, spend: Decimal) -> Result<Self, PricingError> {
        Ok(Self {
            want: arith::add(self.want, want, "want volume")?,
            spend: arith::add(self.spend, spend, "spend volume")?,
        })
    }
}

/// Volume of offers priced within `band` of `best_quality`.
fn depth_within(
    offers: &[Offer],
    best_quality: Decimal,
    band: Decimal,
) -> Result<Volumes, PricingError> {
    let ceiling = arith::mul(
        best_quality,
        arith::add(Decimal::ONE, band, "depth band")?,
        "depth ceiling",
    )?;
    offers
        .iter()
        .filter(|offer| offer.quality() <= ceiling)
        .try_fold(Volumes::default(), |depth, offer| {
            depth.accumulate(offer.gets(), offer.pays())
        })
}

/// Consumes up to `target` of the pays side in book order.
///
/// The last touched offer may be taken partially, receiving the same
/// fraction of its gets side. Never extrapolates past the book.
fn simulate_execution(offers: &[Offer], target: Decimal) -> Result<(Volumes, bool), PricingError> {
    let mut remaining = target;
    let mut consumed = Volumes::default();
    for offer in offers {
        if remaining <= Decimal::ZERO {
            break;
        }
        let pays = offer.pays();
        if pays <= remaining {
            consumed = consumed.accumulate(offer.gets(), pays)?;
            remaining -= pays;
        } else {
            let fraction = arith::div(remaining, pays, "execution fraction")?;
            let gets = arith::mul(offer.gets(), fraction, "execution volume")?;
            consumed = consumed.accumulate(gets, remaining)?;
            remaining = Decimal::ZERO;
        }
    }
    Ok((consumed, remaining > Decimal::ZERO))
}

/// Population standard deviation of quality around `mean`, and the same
/// figure as a percentage of the mean.
///
/// Deviations are taken relative to the mean before squaring, so books
/// quoting qualities far above one stay inside the decimal range.
fn quality_dispersion(
    offers: &[Offer],
    mean: Decimal,
    count: Decimal,
) -> Result<(Decimal, Decimal), PricingError> {
    if mean.is_zero() {
        return Ok((Decimal::ZERO, Decimal::ZERO));
    }
    let mut squares = Decimal::ZERO;
    for offer in offers {
        let deviation = arith::sub(offer.quality(), mean, "volatility")?;
        let relative = arith::div(deviation, mean, "volatility")?;
        squares = arith::add(
            squares,
            arith::mul(relative, relative, "volatility")?,
            "volatility",
        )?;
    }
    let relative_std_dev = arith::div(squares, count, "volatility")?
        .sqrt()
        .unwrap_or(Decimal::ZERO);
    Ok((
        arith::mul(relative_std_dev, mean, "volatility")?,
        arith::mul(relative_std_dev, Decimal::ONE_HUNDRED, "volatility percent")?,
    ))
}
