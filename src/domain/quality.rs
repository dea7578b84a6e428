//! Quality (exchange rate) computation.
//!
//! Quality is always spend per unit of want, the same orientation as an
//! offer's `TakerPays / TakerGets`, so lower is better for the taker.
//! The effective quality folds in the owner reserve a new resting offer
//! locks up, approximating the real cost of placing it.

use rust_decimal::Decimal;

use super::arith;
use super::error::PricingError;
use super::trade::{Direction, ReserveInfo};

/// Computes proposed and reserve-adjusted qualities for one request.
///
/// Holds the reserve snapshot of the submitting account. Build a fresh
/// calculator per request; reserve levels are not stable across calls.
#[derive(Debug, Clone, Copy)]
pub struct QualityCalculator {
    reserve: ReserveInfo,
}

impl QualityCalculator {
    /// Creates a calculator bound to a reserve snapshot.
    pub const fn new(reserve: ReserveInfo) -> Self {
        Self { reserve }
    }

    /// The reserve snapshot in use.
    pub const fn reserve(&self) -> &ReserveInfo {
        &self.reserve
    }

    /// Quality of a proposed trade: `spend / want`.
    ///
    /// # Errors
    /// `Validation` if `want` is not positive or `spend` is negative.
    pub fn proposed_quality(spend: Decimal, want: Decimal) -> Result<Decimal, PricingError> {
        if want <= Decimal::ZERO {
            return Err(PricingError::validation(
                "want amount",
                format!("must be positive, got {want}"),
            ));
        }
        if spend.is_sign_negative() && !spend.is_zero() {
            return Err(PricingError::validation(
                "spend amount",
                format!("must be non-negative, got {spend}"),
            ));
        }
        arith::div(spend, want, "proposed quality")
    }

    /// Reserve-adjusted quality.
    ///
    /// `factor = owner_reserve / proposed`; buys pay the reserve on top
    /// (`proposed * (1 + factor)`), sells net it out (`proposed * (1 - factor)`).
    ///
    /// # Errors
    /// `Validation` when `proposed` is zero or negative, or when the
    /// adjusted quality leaves the decimal range.
    pub fn effective_quality(
        &self,
        proposed: Decimal,
        direction: Direction,
    ) -> Result<Decimal, PricingError> {
        if proposed <= Decimal::ZERO {
            return Err(PricingError::validation(
                "proposed quality",
                format!("must be positive, got {proposed}"),
            ));
        }
        let reserve_cost_factor =
            arith::div(self.reserve.owner_reserve_major(), proposed, "reserve cost factor")?;
        let adjustment = match direction {
            Direction::Buy => arith::add(Decimal::ONE, reserve_cost_factor, "effective quality")?,
            Direction::Sell => arith::sub(Decimal::ONE, reserve_cost_factor, "effective quality")?,
        };
        arith::mul(proposed, adjustment, "effective quality")
    }
}
