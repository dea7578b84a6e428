//! Order-book walk for a proposed trade.
//!
//! Walks resting offers in book order, accumulating fillable volume until
//! the target want-amount is covered, and classifies the result for the
//! transaction-construction layer: fill, partial fill, or an unmatched
//! offer that will rest at the top of the book.
//!
//! Two aborts exist: the best matching offer is further from the proposal
//! than the tolerance (`SlippageExceeded`), and the snapshot turns out not
//! to be ascending (`UnsortedBook`). Running out of book is not an abort.

use rust_decimal::Decimal;
use serde::Serialize;

use super::arith;
use super::error::PricingError;
use super::offer::{Offer, SortGuard};

/// How a proposed trade is expected to play out against the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WalkOutcome {
    /// Matching offers cover the whole target.
    Filled,
    /// Some offers cross, but not enough to cover the target.
    PartialFill,
    /// Nothing crosses; the order rests on the book.
    Unmatched,
}

/// Result of a book walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkResult {
    /// Fillable volume accumulated from matched offers (want units).
    pub running_total: Decimal,
    /// Lowest quality seen during the walk.
    pub best_quality: Option<Decimal>,
    /// Offers that would be consumed, in book order.
    pub matched_offers: Vec<Offer>,
    /// The target was not reached.
    pub insufficient_liquidity: bool,
}

impl WalkResult {
    /// Classifies the walk.
    pub fn outcome(&self) -> WalkOutcome {
        if self.matched_offers.is_empty() {
            WalkOutcome::Unmatched
        } else if self.insufficient_liquidity {
            WalkOutcome::PartialFill
        } else {
            WalkOutcome::Filled
        }
    }
}

/// Walks a book under a fractional slippage tolerance (0.05 = 5%).
#[derive(Debug, Clone, Copy)]
pub struct OrderBookWalker {
    tolerance: Decimal,
}

impl OrderBookWalker {
    /// Creates a walker.
    ///
    /// # Errors
    /// `Validation` if the tolerance is negative.
    pub fn new(tolerance: Decimal) -> Result<Self, PricingError> {
        if tolerance.is_sign_negative() && !tolerance.is_zero() {
            return Err(PricingError::validation(
                "slippage tolerance",
                format!("must be non-negative, got {tolerance}"),
            ));
        }
        Ok(Self { tolerance })
    }

    /// The configured tolerance.
    pub const fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Walks `offers` (ascending by quality) toward `target_want`.
    ///
    /// Offers at or below `effective_quality * (1 + tolerance)` match; the
    /// first one above that ceiling ends the walk since no later offer can
    /// be cheaper. Each match is checked against `proposed_quality` before
    /// its volume is counted. A non-positive effective quality (a sell
    /// whose reserve cost outweighs the proposal) leaves nothing matched.
    ///
    /// # Errors
    /// - `Validation` for a non-positive target or proposed quality, or
    ///   when accumulated volume leaves the decimal range.
    /// - `SlippageExceeded` carrying the quality of the offending offer.
    /// - `UnsortedBook` if a visited offer is cheaper than its predecessor.
    pub fn walk(
        &self,
        offers: &[Offer],
        target_want: Decimal,
        proposed_quality: Decimal,
        effective_quality: Decimal,
    ) -> Result<WalkResult, PricingError> {
        if target_want <= Decimal::ZERO {
            return Err(PricingError::validation(
                "target want amount",
                format!("must be positive, got {target_want}"),
            ));
        }
        if proposed_quality <= Decimal::ZERO {
            return Err(PricingError::validation(
                "proposed quality",
                format!("must be positive, got {proposed_quality}"),
            ));
        }

        let ceiling = arith::mul(
            effective_quality,
            arith::add(Decimal::ONE, self.tolerance, "slippage tolerance")?,
            "quality ceiling",
        )?;
        let mut guard = SortGuard::default();
        let mut running_total = Decimal::ZERO;
        let mut best_quality: Option<Decimal> = None;
        let mut matched_offers = Vec::new();

        for (index, offer) in offers.iter().enumerate() {
            let quality = offer.quality();
            guard.observe(index, quality)?;
            best_quality = Some(best_quality.map_or(quality, |best| best.min(quality)));

            if quality > ceiling {
                break;
            }

            let slippage = arith::div(
                arith::sub(proposed_quality, quality, "slippage")?,
                quality,
                "slippage",
            )?;
            if slippage > self.tolerance {
                return Err(PricingError::SlippageExceeded {
                    offer_quality: quality,
                    proposed_quality,
                    slippage,
                    tolerance: self.tolerance,
                });
            }

            running_total = arith::add(running_total, offer.fillable(), "running total")?;
            matched_offers.push(offer.clone());
            if running_total >= target_want {
                break;
            }
        }

        Ok(WalkResult {
            running_total,
            best_quality,
            matched_offers,
            insufficient_liquidity: running_total < target_want,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::amount::Amount;
    use rust_decimal_macros::dec;

    /// Offer giving `gets` TOK for `pays` native major units.
    fn offer(gets: Decimal, pays: Decimal) -> Offer {
        Offer::new(
            Amount::build("TOK", "rIssuer", gets),
            Amount::build_native(pays).unwrap(),
        )
        .unwrap()
    }

    fn book() -> Vec<Offer> {
        vec![
            offer(dec!(100), dec!(50)),  // 0.50
            offer(dec!(100), dec!(51)),  // 0.51
            offer(dec!(200), dec!(120)), // 0.60
        ]
    }

    fn walker() -> OrderBookWalker {
        OrderBookWalker::new(dec!(0.05)).unwrap()
    }

    #[test]
    fn test_fills_and_stops_early() {
        let result = walker()
            .walk(&book(), dec!(150), dec!(0.51), dec!(0.51))
            .unwrap();
        assert_eq!(result.running_total, dec!(200));
        assert_eq!(result.matched_offers.len(), 2);
        assert_eq!(result.best_quality, Some(dec!(0.5)));
        assert!(!result.insufficient_liquidity);
        assert_eq!(result.outcome(), WalkOutcome::Filled);
    }

    #[test]
    fn test_ceiling_terminates_walk() {
        // ceiling = 0.51 * 1.05 = 0.5355, third offer (0.60) never matches
        let result = walker()
            .walk(&book(), dec!(1000), dec!(0.51), dec!(0.51))
            .unwrap();
        assert_eq!(result.matched_offers.len(), 2);
        assert_eq!(result.running_total, dec!(200));
        assert!(result.insufficient_liquidity);
        assert_eq!(result.outcome(), WalkOutcome::PartialFill);
    }

    #[test]
    fn test_exhausting_book_flags_insufficient_liquidity() {
        let result = walker()
            .walk(&book(), dec!(1000), dec!(0.52), dec!(0.6))
            .unwrap();
        assert_eq!(result.matched_offers.len(), 3);
        assert_eq!(result.running_total, dec!(400));
        assert!(result.insufficient_liquidity);
    }

    #[test]
    fn test_unmatched_when_proposal_below_book() {
        let result = walker()
            .walk(&book(), dec!(10), dec!(0.4), dec!(0.4))
            .unwrap();
        assert!(result.matched_offers.is_empty());
        assert_eq!(result.best_quality, Some(dec!(0.5)));
        assert_eq!(result.outcome(), WalkOutcome::Unmatched);
    }

    #[test]
    fn test_slippage_exceeded_aborts_before_accumulation() {
        // Proposal 0.6 vs best 0.5 is 20% slippage with a 5% tolerance.
        let err = walker()
            .walk(&book(), dec!(10), dec!(0.6), dec!(0.6))
            .unwrap_err();
        match err {
            PricingError::SlippageExceeded {
                offer_quality,
                slippage,
                ..
            } => {
                assert_eq!(offer_quality, dec!(0.5));
                assert_eq!(slippage, dec!(0.2));
            }
            other => panic!("expected SlippageExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_owner_funds_limit_accumulation() {
        let offers = vec![offer(dec!(100), dec!(50)).with_owner_funds(dec!(30))];
        let result = walker()
            .walk(&offers, dec!(50), dec!(0.5), dec!(0.5))
            .unwrap();
        assert_eq!(result.running_total, dec!(30));
        assert!(result.insufficient_liquidity);
    }

    #[test]
    fn test_unsorted_book_fails_batch() {
        let offers = vec![offer(dec!(100), dec!(51)), offer(dec!(100), dec!(50))];
        let err = walker()
            .walk(&offers, dec!(1000), dec!(0.51), dec!(0.51))
            .unwrap_err();
        assert!(matches!(err, PricingError::UnsortedBook { index: 1, .. }));
    }

    #[test]
    fn test_empty_book_is_unmatched() {
        let result = walker()
            .walk(&[], dec!(10), dec!(0.5), dec!(0.5))
            .unwrap();
        assert_eq!(result.best_quality, None);
        assert!(result.insufficient_liquidity);
        assert_eq!(result.outcome(), WalkOutcome::Unmatched);
    }

    #[test]
    fn test_non_positive_effective_quality_is_unmatched() {
        for effective in [Decimal::ZERO, dec!(-1.5)] {
            let result = walker()
                .walk(&book(), dec!(10), dec!(0.5), effective)
                .unwrap();
            assert!(result.matched_offers.is_empty());
            assert_eq!(result.running_total, Decimal::ZERO);
            assert_eq!(result.best_quality, Some(dec!(0.5)));
            assert!(result.insufficient_liquidity);
            assert_eq!(result.outcome(), WalkOutcome::Unmatched);
        }
    }

    #[test]
    fn test_volume_overflow_is_validation_error() {
        let huge = dec!(50000000000000000000000000000);
        let offers = vec![
            Offer::new(Amount::build("TOK", "r", huge), Amount::build("USD", "r", huge)).unwrap(),
            Offer::new(Amount::build("TOK", "r", huge), Amount::build("USD", "r", huge)).unwrap(),
        ];
        let err = walker()
            .walk(&offers, Decimal::MAX, dec!(1), dec!(1))
            .unwrap_err();
        assert!(matches!(err, PricingError::Validation { field: "running total", .. }));
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        assert!(OrderBookWalker::new(dec!(-0.01)).is_err());
        assert!(walker().walk(&book(), Decimal::ZERO, dec!(0.5), dec!(0.5)).is_err());
        assert!(walker().walk(&book(), dec!(1), Decimal::ZERO, dec!(0.5)).is_err());
    }
}
