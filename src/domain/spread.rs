//! Spread and liquidity between the two books of a pair.
//!
//! Book A→B holds offers giving A for B (quality in B per A); book B→A
//! holds the reverse, so its best quality is inverted into B per A before
//! the two are compared.

use rust_decimal::Decimal;
use serde::Serialize;

use super::arith;
use super::error::PricingError;
use super::offer::Offer;

/// Bid-ask spread between two opposing books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SpreadResult {
    /// Absolute difference between the two best qualities.
    pub spread: Decimal,
    /// Spread as a percentage of the midpoint.
    pub spread_percent: Decimal,
    /// Best quality of book A→B.
    pub best_ab: Decimal,
    /// Best quality of book B→A, inverted into A→B orientation.
    pub best_ba: Decimal,
}

/// Lowest quality in a book, if any.
pub fn best_quality(book: &[Offer]) -> Option<Decimal> {
    book.iter().map(Offer::quality).min()
}

/// Computes the spread between `book_ab` and the inverse of `book_ba`.
///
/// Either book empty → its best is zero and spread fields stay zero.
///
/// # Errors
/// `Validation` if the inverted quality or the percentage leaves the
/// decimal range.
pub fn spread(book_ab: &[Offer], book_ba: &[Offer]) -> Result<SpreadResult, PricingError> {
    let best_ab = best_quality(book_ab).unwrap_or(Decimal::ZERO);
    let best_ba = match best_quality(book_ba) {
        Some(quality) => arith::div(Decimal::ONE, quality, "inverted best quality")?,
        None => Decimal::ZERO,
    };

    if best_ab.is_zero() || best_ba.is_zero() {
        return Ok(SpreadResult {
            best_ab,
            best_ba,
            ..SpreadResult::default()
        });
    }

    let spread = (best_ab - best_ba).abs();
    // halves first: the sum of two large qualities may not fit
    let midpoint = arith::add(best_ab / Decimal::TWO, best_ba / Decimal::TWO, "midpoint")?;
    let spread_percent = arith::mul(
        arith::div(spread, midpoint, "spread percent")?,
        Decimal::ONE_HUNDRED,
        "spread percent",
    )?;
    Ok(SpreadResult {
        spread,
        spread_percent,
        best_ab,
        best_ba,
    })
}

/// Total `TakerGets` volume of `book_a` over that of `book_b`.
///
/// Direction-sensitive; zero when `book_b` holds no volume.
///
/// # Errors
/// `Validation` if either volume or the ratio leaves the decimal range.
pub fn liquidity_ratio(book_a: &[Offer], book_b: &[Offer]) -> Result<Decimal, PricingError> {
    let volume = |book: &[Offer]| arith::sum(book.iter().map(Offer::gets), "book volume");
    let denominator = volume(book_b)?;
    if denominator.is_zero() {
        return Ok(Decimal::ZERO);
    }
    arith::div(volume(book_a)?, denominator, "liquidity ratio")
}
