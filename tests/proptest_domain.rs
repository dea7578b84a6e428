//! Property-Based Tests — Domain Layer Invariants
//!
//! Uses `proptest` to verify that book statistics, the book walker and
//! the quality calculator hold their invariants across random books.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use dex_book_pricer::domain::{spread, stats};
use dex_book_pricer::domain::{
    Amount, Direction, Offer, OrderBookWalker, PricingError, QualityCalculator, ReserveInfo,
};

/// Ascending book from `(gets, quality in basis points)` pairs.
fn book_from(mut levels: Vec<(u32, u32)>) -> Vec<Offer> {
    levels.sort_by_key(|&(_, bps)| bps);
    levels
        .into_iter()
        .map(|(gets, bps)| {
            let gets = Decimal::from(gets);
            let pays = gets * Decimal::new(i64::from(bps), 4);
            Offer::new(
                Amount::build("TOK", "rIssuer", gets),
                Amount::build("USD", "rGateway", pays),
            )
            .unwrap()
        })
        .collect()
}

fn book_levels() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((1u32..10_000, 1u32..50_000), 1..40)
}

fn total_pays(book: &[Offer]) -> Decimal {
    book.iter().map(Offer::pays).sum()
}

// ── Statistics Properties ───────────────────────────────────

proptest! {
    /// Best and worst are the extreme qualities of the book.
    #[test]
    fn best_and_worst_are_extremes(levels in book_levels()) {
        let book = book_from(levels);
        let result = stats::compute(&book, dec!(100), dec!(0.05)).unwrap();

        let min = book.iter().map(Offer::quality).min().unwrap();
        let max = book.iter().map(Offer::quality).max().unwrap();
        prop_assert_eq!(result.best_quality, min);
        prop_assert_eq!(result.worst_quality, max);
    }

    /// Both averages lie between the best and worst quality.
    #[test]
    fn averages_bounded_by_extremes(levels in book_levels()) {
        let book = book_from(levels);
        let result = stats::compute(&book, dec!(100), dec!(0.05)).unwrap();
        let eps = dec!(0.000000001);

        prop_assert!(result.vwap >= result.best_quality - eps, "vwap {} < best {}", result.vwap, result.best_quality);
        prop_assert!(result.vwap <= result.worst_quality + eps, "vwap {} > worst {}", result.vwap, result.worst_quality);
        prop_assert!(result.simple_avg >= result.best_quality - eps);
        prop_assert!(result.simple_avg <= result.worst_quality + eps);
        prop_assert!(result.volatility >= Decimal::ZERO);
    }

    /// Same inputs, same outputs.
    #[test]
    fn compute_is_idempotent(levels in book_levels(), target in 0u32..500_000) {
        let book = book_from(levels);
        let target = Decimal::from(target);
        let first = stats::compute(&book, target, dec!(0.02)).unwrap();
        let second = stats::compute(&book, target, dec!(0.02)).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Execution never spends more than asked, and runs short only when
    /// the book's whole pays side is smaller than the target.
    #[test]
    fn execution_respects_target_and_book(levels in book_levels(), target in 0u32..1_000_000) {
        let book = book_from(levels);
        let target = Decimal::from(target);
        let result = stats::compute(&book, target, dec!(0.05)).unwrap();

        prop_assert!(result.execution_volumes.spend <= target);
        prop_assert_eq!(result.insufficient_liquidity, target > total_pays(&book));
    }

    /// A larger target can only make liquidity scarcer.
    #[test]
    fn insufficient_liquidity_monotone_in_target(
        levels in book_levels(),
        small in 0u32..500_000,
        extra in 0u32..500_000,
    ) {
        let book = book_from(levels);
        let small = Decimal::from(small);
        let large = small + Decimal::from(extra);
        let a = stats::compute(&book, small, dec!(0.05)).unwrap();
        let b = stats::compute(&book, large, dec!(0.05)).unwrap();
        prop_assert!(!a.insufficient_liquidity || b.insufficient_liquidity);
    }

    /// Depth always contains at least the best offer and at most the book.
    #[test]
    fn depth_bounded_by_book(levels in book_levels(), band_bps in 0u32..10_000) {
        let book = book_from(levels);
        let band = Decimal::new(i64::from(band_bps), 4);
        let result = stats::compute(&book, dec!(10), band).unwrap();

        prop_assert!(result.depth_at_slippage.want >= book[0].gets());
        prop_assert!(result.depth_at_slippage.spend <= total_pays(&book));
    }
}

/// Ascending book whose amounts span the whole decimal range:
/// `(mantissa, exponent)` pairs for each side, scaled by `10^exponent`.
fn wide_book(levels: Vec<((u32, u32), (u32, u32))>) -> Vec<Offer> {
    let scaled = |(mantissa, exponent): (u32, u32)| {
        let mut value = Decimal::from(mantissa);
        for _ in 0..exponent {
            value = value.checked_mul(Decimal::TEN).unwrap_or(value);
        }
        value
    };
    let mut offers: Vec<Offer> = levels
        .into_iter()
        .filter_map(|(gets, pays)| {
            Offer::new(
                Amount::build("TOK", "rIssuer", scaled(gets)),
                Amount::build("USD", "rGateway", scaled(pays)),
            )
            .ok()
        })
        .collect();
    offers.sort_by_key(Offer::quality);
    offers
}

fn wide_levels() -> impl Strategy<Value = Vec<((u32, u32), (u32, u32))>> {
    let side = (1u32..1_000, 0u32..26);
    prop::collection::vec((side.clone(), side), 1..20)
}

proptest! {
    /// Books near the decimal limits produce a result or a typed
    /// error, never a panic.
    #[test]
    fn wide_range_books_never_panic(levels in wide_levels(), target_exp in 0u32..28) {
        let book = wide_book(levels);
        let mut target = Decimal::ONE;
        for _ in 0..target_exp {
            target *= Decimal::TEN;
        }

        match stats::compute(&book, target, dec!(0.05)) {
            Ok(result) => prop_assert!(result.volatility >= Decimal::ZERO),
            Err(err) => prop_assert!(matches!(err, PricingError::Validation { .. }), "{err}"),
        }
        let _ = spread::spread(&book, &book);
        let _ = spread::liquidity_ratio(&book, &book);
    }
}

// ── Book Walker Properties ──────────────────────────────────

proptest! {
    /// Every matched offer lies under the ceiling, and the result is
    /// either filled or flagged short.
    #[test]
    fn walk_matches_only_under_ceiling(
        levels in book_levels(),
        target in 1u32..200_000,
        headroom_bps in 0u32..500,
    ) {
        let book = book_from(levels);
        let tolerance = dec!(0.05);
        // proposed within tolerance of the best offer never trips the guard
        let proposed = book[0].quality() * (Decimal::ONE + Decimal::new(i64::from(headroom_bps), 4));
        let target = Decimal::from(target);

        let walk = OrderBookWalker::new(tolerance)
            .unwrap()
            .walk(&book, target, proposed, proposed)
            .unwrap();

        let ceiling = proposed * (Decimal::ONE + tolerance);
        prop_assert!(walk.matched_offers.iter().all(|o| o.quality() <= ceiling));
        prop_assert_eq!(walk.insufficient_liquidity, walk.running_total < target);
        prop_assert_eq!(walk.best_quality, Some(book[0].quality()));
    }

    /// A proposal beyond tolerance of the best offer aborts before any
    /// volume is counted.
    #[test]
    fn slippage_guard_fires_on_best_offer(levels in book_levels(), excess_bps in 600u32..5_000) {
        let book = book_from(levels);
        let best = book[0].quality();
        let proposed = best * (Decimal::ONE + Decimal::new(i64::from(excess_bps), 4));

        let err = OrderBookWalker::new(dec!(0.05))
            .unwrap()
            .walk(&book, dec!(1), proposed, proposed)
            .unwrap_err();
        let is_slippage_on_best = matches!(
            err,
            PricingError::SlippageExceeded { offer_quality, .. } if offer_quality == best
        );
        prop_assert!(is_slippage_on_best);
    }
}

// ── Quality Calculator Properties ───────────────────────────

proptest! {
    /// Reserve cost raises buy quality and lowers sell quality.
    #[test]
    fn reserve_cost_brackets_proposal(
        spend in 1u32..1_000_000,
        want in 1u32..1_000_000,
        owner_reserve in 0u64..10_000_000,
    ) {
        let reserve = ReserveInfo { owner_reserve, ..ReserveInfo::default() };
        let calc = QualityCalculator::new(reserve);
        let proposed =
            QualityCalculator::proposed_quality(Decimal::from(spend), Decimal::from(want)).unwrap();

        let buy = calc.effective_quality(proposed, Direction::Buy).unwrap();
        let sell = calc.effective_quality(proposed, Direction::Sell).unwrap();
        prop_assert!(buy >= proposed);
        prop_assert!(sell <= proposed);
    }
}
