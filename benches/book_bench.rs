//! Book Pricing Benchmarks — Per-request Hot Path
//!
//! Benchmarks the domain functions that run on every pricing request
//! against a 500-offer book, the default snapshot depth ceiling.
//!
//! Run with: cargo bench --bench book_bench

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use dex_book_pricer::domain::{Offer, OrderBookWalker, parse_book, spread, stats};

const BOOK_DEPTH: u32 = 500;

/// Raw ledger entries: 100 TOK each, quality rising by 0.001 per level.
fn raw_book() -> Vec<Value> {
    (0..BOOK_DEPTH)
        .map(|level| {
            let pays_minor = 50_000_000 + u64::from(level) * 100_000;
            json!({
                "TakerGets": {"currency": "TOK", "issuer": "rIssuer", "value": "100"},
                "TakerPays": pays_minor.to_string(),
            })
        })
        .collect()
}

fn book() -> Vec<Offer> {
    parse_book(&raw_book()).offers
}

/// Benchmark parsing a raw snapshot into offers.
fn bench_parse_book(c: &mut Criterion) {
    let raw = raw_book();

    c.bench_function("parse_book_500", |b| {
        b.iter(|| {
            let _book = parse_book(black_box(&raw));
        });
    });
}

/// Benchmark full book statistics with a mid-book execution target.
fn bench_stats_compute(c: &mut Criterion) {
    let offers = book();

    c.bench_function("stats_compute_500", |b| {
        b.iter(|| {
            let _stats = stats::compute(
                black_box(&offers),
                black_box(dec!(10000)),
                black_box(dec!(0.05)),
            );
        });
    });
}

/// Benchmark a walk that runs the whole book without filling.
fn bench_walk_full_book(c: &mut Criterion) {
    let offers = book();
    let walker = OrderBookWalker::new(dec!(0.05)).unwrap();

    c.bench_function("walk_full_book_500", |b| {
        b.iter(|| {
            let _walk = walker.walk(
                black_box(&offers),
                black_box(Decimal::from(1_000_000)),
                black_box(dec!(0.5)),
                black_box(dec!(1.0)),
            );
        });
    });
}

/// Benchmark spread and liquidity ratio between two full books.
fn bench_spread(c: &mut Criterion) {
    let offers = book();

    c.bench_function("spread_500", |b| {
        b.iter(|| {
            let _spread = spread::spread(black_box(&offers), black_box(&offers));
            let _ratio = spread::liquidity_ratio(black_box(&offers), black_box(&offers));
        });
    });
}

criterion_group!(
    benches,
    bench_parse_book,
    bench_stats_compute,
    bench_walk_full_book,
    bench_spread,
);
criterion_main!(benches);
