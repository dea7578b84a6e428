//! Domain layer - Order-book pricing and execution simulation.
//!
//! Pure, synchronous computation over a fetched offer snapshot.
//! No I/O and no logging here (hexagonal architecture inner ring);
//! every function takes its inputs explicitly and returns a value.
//! All amount and quality math uses `rust_decimal::Decimal`.

pub mod amount;
pub(crate) mod arith;
pub mod error;
pub mod offer;
pub mod quality;
pub mod spread;
pub mod stats;
pub mod trade;
pub mod walker;

// Re-export core types for convenience
pub use amount::{Amount, Asset};
pub use error::PricingError;
pub use offer::{Offer, ParsedBook, parse_book};
pub use quality::QualityCalculator;
pub use spread::SpreadResult;
pub use stats::{StatsResult, Volumes};
pub use trade::{Direction, ReserveInfo, TradeIntent};
pub use walker::{OrderBookWalker, WalkOutcome, WalkResult};
