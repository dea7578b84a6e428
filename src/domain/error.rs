//! Pricing engine errors.
//!
//! Raised when inputs violate a domain rule or when a book walk must be
//! aborted. Insufficient liquidity is not an error; results carry it as
//! a flag.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced by the pricing domain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Malformed or non-positive numeric input, rejected before any walk.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Name of the offending input.
        field: &'static str,
        /// Human-readable cause.
        reason: String,
    },

    /// The best matching offer is further from the proposed quality than
    /// the caller's tolerance allows.
    #[error(
        "slippage {slippage} exceeds tolerance {tolerance} \
         (offer quality {offer_quality}, proposed quality {proposed_quality})"
    )]
    SlippageExceeded {
        /// Quality of the offer that triggered the abort.
        offer_quality: Decimal,
        /// Quality the caller proposed.
        proposed_quality: Decimal,
        /// Fractional slippage of the proposal against the offer.
        slippage: Decimal,
        /// Configured fractional tolerance.
        tolerance: Decimal,
    },

    /// A single book entry could not be interpreted. Skipped by parsing.
    #[error("malformed offer at index {index}: {reason}")]
    MalformedOffer {
        /// Position of the entry in the raw snapshot.
        index: usize,
        /// Why the entry was rejected.
        reason: String,
    },

    /// The snapshot is not ascending by quality.
    #[error("book not sorted by quality at index {index}: {quality} follows {previous}")]
    UnsortedBook {
        /// Position of the out-of-order offer.
        index: usize,
        /// Quality of the preceding offer.
        previous: Decimal,
        /// Quality of the offending offer.
        quality: Decimal,
    },
}

impl PricingError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
