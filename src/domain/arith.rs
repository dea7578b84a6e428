//! Overflow-checked decimal arithmetic.
//!
//! `Decimal` operators panic once a result leaves the ~7.9e28 range.
//! Ledger amounts can legitimately approach it (a huge issued value
//! against a single native minor unit), so every product, quotient and
//! sum over book data goes through these helpers and surfaces as a
//! `Validation` error naming the quantity being computed.

use rust_decimal::Decimal;

use super::error::PricingError;

fn overflow(what: &'static str) -> PricingError {
    PricingError::validation(what, "exceeds the supported decimal range")
}

pub(crate) fn add(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, PricingError> {
    a.checked_add(b).ok_or_else(|| overflow(what))
}

pub(crate) fn sub(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, PricingError> {
    a.checked_sub(b).ok_or_else(|| overflow(what))
}

pub(crate) fn mul(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, PricingError> {
    a.checked_mul(b).ok_or_else(|| overflow(what))
}

/// Division; the caller guarantees a non-zero divisor.
pub(crate) fn div(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, PricingError> {
    a.checked_div(b).ok_or_else(|| overflow(what))
}

pub(crate) fn sum(
    values: impl IntoIterator<Item = Decimal>,
    what: &'static str,
) -> Result<Decimal, PricingError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| add(acc, value, what))
}
