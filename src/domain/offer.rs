//! Resting offers and order-book snapshot parsing.
//!
//! Offers are built from raw ledger `book_offers` entries. A single
//! corrupt entry must never sink the whole snapshot, so [`parse_book`]
//! skips it and records a `MalformedOffer` alongside the good offers.
//!
//! Quality is recomputed from the normalized amounts rather than taken
//! from the entry's `quality` field, which the ledger expresses in raw
//! minor units whenever one side is native.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::amount::{Amount, MINOR_UNITS_PER_MAJOR, parse_decimal};
use super::arith;
use super::error::PricingError;

/// A resting offer: gives `taker_gets` in exchange for `taker_pays`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offer {
    taker_gets: Amount,
    taker_pays: Amount,
    quality: Decimal,
    owner_funds: Option<Decimal>,
}

impl Offer {
    /// Creates an offer and derives its quality (`pays / gets`).
    ///
    /// # Errors
    /// `Validation` unless both sides are strictly positive and their
    /// ratio fits the decimal range.
    pub fn new(taker_gets: Amount, taker_pays: Amount) -> Result<Self, PricingError> {
        let gets = taker_gets.as_decimal();
        let pays = taker_pays.as_decimal();
        if gets <= Decimal::ZERO {
            return Err(PricingError::validation(
                "TakerGets",
                format!("must be positive, got {gets}"),
            ));
        }
        if pays <= Decimal::ZERO {
            return Err(PricingError::validation(
                "TakerPays",
                format!("must be positive, got {pays}"),
            ));
        }
        let quality = arith::div(pays, gets, "offer quality")?;
        if quality.is_zero() {
            return Err(PricingError::validation(
                "offer quality",
                format!("{pays} / {gets} is below the supported decimal precision"),
            ));
        }
        Ok(Self {
            taker_gets,
            taker_pays,
            quality,
            owner_funds: None,
        })
    }

    /// Attaches the owner's funding, in major units of `taker_gets`.
    #[must_use]
    pub fn with_owner_funds(mut self, funds: Decimal) -> Self {
        self.owner_funds = Some(funds);
        self
    }

    /// What the taker receives.
    pub const fn taker_gets(&self) -> &Amount {
        &self.taker_gets
    }

    /// What the taker pays.
    pub const fn taker_pays(&self) -> &Amount {
        &self.taker_pays
    }

    /// `pays / gets`; lower is better for the taker.
    pub const fn quality(&self) -> Decimal {
        self.quality
    }

    /// Owner's available balance of the `taker_gets` asset, if reported.
    pub const fn owner_funds(&self) -> Option<Decimal> {
        self.owner_funds
    }

    /// `taker_gets` in major units.
    pub fn gets(&self) -> Decimal {
        self.taker_gets.as_decimal()
    }

    /// `taker_pays` in major units.
    pub fn pays(&self) -> Decimal {
        self.taker_pays.as_decimal()
    }

    /// Volume a taker can actually draw: owner funds when reported,
    /// otherwise the stated `taker_gets`.
    pub fn fillable(&self) -> Decimal {
        self.owner_funds.unwrap_or_else(|| self.gets())
    }
}

// ────────────────────────────────────────────
// Sortedness guard
// ────────────────────────────────────────────

/// Incremental check that qualities never decrease.
///
/// The ledger delivers books ascending by quality. We never re-sort (the
/// ledger's tie-break rules would be lost); a violation fails the batch.
#[derive(Debug, Default)]
pub(crate) struct SortGuard {
    previous: Option<Decimal>,
}

impl SortGuard {
    pub(crate) fn observe(&mut self, index: usize, quality: Decimal) -> Result<(), PricingError> {
        if let Some(previous) = self.previous {
            if quality < previous {
                return Err(PricingError::UnsortedBook {
                    index,
                    previous,
                    quality,
                });
            }
        }
        self.previous = Some(quality);
        Ok(())
    }
}

/// Verifies a whole book is ascending by quality.
///
/// # Errors
/// `UnsortedBook` at the first decrease.
pub fn verify_sorted(offers: &[Offer]) -> Result<(), PricingError> {
    let mut guard = SortGuard::default();
    offers
        .iter()
        .enumerate()
        .try_for_each(|(index, offer)| guard.observe(index, offer.quality))
}

// ────────────────────────────────────────────
// Snapshot parsing
// ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawOffer {
    #[serde(rename = "TakerGets")]
    taker_gets: Value,
    #[serde(rename = "TakerPays")]
    taker_pays: Value,
    #[serde(default)]
    owner_funds: Option<String>,
}

/// Result of parsing a raw snapshot.
#[derive(Debug, Clone, Default)]
pub struct ParsedBook {
    /// Valid offers, in snapshot order.
    pub offers: Vec<Offer>,
    /// One `MalformedOffer` per skipped entry.
    pub rejected: Vec<PricingError>,
}

impl ParsedBook {
    /// True when no entry had to be skipped.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Parses raw `book_offers` entries, skipping malformed ones.
pub fn parse_book(entries: &[Value]) -> ParsedBook {
    let mut book = ParsedBook {
        offers: Vec::with_capacity(entries.len()),
        rejected: Vec::new(),
    };
    for (index, entry) in entries.iter().enumerate() {
        match parse_entry(entry) {
            Ok(offer) => book.offers.push(offer),
            Err(reason) => book
                .rejected
                .push(PricingError::MalformedOffer { index, reason }),
        }
    }
    book
}

fn parse_entry(entry: &Value) -> Result<Offer, String> {
    let raw = RawOffer::deserialize(entry).map_err(|e| e.to_string())?;
    let taker_gets = Amount::from_ledger(&raw.taker_gets).map_err(|e| format!("TakerGets: {e}"))?;
    let taker_pays = Amount::from_ledger(&raw.taker_pays).map_err(|e| format!("TakerPays: {e}"))?;

    let mut offer = Offer::new(taker_gets, taker_pays).map_err(|e| e.to_string())?;

    if let Some(raw_funds) = raw.owner_funds {
        let mut funds = parse_decimal(&raw_funds).map_err(|e| format!("owner_funds: {e}"))?;
        if funds.is_sign_negative() && !funds.is_zero() {
            return Err(format!("owner_funds: negative balance {funds}"));
        }
        // Reported in the raw units of TakerGets.
        if offer.taker_gets.is_native() {
            funds /= Decimal::from(MINOR_UNITS_PER_MAJOR);
        }
        offer = offer.with_owner_funds(funds);
    }
    Ok(offer)
}
