//! Trade intent and account reserve snapshot.
//!
//! A [`TradeIntent`] is what the user proposes: receive `want`, give up
//! `spend`. The [`Direction`] is derived from which side is native, never
//! chosen by the caller, because reserve amortization flips sign with it.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount::{Amount, MINOR_UNITS_PER_MAJOR};
use super::error::PricingError;
use super::quality::QualityCalculator;

/// Side of a proposed trade relative to the native currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Spending native currency to acquire the other asset.
    Buy,
    /// Spending a non-native asset.
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// A proposed trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeIntent {
    want: Amount,
    spend: Amount,
    direction: Direction,
}

impl TradeIntent {
    /// Creates an intent, deriving its direction from the spent asset.
    ///
    /// # Errors
    /// `Validation` when either amount is not strictly positive, or when
    /// both sides name the same asset.
    pub fn new(want: Amount, spend: Amount) -> Result<Self, PricingError> {
        if want.as_decimal() <= Decimal::ZERO {
            return Err(PricingError::validation(
                "want",
                format!("must be positive, got {want}"),
            ));
        }
        if spend.as_decimal() <= Decimal::ZERO {
            return Err(PricingError::validation(
                "spend",
                format!("must be positive, got {spend}"),
            ));
        }
        if want.asset() == spend.asset() {
            return Err(PricingError::validation(
                "pair",
                format!("want and spend are both {}", want.asset()),
            ));
        }
        let direction = if spend.is_native() {
            Direction::Buy
        } else {
            Direction::Sell
        };
        Ok(Self {
            want,
            spend,
            direction,
        })
    }

    /// Amount the user wants to receive.
    pub const fn want(&self) -> &Amount {
        &self.want
    }

    /// Amount the user is willing to give up.
    pub const fn spend(&self) -> &Amount {
        &self.spend
    }

    /// Derived trade direction.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Spend per unit of want.
    ///
    /// # Errors
    /// Never for an intent built through [`TradeIntent::new`]; kept fallible
    /// to share the calculator's validation.
    pub fn proposed_quality(&self) -> Result<Decimal, PricingError> {
        QualityCalculator::proposed_quality(self.spend.as_decimal(), self.want.as_decimal())
    }
}

/// Reserve requirements of the submitting account, in minor units.
///
/// A per-request snapshot: the ledger can change reserve levels at any
/// time, so this is never cached across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReserveInfo {
    /// Reserve held for the account itself.
    pub base_reserve: u64,
    /// Additional reserve per owned ledger object.
    pub owner_reserve: u64,
    /// Reserve currently locked by the account.
    pub current_reserve: u64,
    /// Number of objects the account owns.
    pub owner_count: u32,
}

impl ReserveInfo {
    /// Owner reserve in major units.
    pub fn owner_reserve_major(&self) -> Decimal {
        Decimal::from(self.owner_reserve) / Decimal::from(MINOR_UNITS_PER_MAJOR)
    }

    /// Total reserve the account must hold once one more offer is placed.
    pub fn reserve_after_new_offer(&self) -> u64 {
        self.owner_reserve
            .saturating_mul(u64::from(self.owner_count) + 1)
            .saturating_add(self.base_reserve)
    }
}
