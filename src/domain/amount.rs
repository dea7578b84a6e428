//! Ledger amount model.
//!
//! The ledger encodes value two ways: the native currency as an integer
//! count of minor units (serialized as a bare string), and issued
//! currencies as a `{currency, issuer, value}` object with a decimal value.
//! Everything downstream works on major-unit `Decimal`s obtained through
//! [`Amount::as_decimal`]; no floating point crosses this boundary.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::PricingError;

/// Minor units per major unit of the native currency.
pub const MINOR_UNITS_PER_MAJOR: u64 = 1_000_000;

/// Currency code the ledger uses for its native asset in book requests.
pub const NATIVE_CURRENCY: &str = "XRP";

// ────────────────────────────────────────────
// Asset — the currency side of an amount
// ────────────────────────────────────────────

/// A currency without a value. Used to address one side of an order book.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawAsset", into = "RawAsset")]
pub enum Asset {
    /// The ledger's native currency.
    Native,
    /// A token issued by an account.
    Issued {
        /// Currency code (three-letter or 40-hex).
        currency: String,
        /// Issuing account.
        issuer: String,
    },
}

impl Asset {
    /// Creates an issued asset.
    pub fn issued(currency: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self::Issued {
            currency: currency.into(),
            issuer: issuer.into(),
        }
    }

    /// Whether this is the native currency.
    pub const fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "{NATIVE_CURRENCY}"),
            Self::Issued { currency, issuer } if issuer.is_empty() => write!(f, "{currency}"),
            Self::Issued { currency, issuer } => write!(f, "{currency}.{issuer}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawAsset {
    currency: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    issuer: String,
}

impl From<RawAsset> for Asset {
    fn from(raw: RawAsset) -> Self {
        if raw.currency == NATIVE_CURRENCY && raw.issuer.is_empty() {
            Self::Native
        } else {
            Self::Issued {
                currency: raw.currency,
                issuer: raw.issuer,
            }
        }
    }
}

impl From<Asset> for RawAsset {
    fn from(asset: Asset) -> Self {
        match asset {
            Asset::Native => Self {
                currency: NATIVE_CURRENCY.to_string(),
                issuer: String::new(),
            },
            Asset::Issued { currency, issuer } => Self { currency, issuer },
        }
    }
}

// ────────────────────────────────────────────
// Amount
// ────────────────────────────────────────────

/// A ledger amount in either encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAmount", into = "RawAmount")]
pub enum Amount {
    /// Native currency in minor units.
    Native(u64),
    /// Issued currency with a decimal value in major units.
    Issued {
        /// Currency code.
        currency: String,
        /// Issuing account. Empty when the snapshot omits it.
        issuer: String,
        /// Value in major units.
        value: Decimal,
    },
}

impl Amount {
    /// Builds an issued amount.
    pub fn build(currency: impl Into<String>, issuer: impl Into<String>, value: Decimal) -> Self {
        Self::Issued {
            currency: currency.into(),
            issuer: issuer.into(),
            value,
        }
    }

    /// Builds a native amount from a value in major units.
    ///
    /// # Errors
    /// `Validation` if the value is negative, finer than one minor unit,
    /// or does not fit the ledger's 64-bit minor-unit counter.
    pub fn build_native(major_units: Decimal) -> Result<Self, PricingError> {
        if major_units.is_sign_negative() && !major_units.is_zero() {
            return Err(PricingError::validation(
                "native amount",
                format!("must be non-negative, got {major_units}"),
            ));
        }
        let minor = major_units
            .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
            .ok_or_else(|| PricingError::validation("native amount", "overflow"))?;
        if !minor.fract().is_zero() {
            return Err(PricingError::validation(
                "native amount",
                format!("{major_units} is finer than one minor unit"),
            ));
        }
        minor
            .to_u64()
            .map(Self::Native)
            .ok_or_else(|| PricingError::validation("native amount", "out of range"))
    }

    /// Value in major units.
    pub fn as_decimal(&self) -> Decimal {
        match self {
            Self::Native(minor) => Decimal::from(*minor) / Decimal::from(MINOR_UNITS_PER_MAJOR),
            Self::Issued { value, .. } => *value,
        }
    }

    /// The currency side of this amount.
    pub fn asset(&self) -> Asset {
        match self {
            Self::Native(_) => Asset::Native,
            Self::Issued {
                currency, issuer, ..
            } => Asset::issued(currency.clone(), issuer.clone()),
        }
    }

    /// Whether this amount is in the native currency.
    pub const fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }

    /// Parses a raw ledger JSON amount.
    ///
    /// # Errors
    /// `Validation` naming why the shape or number could not be read.
    pub fn from_ledger(value: &serde_json::Value) -> Result<Self, PricingError> {
        Self::deserialize(value).map_err(|e| PricingError::validation("ledger amount", e.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(_) => write!(f, "{} {NATIVE_CURRENCY}", self.as_decimal().normalize()),
            Self::Issued {
                currency, value, ..
            } => write!(f, "{} {currency}", value.normalize()),
        }
    }
}

/// Wire shape: a string (or bare integer) of minor units, or an object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Minor(String),
    MinorNumber(u64),
    Issued {
        currency: String,
        #[serde(default)]
        issuer: String,
        value: String,
    },
}

/// Parses a decimal string, accepting the ledger's scientific notation.
///
/// Well-formed numbers that `Decimal` cannot hold (beyond ~7.9e28, or
/// more than 28 fractional digits) are reported as out of range rather
/// than as garbage.
pub(crate) fn parse_decimal(raw: &str) -> Result<Decimal, PricingError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| {
            let numeric = trimmed.parse::<f64>().is_ok_and(f64::is_finite);
            let reason = if numeric {
                format!("`{raw}` is out of the supported decimal range")
            } else {
                format!("`{raw}` is not a decimal number")
            };
            PricingError::validation("decimal value", reason)
        })
}

impl TryFrom<RawAmount> for Amount {
    type Error = PricingError;

    fn try_from(raw: RawAmount) -> Result<Self, Self::Error> {
        match raw {
            RawAmount::Minor(s) => s.trim().parse::<u64>().map(Self::Native).map_err(|_| {
                PricingError::validation(
                    "native amount",
                    format!("`{s}` is not an integer count of minor units"),
                )
            }),
            RawAmount::MinorNumber(n) => Ok(Self::Native(n)),
            RawAmount::Issued {
                currency,
                issuer,
                value,
            } => {
                if currency.is_empty() {
                    return Err(PricingError::validation(
                        "currency",
                        "issued amount has an empty currency code",
                    ));
                }
                let value = parse_decimal(&value)?;
                Ok(Self::Issued {
                    currency,
                    issuer,
                    value,
                })
            }
        }
    }
}

impl From<Amount> for RawAmount {
    fn from(amount: Amount) -> Self {
        match amount {
            Amount::Native(minor) => Self::Minor(minor.to_string()),
            Amount::Issued {
                currency,
                issuer,
                value,
            } => Self::Issued {
                currency,
                issuer,
                value: value.normalize().to_string(),
            },
        }
    }
}
