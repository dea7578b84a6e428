//! Ledger Query Port - Offer and Reserve Snapshots
//!
//! Defines the trait the pricing use case needs from the ledger:
//! the resting offers of one book and the reserve requirements of
//! the submitting account. Transport, retries and timeouts belong
//! to the implementor; the domain never sees them.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::amount::Asset;
use crate::domain::trade::ReserveInfo;

/// Read-only access to the ledger state a pricing request depends on.
///
/// Every call must return a fresh snapshot. Callers never cache results
/// across requests, and two concurrent requests may legitimately see
/// different books.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
  /// Fetch offers that give `taker_gets` in exchange for `taker_pays`.
  ///
  /// Entries are returned raw, as the ledger's `book_offers` lookup
  /// delivers them (best quality first, at most `limit` entries), so
  /// that malformed entries can be skipped individually downstream.
  async fn book_offers(
    &self,
    taker_gets: &Asset,
    taker_pays: &Asset,
    limit: u32,
  ) -> anyhow::Result<Vec<Value>>;

  /// Fetch the reserve snapshot of `account`.
  async fn reserve_info(&self, account: &str) -> anyhow::Result<ReserveInfo>;
}
