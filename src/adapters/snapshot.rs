//! Snapshot Ledger - JSON-backed `LedgerQuery`
//!
//! Serves order books and a reserve snapshot from a captured JSON
//! document instead of a live ledger connection. Used by the demo
//! binary and integration tests.
//!
//! Document shape:
//! ```json
//! {
//!   "fetched_at": "2026-01-01T00:00:00Z",
//!   "reserve": { "base_reserve": 10000000, "owner_reserve": 2000000,
//!                "current_reserve": 14000000, "owner_count": 2 },
//!   "books": [
//!     { "taker_gets": { "currency": "TOK", "issuer": "r..." },
//!       "taker_pays": { "currency": "XRP" },
//!       "offers": [ { "TakerGets": {...}, "TakerPays": "50000000" } ] }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info, instrument};

use crate::domain::amount::Asset;
use crate::domain::trade::ReserveInfo;
use crate::ports::ledger::LedgerQuery;

#[derive(Debug, Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    fetched_at: Option<DateTime<Utc>>,
    reserve: ReserveInfo,
    #[serde(default)]
    books: Vec<BookEntry>,
}

#[derive(Debug, Deserialize)]
struct BookEntry {
    taker_gets: Asset,
    taker_pays: Asset,
    offers: Vec<Value>,
}

/// Ledger stand-in backed by a captured snapshot.
///
/// Books not present in the document are served as empty, which the
/// pricing engine treats as a normal state.
#[derive(Debug, Clone)]
pub struct SnapshotLedger {
    /// Raw entries keyed by (taker_gets, taker_pays).
    books: HashMap<(Asset, Asset), Vec<Value>>,
    /// Reserve snapshot served for every account.
    reserve: ReserveInfo,
    /// When the snapshot was captured, if recorded.
    fetched_at: Option<DateTime<Utc>>,
}

impl SnapshotLedger {
    /// Build from a JSON document.
    ///
    /// # Errors
    /// Fails if the document does not match the snapshot shape. Individual
    /// offer entries are kept raw and validated later.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: SnapshotDocument =
            serde_json::from_str(json).context("Failed to parse ledger snapshot")?;

        let mut books = HashMap::with_capacity(document.books.len());
        for entry in document.books {
            books
                .entry((entry.taker_gets, entry.taker_pays))
                .or_insert_with(Vec::new)
                .extend(entry.offers);
        }

        Ok(Self {
            books,
            reserve: document.reserve,
            fetched_at: document.fetched_at,
        })
    }

    /// Load a snapshot document from disk.
    ///
    /// # Errors
    /// Fails if the file can't be read or parsed.
    #[instrument]
    pub async fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        let ledger = Self::from_json_str(&json)?;

        info!(
            path = %path.display(),
            books = ledger.books.len(),
            fetched_at = ?ledger.fetched_at,
            "Ledger snapshot loaded"
        );

        Ok(ledger)
    }

    /// Capture time recorded in the document.
    pub const fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}

#[async_trait]
impl LedgerQuery for SnapshotLedger {
    async fn book_offers(
        &self,
        taker_gets: &Asset,
        taker_pays: &Asset,
        limit: u32,
    ) -> Result<Vec<Value>> {
        let offers: Vec<Value> = self
            .books
            .get(&(taker_gets.clone(), taker_pays.clone()))
            .map(|entries| entries.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default();

        debug!(
            gets = %taker_gets,
            pays = %taker_pays,
            count = offers.len(),
            "Serving snapshot book"
        );

        Ok(offers)
    }

    async fn reserve_info(&self, account: &str) -> Result<ReserveInfo> {
        debug!(account, "Serving snapshot reserve");
        Ok(self.reserve)
    }
}
