//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! data sources. Live ledger transport is provided by the embedding
//! application; this crate ships a snapshot-backed implementation.
//!
//! Adapter categories:
//! - `snapshot`: JSON ledger snapshot served through `LedgerQuery`

pub mod snapshot;

pub use snapshot::SnapshotLedger;
