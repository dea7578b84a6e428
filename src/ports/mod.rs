//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use-case layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `LedgerQuery`: Order-book and account-reserve snapshots

pub mod ledger;

pub use ledger::LedgerQuery;
