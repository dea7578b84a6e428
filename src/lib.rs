//! DEX Book Pricer — Library Root
//!
//! Order-book pricing and execution-simulation engine for ledger DEX
//! offers. Re-exports all modules for integration tests and benchmarks.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
