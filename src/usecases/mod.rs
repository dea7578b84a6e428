//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the engine's workflows.
//!
//! Use cases:
//! - `PricingService`: Snapshot fetch → quality → walk → statistics → advisories

pub mod pricing;

pub use pricing::{Advisory, PricingReport, PricingRequest, PricingService};
