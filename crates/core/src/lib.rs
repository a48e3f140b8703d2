//! Stockdash Core - Holdings, valuation and dashboard snapshots.
//!
//! This crate contains the business logic of the dashboard. Market data is
//! reached only through the `MarketDataProvider` trait of the
//! `stockdash-market-data` crate.

pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod utils;

pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
