//! Stockdash Market Data Crate
//!
//! Provider-agnostic access to the two things the dashboard needs per
//! symbol: the latest regular-market price and a trailing OHLC history.
//!
//! # Core Types
//!
//! - [`MarketDataProvider`] - Trait every data source implements
//! - [`YahooProvider`] - Yahoo Finance implementation
//! - [`Quote`] - Market data quote with OHLCV data
//! - [`Interval`] - Bucket size for history requests
//! - [`MarketDataError`] - Provider-side failure

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{Interval, Quote};
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
