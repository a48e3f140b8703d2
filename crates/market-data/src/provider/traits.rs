//! Market data provider trait definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::MarketDataError;
use crate::models::{Interval, Quote};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
/// Symbols are passed through untouched, so they must already carry any
/// exchange suffix the provider expects (e.g. `3097.T` for Yahoo).
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use stockdash_market_data::{Interval, MarketDataError, MarketDataProvider, Quote};
///
/// struct FixedPriceProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for FixedPriceProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
///         Ok(Quote::new(Utc::now(), dec!(100), self.id()))
///     }
///
///     // ... implement get_historical_quotes
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO".
    fn id(&self) -> &'static str;

    /// Fetch the latest regular-market quote for a symbol.
    ///
    /// `Quote::close` carries the latest traded price.
    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Fetch historical quotes for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Provider symbol, suffix included
    /// * `start` - Start of the date range (inclusive)
    /// * `end` - End of the date range (inclusive)
    /// * `interval` - Bucket size of each returned quote
    ///
    /// # Returns
    ///
    /// The quotes ordered by timestamp ascending, or a `MarketDataError`.
    async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Interval,
    ) -> Result<Vec<Quote>, MarketDataError>;
}
