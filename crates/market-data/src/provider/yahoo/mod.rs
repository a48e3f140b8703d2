//! Yahoo Finance market data provider.
//!
//! Serves latest prices and daily OHLC history for listed equities,
//! including Tokyo Stock Exchange codes (e.g., `3097.T`).

mod models;

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use num_traits::FromPrimitive;
use reqwest::header;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{Interval, Quote};
use crate::provider::MarketDataProvider;

use models::{YahooPriceData, YahooQuoteSummaryResponse};

const PROVIDER_ID: &str = "YAHOO";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    client: reqwest::Client,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Failed to initialize Yahoo connector: {}", e),
            )
        })?;
        Ok(Self {
            connector,
            client: reqwest::Client::new(),
        })
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        if let Some(crumb) = YAHOO_CRUMB.read().ok().and_then(|guard| guard.clone()) {
            return Ok(crumb);
        }
        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to get cookie: {}", e)))?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::provider(PROVIDER_ID, "Failed to parse Yahoo cookie"))?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to get crumb: {}", e)))?
            .text()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to read crumb: {}", e)))?;

        let crumb_data = CrumbData { cookie, crumb };
        if let Ok(mut guard) = YAHOO_CRUMB.write() {
            *guard = Some(crumb_data.clone());
        }
        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        if let Ok(mut guard) = YAHOO_CRUMB.write() {
            *guard = None;
        }
    }

    // ========================================================================
    // Quote Fetching
    // ========================================================================

    /// Convert chrono DateTime<Utc> to time::OffsetDateTime for the Yahoo API.
    fn chrono_to_offset_datetime(dt: DateTime<Utc>) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(dt.timestamp())
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
    }

    fn map_yahoo_error(symbol: &str, e: yahoo::YahooError) -> MarketDataError {
        if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
            MarketDataError::SymbolNotFound(symbol.to_string())
        } else {
            MarketDataError::provider(PROVIDER_ID, e.to_string())
        }
    }

    /// Convert a Yahoo quote to our Quote model.
    fn yahoo_quote_to_quote(yahoo_quote: yahoo::Quote) -> Result<Quote, MarketDataError> {
        let timestamp: DateTime<Utc> = Utc
            .timestamp_opt(yahoo_quote.timestamp as i64, 0)
            .single()
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("Invalid timestamp: {}", yahoo_quote.timestamp),
            })?;

        // Close price is required
        let close = Decimal::from_f64_retain(yahoo_quote.close).ok_or_else(|| {
            MarketDataError::ValidationFailed {
                message: format!(
                    "Failed to convert close price {} to Decimal",
                    yahoo_quote.close
                ),
            }
        })?;

        Ok(Quote {
            timestamp,
            open: Decimal::from_f64_retain(yahoo_quote.open),
            high: Decimal::from_f64_retain(yahoo_quote.high),
            low: Decimal::from_f64_retain(yahoo_quote.low),
            close,
            volume: Decimal::from_u64(yahoo_quote.volume),
            currency: None,
            source: PROVIDER_ID.to_string(),
        })
    }

    /// Fetch latest quote using primary method (chart API).
    async fn fetch_latest_quote_primary(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let response = self
            .connector
            .get_latest_quotes(symbol, Interval::OneDay.as_str())
            .await
            .map_err(|e| Self::map_yahoo_error(symbol, e))?;

        chart_to_latest_quote(symbol, &response)
    }

    /// Fetch latest quote using backup method (quoteSummary price module).
    async fn fetch_latest_quote_backup(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price&crumb={}",
            encode(symbol),
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| {
                MarketDataError::provider(PROVIDER_ID, format!("Backup quote request failed: {}", e))
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb();
            return Err(MarketDataError::provider(
                PROVIDER_ID,
                "Yahoo authentication expired",
            ));
        }

        let data: YahooQuoteSummaryResponse = response.json().await.map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Failed to parse backup quote response: {}", e),
            )
        })?;

        let price = data
            .quote_summary
            .result
            .into_iter()
            .next()
            .and_then(|r| r.price)
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        price_data_to_quote(price)
    }
}

/// Latest price from a chart response.
///
/// The last bar of the current session often has a null close while the
/// market is open, so `meta.regularMarketPrice` wins whenever Yahoo reports
/// it. The last complete bar is the fallback.
fn chart_to_latest_quote(
    symbol: &str,
    response: &yahoo::YResponse,
) -> Result<Quote, MarketDataError> {
    let meta = response.metadata().ok();
    let market_price = meta
        .as_ref()
        .and_then(|m| m.regular_market_price)
        .and_then(Decimal::from_f64_retain);
    let market_time = meta
        .as_ref()
        .and_then(|m| m.regular_market_time)
        .and_then(|t| Utc.timestamp_opt(i64::from(t), 0).single());

    match (response.last_quote(), market_price) {
        (Ok(bar), Some(price)) => {
            let mut quote = YahooProvider::yahoo_quote_to_quote(bar)?;
            quote.close = price;
            if let Some(time) = market_time {
                quote.timestamp = time;
            }
            Ok(quote)
        }
        (Ok(bar), None) => YahooProvider::yahoo_quote_to_quote(bar),
        (Err(e), Some(price)) => {
            debug!("No complete bar for {} ({}), using market price", symbol, e);
            Ok(Quote::new(
                market_time.unwrap_or_else(Utc::now),
                price,
                PROVIDER_ID,
            ))
        }
        (Err(e), None) => {
            warn!("No quotes returned for {}: {}", symbol, e);
            Err(MarketDataError::SymbolNotFound(symbol.to_string()))
        }
    }
}

/// Map the quoteSummary `price` module to a quote. `regularMarketPrice` is required.
fn price_data_to_quote(price: YahooPriceData) -> Result<Quote, MarketDataError> {
    let raw = |detail: &Option<models::YahooPriceDetail>| {
        detail
            .as_ref()
            .and_then(|p| p.raw)
            .and_then(Decimal::from_f64_retain)
    };

    let close = raw(&price.regular_market_price).ok_or_else(|| {
        MarketDataError::ValidationFailed {
            message: "No valid price in backup response".to_string(),
        }
    })?;

    let timestamp = price
        .regular_market_time
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .unwrap_or_else(Utc::now);

    Ok(Quote {
        timestamp,
        open: raw(&price.regular_market_open),
        high: raw(&price.regular_market_day_high),
        low: raw(&price.regular_market_day_low),
        close,
        volume: raw(&price.regular_market_volume),
        currency: price.currency,
        source: PROVIDER_ID.to_string(),
    })
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        debug!("Fetching latest quote for {} from Yahoo", symbol);

        match self.fetch_latest_quote_primary(symbol).await {
            Ok(quote) => return Ok(quote),
            Err(e) => {
                debug!(
                    "Primary quote fetch failed for {}: {}, trying backup",
                    symbol, e
                );
            }
        }

        self.fetch_latest_quote_backup(symbol).await
    }

    async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Interval,
    ) -> Result<Vec<Quote>, MarketDataError> {
        debug!(
            "Fetching {} history for {} from {} to {} from Yahoo",
            interval,
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        let start_time = Self::chrono_to_offset_datetime(start);
        let end_time = Self::chrono_to_offset_datetime(end);

        let response = self
            .connector
            .get_quote_history_interval(symbol, start_time, end_time, interval.as_str())
            .await
            .map_err(|e| Self::map_yahoo_error(symbol, e))?;

        match response.quotes() {
            Ok(yahoo_quotes) => {
                let mut quotes: Vec<Quote> = yahoo_quotes
                    .into_iter()
                    .filter_map(|q| match Self::yahoo_quote_to_quote(q) {
                        Ok(quote) => Some(quote),
                        Err(e) => {
                            warn!("Skipping quote due to conversion error: {:?}", e);
                            None
                        }
                    })
                    .collect();

                if quotes.is_empty() {
                    return Err(MarketDataError::NoDataForRange);
                }

                quotes.sort_by_key(|q| q.timestamp);
                Ok(quotes)
            }
            Err(yahoo::YahooError::NoQuotes) => {
                warn!(
                    "No historical quotes returned for '{}' between {} and {}",
                    symbol,
                    start.format("%Y-%m-%d"),
                    end.format("%Y-%m-%d")
                );
                Err(MarketDataError::NoDataForRange)
            }
            Err(e) => Err(MarketDataError::provider(PROVIDER_ID, e.to_string())),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use models::YahooPriceDetail;
    use rust_decimal_macros::dec;

    fn detail(raw: f64) -> Option<YahooPriceDetail> {
        Some(YahooPriceDetail { raw: Some(raw) })
    }

    #[test]
    fn test_price_data_to_quote() {
        let price = YahooPriceData {
            currency: Some("JPY".to_string()),
            regular_market_price: detail(3500.0),
            regular_market_open: detail(3480.0),
            regular_market_day_high: detail(3525.0),
            regular_market_day_low: None,
            regular_market_volume: detail(120400.0),
            regular_market_time: Some(1760680800),
        };

        let quote = price_data_to_quote(price).unwrap();
        assert_eq!(quote.close, dec!(3500));
        assert_eq!(quote.open, Some(dec!(3480)));
        assert_eq!(quote.high, Some(dec!(3525)));
        assert_eq!(quote.low, None);
        assert_eq!(quote.currency.as_deref(), Some("JPY"));
        assert_eq!(quote.source, "YAHOO");
        assert_eq!(quote.timestamp.timestamp(), 1760680800);
    }

    #[test]
    fn test_price_data_without_market_price_fails() {
        let price = YahooPriceData {
            currency: Some("JPY".to_string()),
            regular_market_price: Some(YahooPriceDetail { raw: None }),
            regular_market_open: None,
            regular_market_day_high: None,
            regular_market_day_low: None,
            regular_market_volume: None,
            regular_market_time: None,
        };

        let err = price_data_to_quote(price).unwrap_err();
        assert!(matches!(err, MarketDataError::ValidationFailed { .. }));
    }

    fn chart_fixture(regular_market_price: &str) -> yahoo::YResponse {
        let json = format!(
            r#"{{
                "chart": {{
                    "result": [{{
                        "meta": {{
                            "currency": "JPY",
                            "symbol": "3097.T",
                            "instrumentType": "EQUITY",
                            "exchangeName": "JPX",
                            "fullExchangeName": "Tokyo",
                            "regularMarketTime": 1760680800,
                            "gmtoffset": 32400,
                            "timezone": "JST",
                            "exchangeTimezoneName": "Asia/Tokyo",
                            "regularMarketPrice": {price},
                            "hasPrePostMarketData": false,
                            "priceHint": 2,
                            "currentTradingPeriod": {{
                                "pre": {{ "timezone": "JST", "start": 1760655600, "end": 1760655600, "gmtoffset": 32400 }},
                                "regular": {{ "timezone": "JST", "start": 1760655600, "end": 1760678400, "gmtoffset": 32400 }},
                                "post": {{ "timezone": "JST", "start": 1760678400, "end": 1760678400, "gmtoffset": 32400 }}
                            }},
                            "dataGranularity": "1d",
                            "range": "1d",
                            "validRanges": ["1d", "5d"]
                        }},
                        "timestamp": [1760569200, 1760655600],
                        "indicators": {{
                            "quote": [{{
                                "open": [3400.0, null],
                                "high": [3440.0, null],
                                "low": [3390.0, null],
                                "close": [3420.0, null],
                                "volume": [98000, null]
                            }}]
                        }}
                    }}],
                    "error": null
                }}
            }}"#,
            price = regular_market_price
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_chart_prefers_regular_market_price() {
        let response = chart_fixture("3500.0");
        let quote = chart_to_latest_quote("3097.T", &response).unwrap();
        assert_eq!(quote.close, dec!(3500));
        assert_eq!(quote.timestamp.timestamp(), 1760680800);
        assert_eq!(quote.source, "YAHOO");
    }

    #[test]
    fn test_chart_falls_back_to_last_complete_bar() {
        let response = chart_fixture("null");
        let quote = chart_to_latest_quote("3097.T", &response).unwrap();
        assert_eq!(quote.close, dec!(3420));
        assert_eq!(quote.open, Some(dec!(3400)));
        assert_eq!(quote.timestamp.timestamp(), 1760569200);
    }

    #[test]
    fn test_chrono_to_offset_datetime() {
        let dt = Utc.with_ymd_and_hms(2025, 10, 17, 6, 0, 0).unwrap();
        let converted = YahooProvider::chrono_to_offset_datetime(dt);
        assert_eq!(converted.unix_timestamp(), dt.timestamp());
    }
}
