use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market data quote
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    /// Timestamp of the quote
    pub timestamp: DateTime<Utc>,

    /// Opening price (optional for intraday)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,

    /// High price (optional for intraday)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,

    /// Low price (optional for intraday)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,

    /// Closing/current price (required)
    pub close: Decimal,

    /// Trading volume (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,

    /// Quote currency, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Source of the quote (YAHOO, ...)
    pub source: String,
}

impl Quote {
    /// Create a new quote with minimal required fields
    pub fn new(timestamp: DateTime<Utc>, close: Decimal, source: &str) -> Self {
        Self {
            timestamp,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
            currency: None,
            source: source.to_string(),
        }
    }

    /// Create an OHLC quote
    pub fn ohlc(
        timestamp: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        source: &str,
    ) -> Self {
        Self {
            open: Some(open),
            high: Some(high),
            low: Some(low),
            ..Self::new(timestamp, close, source)
        }
    }

    /// Whether open, high and low are all present.
    pub fn has_ohlc(&self) -> bool {
        self.open.is_some() && self.high.is_some() && self.low.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_new() {
        let quote = Quote::new(Utc::now(), dec!(3500), "YAHOO");
        assert_eq!(quote.close, dec!(3500));
        assert_eq!(quote.source, "YAHOO");
        assert!(quote.open.is_none());
        assert!(!quote.has_ohlc());
    }

    #[test]
    fn test_quote_ohlc() {
        let quote = Quote::ohlc(
            Utc::now(),
            dec!(3480),
            dec!(3525),
            dec!(3470),
            dec!(3500),
            "YAHOO",
        );
        assert_eq!(quote.open, Some(dec!(3480)));
        assert_eq!(quote.high, Some(dec!(3525)));
        assert_eq!(quote.low, Some(dec!(3470)));
        assert_eq!(quote.close, dec!(3500));
        assert!(quote.volume.is_none());
        assert!(quote.has_ohlc());
    }
}
