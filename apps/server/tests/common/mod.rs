#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use stockdash_market_data::{Interval, MarketDataError, MarketDataProvider, Quote};
use stockdash_server::{api::app_router, build_state_with_provider, config::Config, AppState};
use tower::ServiceExt;

/// Prices a fixed set of symbols; every other symbol fails.
#[derive(Default)]
pub struct MockProvider {
    prices: Mutex<HashMap<String, Decimal>>,
}

impl MockProvider {
    pub fn with_prices(prices: &[(&str, Decimal)]) -> Self {
        let provider = Self::default();
        {
            let mut map = provider.prices.lock().unwrap();
            for (symbol, price) in prices {
                map.insert(symbol.to_string(), *price);
            }
        }
        provider
    }

    pub fn set_price(&self, symbol: &str, price: Decimal) {
        self.prices
            .lock()
            .unwrap()
            .insert(symbol.to_string(), price);
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        match self.prices.lock().unwrap().get(symbol) {
            Some(price) => Ok(Quote::new(Utc::now(), *price, "MOCK")),
            None => Err(MarketDataError::SymbolNotFound(symbol.to_string())),
        }
    }

    async fn get_historical_quotes(
        &self,
        symbol: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        _interval: Interval,
    ) -> Result<Vec<Quote>, MarketDataError> {
        let close = match self.prices.lock().unwrap().get(symbol) {
            Some(price) => *price,
            None => return Err(MarketDataError::NoDataForRange),
        };
        let day = Utc.with_ymd_and_hms(2025, 10, 16, 15, 0, 0).unwrap();
        Ok(vec![
            Quote::ohlc(
                day,
                close - Decimal::TEN,
                close + Decimal::TEN,
                close - Decimal::ONE_HUNDRED,
                close,
                "MOCK",
            ),
            Quote::ohlc(
                day + Duration::days(1),
                close,
                close + Decimal::ONE,
                close - Decimal::TEN,
                close - Decimal::ONE,
                "MOCK",
            ),
        ])
    }
}

pub fn config_with(pairs: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub fn app_with(config: &Config, provider: Arc<MockProvider>) -> (Router, Arc<AppState>) {
    let state = build_state_with_provider(config, provider).unwrap();
    (app_router(state.clone(), config), state)
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn decimal_at(value: &serde_json::Value) -> Decimal {
    value
        .as_str()
        .expect("decimal serialized as string")
        .parse()
        .unwrap()
}
