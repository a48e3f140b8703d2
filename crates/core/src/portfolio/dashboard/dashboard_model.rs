//! Dashboard snapshot models.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockdash_market_data::Quote;

use crate::portfolio::holdings::Holding;
use crate::portfolio::valuation::{
    outcome_figures, FailedHoldingPolicy, FetchFailure, HoldingOutcome, PortfolioTotals,
    ValuationResult,
};

/// One daily OHLC candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryPoint {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

impl PriceHistoryPoint {
    /// Builds a candle from a provider quote, dated in the market's local time.
    /// Missing open/high/low fall back to the close.
    pub fn from_quote(quote: &Quote, market_offset: &FixedOffset) -> Self {
        let close = quote.close;
        Self {
            date: quote.timestamp.with_timezone(market_offset).date_naive(),
            open: quote.open.unwrap_or(close),
            high: quote.high.unwrap_or(close),
            low: quote.low.unwrap_or(close),
            close,
        }
    }

    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// Trailing history of a holding, or why it is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum HistoryOutcome {
    Loaded { points: Vec<PriceHistoryPoint> },
    Failed(FetchFailure),
}

impl HistoryOutcome {
    pub fn points(&self) -> &[PriceHistoryPoint] {
        match self {
            HistoryOutcome::Loaded { points } => points,
            HistoryOutcome::Failed(_) => &[],
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            HistoryOutcome::Failed(failure) => Some(failure),
            HistoryOutcome::Loaded { .. } => None,
        }
    }
}

/// Everything the dashboard shows for one holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingReport {
    pub holding: Holding,
    pub symbol: String,
    pub company_name: String,
    pub outcome: HoldingOutcome,
    pub history: HistoryOutcome,
}

impl HoldingReport {
    /// Figures to display; zero sentinels when the price fetch failed.
    pub fn figures(&self) -> ValuationResult {
        outcome_figures(&self.holding, &self.outcome)
    }

    /// Price and history failures, in that order.
    pub fn failures(&self) -> Vec<&FetchFailure> {
        self.outcome
            .failure()
            .into_iter()
            .chain(self.history.failure())
            .collect()
    }
}

/// Result of one refresh cycle. Never mutated after publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub version: u64,
    pub generated_at: DateTime<Utc>,
    pub currency: String,
    pub failed_holding_policy: FailedHoldingPolicy,
    pub totals: PortfolioTotals,
    pub holdings: Vec<HoldingReport>,
}

impl PortfolioSnapshot {
    pub fn holding(&self, security_code: u32) -> Option<&HoldingReport> {
        self.holdings
            .iter()
            .find(|report| report.holding.security_code == security_code)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FetchFailure> {
        self.holdings.iter().flat_map(|report| report.failures())
    }
}
