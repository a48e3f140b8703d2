//! Portfolio valuation domain models.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::Error;

/// Per-holding figures derived from one current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub current_price: Decimal,
    pub purchase_amount: Decimal,
    pub price_difference: Decimal,
    pub valuation: Decimal,
    pub profit_loss: Decimal,
}

/// A price or history fetch that did not succeed. Provider error kinds
/// collapse into the message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{symbol}: data fetch failed: {message}")]
pub struct FetchFailure {
    pub symbol: String,
    pub message: String,
}

impl FetchFailure {
    pub fn new(symbol: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self {
            symbol: symbol.into(),
            message: message.to_string(),
        }
    }
}

/// Outcome of valuing one holding in a refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum HoldingOutcome {
    Valued(ValuationResult),
    Failed(FetchFailure),
}

impl HoldingOutcome {
    pub fn is_valued(&self) -> bool {
        matches!(self, HoldingOutcome::Valued(_))
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            HoldingOutcome::Failed(failure) => Some(failure),
            HoldingOutcome::Valued(_) => None,
        }
    }
}

/// How a holding whose price fetch failed enters the portfolio totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailedHoldingPolicy {
    /// The holding contributes to neither total.
    #[default]
    ExcludeFromTotals,
    /// The holding's purchase amount counts; its profit/loss does not.
    IncludePurchaseCost,
}

/// Totals policy used unless configuration says otherwise.
pub const DEFAULT_FAILED_HOLDING_POLICY: FailedHoldingPolicy =
    FailedHoldingPolicy::ExcludeFromTotals;

impl FromStr for FailedHoldingPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclude" | "exclude-from-totals" => Ok(FailedHoldingPolicy::ExcludeFromTotals),
            "include-cost" | "include-purchase-cost" => Ok(FailedHoldingPolicy::IncludePurchaseCost),
            other => Err(Error::InvalidConfigValue(format!(
                "unknown failed holding policy '{}'",
                other
            ))),
        }
    }
}

/// Portfolio-wide aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub total_purchase_amount: Decimal,
    pub total_profit_loss: Decimal,
    /// Always `total_purchase_amount + total_profit_loss`
    pub total_valuation: Decimal,
}

impl PortfolioTotals {
    pub fn new(total_purchase_amount: Decimal, total_profit_loss: Decimal) -> Result<Self, Error> {
        let total_valuation = total_purchase_amount
            .checked_add(total_profit_loss)
            .ok_or_else(|| Error::Calculation("Total valuation is out of range".to_string()))?;
        Ok(Self {
            total_purchase_amount,
            total_profit_loss,
            total_valuation,
        })
    }
}
