//! Holdings domain models and configuration loading.

use std::collections::HashSet;
use std::path::Path;

use log::{error, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CURRENCY, DEFAULT_MARKET_SUFFIX};
use crate::errors::{Error, Result, ValidationError};

/// One owned position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Exchange-assigned code, e.g. a 4-digit Tokyo Stock Exchange code
    pub security_code: u32,
    /// Price per unit at acquisition
    pub purchase_price: Decimal,
    /// Units held
    pub quantity: u64,
    /// Overrides the company directory entry when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl Holding {
    pub fn new(security_code: u32, purchase_price: Decimal, quantity: u64) -> Self {
        Self {
            security_code,
            purchase_price,
            quantity,
            company_name: None,
        }
    }

    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    /// Provider lookup key: the security code followed by the market suffix.
    pub fn symbol(&self, market_suffix: &str) -> String {
        format!("{}{}", self.security_code, market_suffix)
    }

    pub fn quantity_decimal(&self) -> Decimal {
        Decimal::from(self.quantity)
    }

    /// `purchase_price * quantity`, or `None` when it does not fit a `Decimal`.
    pub fn purchase_amount(&self) -> Option<Decimal> {
        self.purchase_price.checked_mul(self.quantity_decimal())
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.purchase_price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice {
                security_code: self.security_code,
                value: self.purchase_price.to_string(),
            });
        }
        if self.quantity == 0 {
            return Err(ValidationError::ZeroQuantity {
                security_code: self.security_code,
            });
        }
        if self.purchase_amount().is_none() {
            return Err(ValidationError::AmountOverflow {
                security_code: self.security_code,
            });
        }
        Ok(())
    }
}

fn default_market_suffix() -> String {
    DEFAULT_MARKET_SUFFIX.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// The fixed set of holdings the dashboard tracks. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsConfig {
    #[serde(default = "default_market_suffix")]
    pub market_suffix: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub holdings: Vec<Holding>,
}

impl Default for HoldingsConfig {
    fn default() -> Self {
        Self {
            market_suffix: default_market_suffix(),
            currency: default_currency(),
            holdings: vec![
                Holding::new(3097, dec!(3230.0), 100),
                Holding::new(1952, dec!(1680), 300),
                Holding::new(8876, dec!(1771), 100),
            ],
        }
    }
}

impl HoldingsConfig {
    /// Parse and validate a JSON holdings document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: HoldingsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON holdings file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigIO(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&contents).map_err(|e| {
            error!("Rejected holdings file {}: {}", path.display(), e);
            e
        })?;
        info!(
            "Loaded {} holdings from {}",
            config.holdings.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn with_market_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.market_suffix = suffix.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.holdings.is_empty() {
            return Err(ValidationError::InvalidInput(
                "holdings list must not be empty".to_string(),
            )
            .into());
        }
        if self.currency.trim().is_empty() {
            return Err(ValidationError::InvalidInput("currency must not be empty".to_string()).into());
        }

        let mut seen = HashSet::new();
        let mut total_purchase = Decimal::ZERO;
        for holding in &self.holdings {
            holding.validate()?;
            if !seen.insert(holding.security_code) {
                return Err(ValidationError::DuplicateHolding(holding.security_code).into());
            }
            // Totals add every purchase amount, so the sum must fit as well.
            total_purchase = holding
                .purchase_amount()
                .and_then(|amount| total_purchase.checked_add(amount))
                .ok_or(ValidationError::AmountOverflow {
                    security_code: holding.security_code,
                })?;
        }
        Ok(())
    }

    pub fn symbol_for(&self, holding: &Holding) -> String {
        holding.symbol(&self.market_suffix)
    }
}
