//! Error types for the market data crate.
//!
//! Providers report failures with enough detail for logging. Callers that
//! only care whether a fetch worked can treat every variant the same way.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No data available for the requested date range.
    /// The symbol exists but has no quotes in the specified period.
    #[error("No data for date range")]
    NoDataForRange,

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data that failed validation checks.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    pub(crate) fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("9999.T".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: 9999.T");

        let error = MarketDataError::NoDataForRange;
        assert_eq!(format!("{}", error), "No data for date range");

        let error = MarketDataError::provider("YAHOO", "Internal server error");
        assert_eq!(
            format!("{}", error),
            "Provider error: YAHOO - Internal server error"
        );

        let error = MarketDataError::ValidationFailed {
            message: "Invalid timestamp: -1".to_string(),
        };
        assert_eq!(format!("{}", error), "Validation failed: Invalid timestamp: -1");
    }
}
