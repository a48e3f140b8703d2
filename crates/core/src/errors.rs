//! Core error types for Stockdash.
//!
//! Per-holding fetch failures are not errors at this level: they are carried
//! as [`FetchFailure`](crate::portfolio::valuation::FetchFailure) values so a
//! single bad symbol never aborts a refresh.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the dashboard core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Calculation failed: {0}")]
    Calculation(String),
}

/// Validation errors for holdings configuration.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Holding {security_code}: purchase price must be positive, got {value}")]
    NonPositivePrice { security_code: u32, value: String },

    #[error("Holding {security_code}: quantity must be positive")]
    ZeroQuantity { security_code: u32 },

    #[error("Holding {0} is listed more than once")]
    DuplicateHolding(u32),

    #[error("Holding {security_code}: purchase amount is out of range")]
    AmountOverflow { security_code: u32 },
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ConfigIO(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigIO(err.to_string())
    }
}
