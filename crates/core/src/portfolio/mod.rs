pub mod dashboard;
pub mod holdings;
pub mod valuation;
