pub mod company_directory;
pub mod holdings_model;

pub use company_directory::CompanyDirectory;
pub use holdings_model::{Holding, HoldingsConfig};
