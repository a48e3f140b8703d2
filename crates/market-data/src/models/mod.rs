//! Market data models
//!
//! - `quote` - Quote data structure (Quote)
//! - `interval` - History bucket size (Interval)

mod interval;
mod quote;

pub use interval::Interval;
pub use quote::Quote;
