/// Yahoo suffix for Tokyo Stock Exchange listings
pub const DEFAULT_MARKET_SUFFIX: &str = ".T";

/// Currency holdings are quoted in unless configured otherwise
pub const DEFAULT_CURRENCY: &str = "JPY";

/// Trailing window of daily candles shown per holding
pub const DEFAULT_HISTORY_DAYS: i64 = 10;

/// Decimal places for every displayed currency amount
pub const CURRENCY_DECIMALS: u32 = 0;

/// Display name for security codes missing from the company directory
pub const UNKNOWN_COMPANY_LABEL: &str = "Unknown company";
