use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use stockdash_core::constants::DEFAULT_HISTORY_DAYS;
use stockdash_core::valuation::{FailedHoldingPolicy, DEFAULT_FAILED_HOLDING_POLICY};

use crate::render::Theme;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("Unknown log format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub holdings_file: Option<PathBuf>,
    pub market_suffix: Option<String>,
    pub history_days: i64,
    /// `None` disables the background refresh.
    pub refresh_interval: Option<Duration>,
    pub refresh_on_view: bool,
    pub theme: Theme,
    pub failed_holding_policy: FailedHoldingPolicy,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr: SocketAddr = var("SD_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("Invalid SD_LISTEN_ADDR")?;

        let holdings_file = var("SD_HOLDINGS_FILE").map(PathBuf::from);
        // An explicitly empty suffix is meaningful, so read it without the filter.
        let market_suffix = lookup("SD_MARKET_SUFFIX").map(|s| s.trim().to_string());

        let history_days: i64 = match var("SD_HISTORY_DAYS") {
            Some(v) => v.trim().parse().context("Invalid SD_HISTORY_DAYS")?,
            None => DEFAULT_HISTORY_DAYS,
        };
        if history_days <= 0 {
            return Err(anyhow!("SD_HISTORY_DAYS must be positive, got {}", history_days));
        }

        let refresh_secs: u64 = match var("SD_REFRESH_INTERVAL_SECS") {
            Some(v) => v.trim().parse().context("Invalid SD_REFRESH_INTERVAL_SECS")?,
            None => DEFAULT_REFRESH_INTERVAL_SECS,
        };
        let refresh_interval = (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs));

        let refresh_on_view = var("SD_REFRESH_ON_VIEW")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let theme = match var("SD_THEME") {
            Some(v) => v.parse().context("Invalid SD_THEME")?,
            None => Theme::default(),
        };

        let failed_holding_policy = match var("SD_FAILED_HOLDING_POLICY") {
            Some(v) => v.parse().context("Invalid SD_FAILED_HOLDING_POLICY")?,
            None => DEFAULT_FAILED_HOLDING_POLICY,
        };

        let cors_allow = var("SD_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let timeout_ms: u64 = match var("SD_REQUEST_TIMEOUT_MS") {
            Some(v) => v.trim().parse().context("Invalid SD_REQUEST_TIMEOUT_MS")?,
            None => DEFAULT_REQUEST_TIMEOUT_MS,
        };

        let log_format = match var("SD_LOG_FORMAT") {
            Some(v) => v.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            listen_addr,
            holdings_file,
            market_suffix,
            history_days,
            refresh_interval,
            refresh_on_view,
            theme,
            failed_holding_policy,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:8080");
        assert!(config.holdings_file.is_none());
        assert!(config.market_suffix.is_none());
        assert_eq!(config.history_days, 10);
        assert_eq!(config.refresh_interval, Some(Duration::from_secs(300)));
        assert!(!config.refresh_on_view);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(
            config.failed_holding_policy,
            FailedHoldingPolicy::ExcludeFromTotals
        );
        assert_eq!(config.cors_allow, vec!["*".to_string()]);
        assert_eq!(config.request_timeout, Duration::from_millis(30000));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SD_LISTEN_ADDR", "127.0.0.1:9000"),
            ("SD_HOLDINGS_FILE", "/tmp/holdings.json"),
            ("SD_MARKET_SUFFIX", ""),
            ("SD_HISTORY_DAYS", "20"),
            ("SD_REFRESH_INTERVAL_SECS", "0"),
            ("SD_REFRESH_ON_VIEW", "true"),
            ("SD_THEME", "dark"),
            ("SD_FAILED_HOLDING_POLICY", "include-cost"),
            ("SD_CORS_ALLOW_ORIGINS", "http://a.test, http://b.test"),
            ("SD_LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(
            config.holdings_file,
            Some(PathBuf::from("/tmp/holdings.json"))
        );
        assert_eq!(config.market_suffix.as_deref(), Some(""));
        assert_eq!(config.history_days, 20);
        assert!(config.refresh_interval.is_none());
        assert!(config.refresh_on_view);
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(
            config.failed_holding_policy,
            FailedHoldingPolicy::IncludePurchaseCost
        );
        assert_eq!(config.cors_allow.len(), 2);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_enumerated_values_fail() {
        assert!(config_from(&[("SD_THEME", "neon")]).is_err());
        assert!(config_from(&[("SD_FAILED_HOLDING_POLICY", "ignore")]).is_err());
        assert!(config_from(&[("SD_LOG_FORMAT", "xml")]).is_err());
        assert!(config_from(&[("SD_HISTORY_DAYS", "0")]).is_err());
        assert!(config_from(&[("SD_LISTEN_ADDR", "nowhere")]).is_err());
    }

    #[test]
    fn test_request_timeout_must_parse() {
        let config = config_from(&[("SD_REQUEST_TIMEOUT_MS", "1500")]).unwrap();
        assert_eq!(config.request_timeout, Duration::from_millis(1500));

        let err = config_from(&[("SD_REQUEST_TIMEOUT_MS", "30s")]).unwrap_err();
        assert!(err.to_string().contains("SD_REQUEST_TIMEOUT_MS"));
    }
}
