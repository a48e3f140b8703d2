use std::sync::Arc;

use anyhow::Context;
use stockdash_core::dashboard::{DashboardService, DashboardServiceTrait, DashboardSettings};
use stockdash_core::holdings::{CompanyDirectory, HoldingsConfig};
use stockdash_market_data::{MarketDataProvider, YahooProvider};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    config::{Config, LogFormat},
    events::EventBus,
    render::Theme,
};

pub struct AppState {
    pub dashboard_service: Arc<dyn DashboardServiceTrait>,
    pub event_bus: EventBus,
    pub default_theme: Theme,
    pub refresh_on_view: bool,
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

fn load_holdings(config: &Config) -> anyhow::Result<HoldingsConfig> {
    let holdings = match &config.holdings_file {
        Some(path) => HoldingsConfig::load_from_file(path)
            .with_context(|| format!("Failed to load holdings from {}", path.display()))?,
        None => {
            tracing::info!("SD_HOLDINGS_FILE not set, using built-in holdings");
            HoldingsConfig::default()
        }
    };
    Ok(match &config.market_suffix {
        Some(suffix) => holdings.with_market_suffix(suffix.clone()),
        None => holdings,
    })
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider = YahooProvider::new().context("Failed to create Yahoo provider")?;
    build_state_with_provider(config, Arc::new(provider))
}

/// Wires the dashboard around any market data provider.
pub fn build_state_with_provider(
    config: &Config,
    provider: Arc<dyn MarketDataProvider>,
) -> anyhow::Result<Arc<AppState>> {
    let holdings = load_holdings(config)?;
    tracing::info!(
        "Tracking {} holdings (suffix '{}', currency {}) via {}",
        holdings.holdings.len(),
        holdings.market_suffix,
        holdings.currency,
        provider.id()
    );

    let settings = DashboardSettings {
        history_days: config.history_days,
        failed_holding_policy: config.failed_holding_policy,
        ..DashboardSettings::default()
    };
    let dashboard_service: Arc<dyn DashboardServiceTrait> = Arc::new(DashboardService::new(
        holdings,
        CompanyDirectory::default(),
        provider,
        settings,
    ));

    Ok(Arc::new(AppState {
        dashboard_service,
        event_bus: EventBus::new(64),
        default_theme: config.theme,
        refresh_on_view: config.refresh_on_view,
    }))
}
