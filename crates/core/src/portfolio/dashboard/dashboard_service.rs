use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, FixedOffset, Offset, Utc};
use log::{debug, error, info, warn};
use tokio::sync::Mutex;

use stockdash_market_data::{Interval, MarketDataProvider};

use crate::constants::DEFAULT_HISTORY_DAYS;
use crate::errors::Result;
use crate::portfolio::dashboard::{
    HistoryOutcome, HoldingReport, PortfolioSnapshot, PriceHistoryPoint, SnapshotStore,
};
use crate::portfolio::holdings::{CompanyDirectory, Holding, HoldingsConfig};
use crate::portfolio::valuation::{
    calculate_valuation, summarize, FailedHoldingPolicy, FetchFailure, HoldingOutcome,
    DEFAULT_FAILED_HOLDING_POLICY,
};

/// Tokyo Stock Exchange local time
const DEFAULT_MARKET_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// Knobs for a refresh cycle.
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub history_days: i64,
    pub history_interval: Interval,
    pub failed_holding_policy: FailedHoldingPolicy,
    /// Offset used to turn quote timestamps into trading dates
    pub market_utc_offset: FixedOffset,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            history_days: DEFAULT_HISTORY_DAYS,
            history_interval: Interval::OneDay,
            failed_holding_policy: DEFAULT_FAILED_HOLDING_POLICY,
            market_utc_offset: FixedOffset::east_opt(DEFAULT_MARKET_UTC_OFFSET_SECS)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}

#[async_trait]
pub trait DashboardServiceTrait: Send + Sync {
    /// Runs one full fetch-and-value cycle and publishes the result.
    ///
    /// Per-holding failures end up in the snapshot. Only totals that leave
    /// the `Decimal` range fail the cycle, and nothing is published then.
    async fn refresh(&self) -> Result<Arc<PortfolioSnapshot>>;

    /// Latest published snapshot, if any refresh has completed.
    fn latest(&self) -> Option<Arc<PortfolioSnapshot>>;

    /// Latest snapshot, refreshing first when none exists yet.
    async fn latest_or_refresh(&self) -> Result<Arc<PortfolioSnapshot>> {
        match self.latest() {
            Some(snapshot) => Ok(snapshot),
            None => self.refresh().await,
        }
    }

    fn holdings_config(&self) -> &HoldingsConfig;
}

pub struct DashboardService {
    config: HoldingsConfig,
    directory: CompanyDirectory,
    provider: Arc<dyn MarketDataProvider>,
    settings: DashboardSettings,
    store: SnapshotStore,
    refresh_lock: Mutex<()>,
}

impl DashboardService {
    pub fn new(
        config: HoldingsConfig,
        directory: CompanyDirectory,
        provider: Arc<dyn MarketDataProvider>,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            config,
            directory,
            provider,
            settings,
            store: SnapshotStore::new(),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    async fn fetch_outcome(&self, holding: &Holding, symbol: &str) -> HoldingOutcome {
        match self.provider.get_latest_quote(symbol).await {
            Ok(quote) => match calculate_valuation(holding, quote.close) {
                Ok(result) => HoldingOutcome::Valued(result),
                Err(e) => {
                    let failure = FetchFailure::new(symbol, e);
                    warn!("{}", failure);
                    HoldingOutcome::Failed(failure)
                }
            },
            Err(e) => {
                let failure = FetchFailure::new(symbol, e);
                warn!("{}", failure);
                HoldingOutcome::Failed(failure)
            }
        }
    }

    async fn fetch_history(&self, symbol: &str) -> HistoryOutcome {
        let end = Utc::now();
        let start = end - Duration::days(self.settings.history_days);

        match self
            .provider
            .get_historical_quotes(symbol, start, end, self.settings.history_interval)
            .await
        {
            Ok(quotes) => HistoryOutcome::Loaded {
                points: quotes
                    .iter()
                    .map(|q| PriceHistoryPoint::from_quote(q, &self.settings.market_utc_offset))
                    .collect(),
            },
            Err(e) => {
                let failure = FetchFailure::new(symbol, e);
                warn!("{}", failure);
                HistoryOutcome::Failed(failure)
            }
        }
    }

    async fn build_report(&self, holding: &Holding) -> HoldingReport {
        let symbol = self.config.symbol_for(holding);
        let outcome = self.fetch_outcome(holding, &symbol).await;
        let history = self.fetch_history(&symbol).await;

        HoldingReport {
            holding: holding.clone(),
            company_name: self.directory.display_name(holding),
            symbol,
            outcome,
            history,
        }
    }
}

#[async_trait]
impl DashboardServiceTrait for DashboardService {
    async fn refresh(&self) -> Result<Arc<PortfolioSnapshot>> {
        let _guard = self.refresh_lock.lock().await;
        debug!(
            "Refreshing dashboard for {} holdings via {}",
            self.config.holdings.len(),
            self.provider.id()
        );

        // Holdings are processed one at a time, price before history.
        let mut reports = Vec::with_capacity(self.config.holdings.len());
        for holding in &self.config.holdings {
            reports.push(self.build_report(holding).await);
        }

        let totals = summarize(
            reports.iter().map(|r| (&r.holding, &r.outcome)),
            self.settings.failed_holding_policy,
        )
        .map_err(|e| {
            error!("Refresh abandoned: {}", e);
            e
        })?;

        let snapshot = PortfolioSnapshot {
            version: self.store.next_version(),
            generated_at: Utc::now(),
            currency: self.config.currency.clone(),
            failed_holding_policy: self.settings.failed_holding_policy,
            totals,
            holdings: reports,
        };

        let failed = snapshot
            .holdings
            .iter()
            .filter(|r| !r.outcome.is_valued())
            .count();
        info!(
            "Published snapshot v{}: {} holdings, {} without price",
            snapshot.version,
            snapshot.holdings.len(),
            failed
        );

        Ok(self.store.publish(snapshot))
    }

    fn latest(&self) -> Option<Arc<PortfolioSnapshot>> {
        self.store.latest()
    }

    fn holdings_config(&self) -> &HoldingsConfig {
        &self.config
    }
}
