use std::{sync::Arc, time::Instant};

use serde_json::json;
use stockdash_core::{dashboard::PortfolioSnapshot, Error as CoreError};

use crate::{
    events::{
        ServerEvent, PORTFOLIO_REFRESH_COMPLETE, PORTFOLIO_REFRESH_ERROR, PORTFOLIO_REFRESH_START,
    },
    main_lib::AppState,
};

/// Runs one refresh cycle and announces it on the event bus.
///
/// `portfolio:refresh-error` is published when every holding failed to price,
/// followed by `portfolio:refresh-complete` since a snapshot exists. A cycle
/// whose totals cannot be computed publishes only `portfolio:refresh-error`.
pub async fn run_refresh(state: &AppState) -> Result<Arc<PortfolioSnapshot>, CoreError> {
    let event_bus = &state.event_bus;
    event_bus.publish(ServerEvent::new(PORTFOLIO_REFRESH_START));

    let started = Instant::now();
    let snapshot = match state.dashboard_service.refresh().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!("Refresh failed: {}", e);
            event_bus.publish(ServerEvent::with_payload(
                PORTFOLIO_REFRESH_ERROR,
                json!({ "message": e.to_string() }),
            ));
            return Err(e);
        }
    };

    let failed_symbols: Vec<&str> = snapshot
        .holdings
        .iter()
        .filter_map(|report| report.outcome.failure())
        .map(|failure| failure.symbol.as_str())
        .collect();

    if !snapshot.holdings.is_empty() && failed_symbols.len() == snapshot.holdings.len() {
        let message = format!(
            "No prices could be fetched for {} holdings",
            snapshot.holdings.len()
        );
        tracing::error!("Refresh v{} failed: {}", snapshot.version, message);
        event_bus.publish(ServerEvent::with_payload(
            PORTFOLIO_REFRESH_ERROR,
            json!({ "version": snapshot.version, "message": message }),
        ));
    } else if !failed_symbols.is_empty() {
        tracing::warn!(
            "Refresh v{} completed with failures: {}",
            snapshot.version,
            failed_symbols.join(", ")
        );
    }

    tracing::info!(
        "Refresh v{} completed in {:?}",
        snapshot.version,
        started.elapsed()
    );
    event_bus.publish(ServerEvent::with_payload(
        PORTFOLIO_REFRESH_COMPLETE,
        json!({ "version": snapshot.version, "failedSymbols": failed_symbols }),
    ));

    Ok(snapshot)
}

/// Latest snapshot, running the first refresh when there is none yet.
pub async fn current_snapshot(state: &AppState) -> Result<Arc<PortfolioSnapshot>, CoreError> {
    match state.dashboard_service.latest() {
        Some(snapshot) => Ok(snapshot),
        None => run_refresh(state).await,
    }
}
