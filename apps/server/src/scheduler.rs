//! Background scheduler for periodic portfolio refreshes.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::api::shared::run_refresh;
use crate::main_lib::AppState;

/// Spawns the refresh loop. Returns `None` when refreshing is disabled.
pub fn start_refresh_scheduler(
    state: Arc<AppState>,
    period: Option<Duration>,
) -> Option<tokio::task::JoinHandle<()>> {
    let period = period?;
    Some(tokio::spawn(async move {
        info!("Portfolio refresh scheduler started ({:?} interval)", period);

        let mut ticker = interval(period);
        // No catch-up bursts after a slow refresh.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // The first tick completes immediately, which primes the snapshot.
            ticker.tick().await;
            if let Err(e) = run_refresh(&state).await {
                warn!("Scheduled refresh skipped, keeping previous snapshot: {}", e);
            }
        }
    }))
}
