use std::{convert::Infallible, sync::Arc, time::Duration};

use crate::{
    api::shared::{current_snapshot, run_refresh},
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures_core::stream::Stream;
use serde::Serialize;
use stockdash_core::dashboard::{HistoryOutcome, PortfolioSnapshot};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingHistory {
    pub security_code: u32,
    pub symbol: String,
    pub snapshot_version: u64,
    pub history: HistoryOutcome,
}

async fn get_portfolio(State(state): State<Arc<AppState>>) -> ApiResult<Json<Arc<PortfolioSnapshot>>> {
    Ok(Json(current_snapshot(&state).await?))
}

async fn refresh_portfolio(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Arc<PortfolioSnapshot>>> {
    Ok(Json(run_refresh(&state).await?))
}

async fn get_holding_history(
    State(state): State<Arc<AppState>>,
    Path(security_code): Path<u32>,
) -> ApiResult<Json<HoldingHistory>> {
    let not_found = || ApiError::NotFound(format!("No holding with security code {}", security_code));

    // Unknown codes never trigger a refresh.
    let configured = state
        .dashboard_service
        .holdings_config()
        .holdings
        .iter()
        .any(|h| h.security_code == security_code);
    if !configured {
        return Err(not_found());
    }

    let snapshot = current_snapshot(&state).await?;
    let report = snapshot.holding(security_code).ok_or_else(not_found)?;
    Ok(Json(HoldingHistory {
        security_code,
        symbol: report.symbol.clone(),
        snapshot_version: snapshot.version,
        history: report.history.clone(),
    }))
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let receiver = BroadcastStream::new(state.event_bus.subscribe());
    let stream = tokio_stream::StreamExt::filter_map(receiver, |event| match event {
        Ok(evt) => {
            let sse_event = SseEvent::default().event(evt.name);
            let sse_event = if let Some(payload) = evt.payload {
                match sse_event.json_data(payload) {
                    Ok(ev) => ev,
                    Err(err) => {
                        tracing::error!(
                            "Failed to serialize SSE payload for {}: {}",
                            evt.name,
                            err
                        );
                        return None;
                    }
                }
            } else {
                sse_event.data("null")
            };
            Some(Ok(sse_event))
        }
        Err(BroadcastStreamRecvError::Lagged(_)) => None,
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolio", get(get_portfolio))
        .route("/portfolio/refresh", post(refresh_portfolio))
        .route(
            "/portfolio/holdings/{code}/history",
            get(get_holding_history),
        )
        .route("/events/stream", get(stream_events))
}
