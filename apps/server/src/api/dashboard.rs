use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::{
    api::shared::{current_snapshot, run_refresh},
    error::{ApiError, ApiResult},
    main_lib::AppState,
    render::{render_dashboard, PageOptions, Theme},
};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub theme: Option<String>,
}

async fn dashboard_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Html<String>> {
    let theme = match query.theme.as_deref() {
        Some(raw) => raw
            .parse::<Theme>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => state.default_theme,
    };

    let snapshot = if state.refresh_on_view {
        run_refresh(&state).await?
    } else {
        current_snapshot(&state).await?
    };

    let options = PageOptions {
        theme,
        live_reload: !state.refresh_on_view,
    };
    Ok(Html(render_dashboard(&snapshot, &options)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(dashboard_page))
}
