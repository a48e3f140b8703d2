mod common;

use std::sync::Arc;

use common::{app_with, body_string, config_with, get, MockProvider};

#[tokio::test]
async fn healthz_works() {
    let config = config_with(&[]);
    let (app, state) = app_with(&config, Arc::new(MockProvider::default()));

    let response = get(&app, "/api/v1/healthz").await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_string(response).await, "ok");

    // Health checks never trigger a refresh.
    assert!(state.dashboard_service.latest().is_none());
}
