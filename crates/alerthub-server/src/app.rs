use crate::api;
use crate::logging;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{middleware, Router};

pub fn build_http_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/alerts", post(api::alerts::ingest_alert))
        .route("/v1/incidents/status", get(api::incidents::incidents_status))
        .route("/v1/health", get(api::system::health))
        .with_state(state)
        .layer(middleware::from_fn(logging::request_logging))
}
