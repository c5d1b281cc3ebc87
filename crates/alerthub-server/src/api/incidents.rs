use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing;

/// Batch status poll for every linked ticket. Operational endpoint outside
/// the ingestion path; uses the same gateway auth/URL contract as creation.
pub async fn incidents_status(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let links = match state.store.list_incident_links() {
        Ok(links) => links,
        Err(e) => {
            tracing::error!(error = %e, "Failed to list incident links");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "storage failure" })),
            );
        }
    };

    if links.is_empty() {
        return (StatusCode::OK, Json(json!({ "result": [] })));
    }

    let numbers: Vec<String> = links.into_iter().map(|l| l.ticket_id).collect();
    match state.ticketing.incidents_status(&numbers).await {
        Ok(status) => (StatusCode::OK, Json(status)),
        Err(e) => {
            tracing::error!(error = %e, "Incident status poll failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}
