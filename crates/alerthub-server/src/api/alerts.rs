use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use tracing;

pub const SUCCESS_MESSAGE: &str = "Alert successfully processed.";
pub const INVALID_ALERT_MESSAGE: &str =
    "Invalid alert data received, no ResourceName or AlertId found, no further action possible.";
pub const FAILURE_MESSAGE: &str = "Alert processing failed.";

/// Webhook entry point.
///
/// The monitoring platform treats any non-success status as a delivery
/// failure and re-queues, so every outcome — including internal storage
/// errors — answers 200 with a plain-text message.
pub async fn ingest_alert(State(state): State<AppState>, body: String) -> (StatusCode, String) {
    tracing::info!(bytes = body.len(), "Processing alert webhook");

    match state.engine.process_alert(&body).await {
        Ok(Some(record)) => {
            tracing::info!(
                group_key = %record.group_key,
                alert_name = %record.alert_name,
                occurrence = record.occurrence_count,
                ticketed = record.has_ticket(),
                "Alert processed"
            );
            (StatusCode::OK, SUCCESS_MESSAGE.to_string())
        }
        Ok(None) => {
            tracing::error!("{INVALID_ALERT_MESSAGE}");
            (StatusCode::OK, INVALID_ALERT_MESSAGE.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Alert processing failed");
            (StatusCode::OK, FAILURE_MESSAGE.to_string())
        }
    }
}
