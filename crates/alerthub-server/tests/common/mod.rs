#![allow(dead_code)]

use alerthub_common::types::{AlertRecord, TicketRef};
use alerthub_ingest::engine::CorrelationEngine;
use alerthub_server::app;
use alerthub_server::state::AppState;
use alerthub_storage::HubStore;
use alerthub_ticketing::error::{Result as TicketingResult, TicketingError};
use alerthub_ticketing::TicketingBackend;
use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Stand-in for the external service-management system: counts create
/// calls and can be flipped into a failure mode per test.
pub struct RecordingBackend {
    creates: AtomicUsize,
    pub fail: AtomicBool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            creates: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TicketingBackend for RecordingBackend {
    async fn create_incident(&self, _alert: &AlertRecord) -> TicketingResult<TicketRef> {
        let n = self.creates.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail.load(Ordering::SeqCst) {
            return Err(TicketingError::Api {
                service: "MOCK",
                status: 500,
                body: "upstream unavailable".to_string(),
            });
        }
        Ok(TicketRef {
            number: format!("INC{n:07}"),
            url: format!("https://snow.example/INC{n:07}"),
        })
    }

    async fn incident_status(&self, ticket_id: &str) -> TicketingResult<Value> {
        Ok(json!({ "result": { "number": ticket_id, "state": "open" } }))
    }

    async fn incidents_status(&self, ticket_ids: &[String]) -> TicketingResult<Value> {
        Ok(json!({
            "result": ticket_ids
                .iter()
                .map(|id| json!({ "number": id, "state": "open" }))
                .collect::<Vec<_>>()
        }))
    }

    fn name(&self) -> &str {
        "MOCK"
    }
}

pub struct TestContext {
    pub temp_dir: TempDir,
    pub state: AppState,
    pub app: axum::Router,
    pub backend: Arc<RecordingBackend>,
}

pub fn build_test_context() -> Result<TestContext> {
    let temp_dir = tempfile::tempdir()?;
    let store = Arc::new(HubStore::new(temp_dir.path())?);
    let backend = Arc::new(RecordingBackend::new());
    let engine = Arc::new(CorrelationEngine::new(store.clone(), backend.clone()));

    let state = AppState {
        engine,
        store,
        ticketing: backend.clone(),
        start_time: Utc::now(),
    };
    let app = app::build_http_app(state.clone());

    Ok(TestContext {
        temp_dir,
        state,
        app,
        backend,
    })
}

pub async fn post_alert(app: &axum::Router, body: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method("POST")
        .uri("/v1/alerts")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should not fail");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should collect");
    (status, String::from_utf8_lossy(&bytes).to_string())
}

pub async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should not fail");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should collect");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub fn sample_payload(rule: &str, computer: &str, instance: &str) -> String {
    json!({
        "schemaId": "Microsoft.Insights/LogAlert",
        "data": {
            "SubscriptionId": "sub-1234",
            "AlertRuleName": rule,
            "SearchIntervalStartTimeUtc": "2024-05-01T10:00:00Z",
            "SearchIntervalEndtimeUtc": "2024-05-01T10:05:00Z",
            "LinkToSearchResults": "https://analytics.example/q/1",
            "SearchResult": {
                "tables": [{
                    "columns": [
                        {"name": "Computer", "type": "string"},
                        {"name": "InstanceName", "type": "string"},
                    ],
                    "rows": [[computer, instance]],
                }]
            }
        }
    })
    .to_string()
}
