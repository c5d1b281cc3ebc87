mod common;

use alerthub_server::api::alerts::{INVALID_ALERT_MESSAGE, SUCCESS_MESSAGE};
use axum::http::StatusCode;
use common::{build_test_context, get_json, post_alert, sample_payload};
use std::sync::atomic::Ordering;

#[tokio::test]
async fn new_alert_creates_record_ticket_and_link() {
    let ctx = build_test_context().expect("test context should build");
    let payload = sample_payload("HighCPU", "host01", "inst-A");

    let (status, body) = post_alert(&ctx.app, &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, SUCCESS_MESSAGE);

    let record = ctx
        .state
        .store
        .alert("host01 - inst-A", "HighCPU")
        .unwrap()
        .unwrap();
    assert_eq!(record.resource, "host01");
    assert_eq!(record.client_instance, "inst-A");
    assert_eq!(record.occurrence_count, 1);
    assert_eq!(record.ticket_id.as_deref(), Some("INC0000001"));
    assert_eq!(ctx.backend.create_calls(), 1);

    let link = ctx
        .state
        .store
        .incident_link("MOCK", "INC0000001")
        .unwrap()
        .unwrap();
    assert_eq!(link.alert_group_key, "host01 - inst-A");
}

#[tokio::test]
async fn repeat_delivery_dedupes_and_skips_second_ticket() {
    let ctx = build_test_context().expect("test context should build");
    let payload = sample_payload("HighCPU", "host01", "inst-A");

    post_alert(&ctx.app, &payload).await;
    let (status, body) = post_alert(&ctx.app, &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, SUCCESS_MESSAGE);

    let record = ctx
        .state
        .store
        .alert("host01 - inst-A", "HighCPU")
        .unwrap()
        .unwrap();
    assert_eq!(record.occurrence_count, 2);
    assert_eq!(record.ticket_id.as_deref(), Some("INC0000001"));
    assert_eq!(ctx.backend.create_calls(), 1);
}

#[tokio::test]
async fn missing_data_node_answers_200_with_invalid_message() {
    let ctx = build_test_context().expect("test context should build");

    let (status, body) = post_alert(&ctx.app, r#"{"schemaId":"x"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, INVALID_ALERT_MESSAGE);

    let (status, body) = post_alert(&ctx.app, "definitely not json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, INVALID_ALERT_MESSAGE);

    assert_eq!(ctx.backend.create_calls(), 0);
    assert!(ctx.state.store.list_incident_links().unwrap().is_empty());
}

#[tokio::test]
async fn ticketing_failure_still_persists_record() {
    let ctx = build_test_context().expect("test context should build");
    ctx.backend.fail.store(true, Ordering::SeqCst);

    let (status, body) = post_alert(&ctx.app, &sample_payload("HighCPU", "host01", "inst-A")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, SUCCESS_MESSAGE);

    let record = ctx
        .state
        .store
        .alert("host01 - inst-A", "HighCPU")
        .unwrap()
        .unwrap();
    assert_eq!(record.ticket_id, None);
    assert_eq!(record.occurrence_count, 1);
    assert!(ctx.state.store.list_incident_links().unwrap().is_empty());
}

#[tokio::test]
async fn health_reports_ok_with_version() {
    let ctx = build_test_context().expect("test context should build");

    let (status, body) = get_json(&ctx.app, "/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
    assert!(body["uptime_secs"].is_i64() || body["uptime_secs"].is_u64());
}

#[tokio::test]
async fn incidents_status_polls_all_linked_tickets() {
    let ctx = build_test_context().expect("test context should build");

    // No links yet: empty result without touching the gateway.
    let (status, body) = get_json(&ctx.app, "/v1/incidents/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"].as_array().map(|a| a.len()), Some(0));

    post_alert(&ctx.app, &sample_payload("HighCPU", "host01", "inst-A")).await;
    post_alert(&ctx.app, &sample_payload("LowDisk", "host02", "inst-B")).await;

    let (status, body) = get_json(&ctx.app, "/v1/incidents/status").await;
    assert_eq!(status, StatusCode::OK);
    let numbers: Vec<&str> = body["result"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["number"].as_str())
        .collect();
    assert_eq!(numbers.len(), 2);
    assert!(numbers.contains(&"INC0000001"));
    assert!(numbers.contains(&"INC0000002"));
}

#[tokio::test]
async fn responses_carry_trace_id_header() {
    let ctx = build_test_context().expect("test context should build");

    let req = axum::http::Request::builder()
        .method("GET")
        .uri("/v1/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = tower::util::ServiceExt::oneshot(ctx.app.clone(), req)
        .await
        .unwrap();
    let trace = resp.headers().get("X-Trace-Id").and_then(|v| v.to_str().ok());
    assert!(trace.is_some_and(|t| t.len() == 16));
}
