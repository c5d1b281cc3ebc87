use crate::error::Result;
use crate::TicketingBackend;
use alerthub_common::types::{AlertRecord, TicketRef};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing;

/// No-op backend for test and dry-run deployments.
///
/// Makes no outbound calls; logs the would-be ticket and mints
/// deterministic `TEST0000001`-style numbers so the full ticketed flow
/// (including link persistence) still runs.
pub struct StubBackend {
    counter: AtomicU64,
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketingBackend for StubBackend {
    async fn create_incident(&self, alert: &AlertRecord) -> Result<TicketRef> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let number = format!("TEST{n:07}");
        tracing::info!(
            group_key = %alert.group_key,
            alert_name = %alert.alert_name,
            number = %number,
            "Stub ticketing backend minted ticket"
        );
        Ok(TicketRef {
            number,
            url: String::new(),
        })
    }

    async fn incident_status(&self, ticket_id: &str) -> Result<Value> {
        Ok(json!({ "result": { "number": ticket_id, "state": "test" } }))
    }

    async fn incidents_status(&self, ticket_ids: &[String]) -> Result<Value> {
        Ok(json!({
            "result": ticket_ids
                .iter()
                .map(|id| json!({ "number": id, "state": "test" }))
                .collect::<Vec<_>>()
        }))
    }

    fn name(&self) -> &str {
        "TEST"
    }
}
