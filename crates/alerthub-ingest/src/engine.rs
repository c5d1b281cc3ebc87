use crate::extract;
use crate::identity::{self, AlertIdentity};
use alerthub_common::types::{AlertRecord, IncidentLink};
use alerthub_storage::HubStore;
use alerthub_ticketing::TicketingBackend;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing;

/// Per-delivery state machine: extraction, identity, dedup against the
/// alert store, at-most-one ticket dispatch, persistence, link write.
///
/// Collaborators are injected once at construction; the engine never
/// consults ambient state to pick a backend. Each call to
/// [`process_alert`](Self::process_alert) is one independent
/// request-response unit with blocking store access and no retries;
/// concurrent deliveries of the same identity can race between lookup and
/// upsert, which the store's per-key atomicity bounds but does not prevent.
pub struct CorrelationEngine {
    store: Arc<HubStore>,
    ticketing: Arc<dyn TicketingBackend>,
}

impl CorrelationEngine {
    pub fn new(store: Arc<HubStore>, ticketing: Arc<dyn TicketingBackend>) -> Self {
        Self { store, ticketing }
    }

    /// Processes one raw webhook delivery.
    ///
    /// Returns `Ok(None)` for malformed or unidentifiable payloads (no
    /// storage writes happen in that case), `Ok(Some(record))` for the
    /// created or updated alert record. Ticketing failures are logged and
    /// swallowed; the record still persists and the next occurrence of the
    /// same alert retries the ticket.
    ///
    /// # Errors
    ///
    /// Only storage failures abort a delivery.
    pub async fn process_alert(&self, raw: &str) -> Result<Option<AlertRecord>> {
        let payload: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Webhook body is not valid JSON");
                return Ok(None);
            }
        };
        let Some(data) = payload.get("data").filter(|d| d.is_object()) else {
            tracing::warn!("Webhook payload carries no data object");
            return Ok(None);
        };

        let alert_name = identity::alert_rule_name(&payload);
        let resource = extract::resource_name(&alert_name, &payload);
        let client_instance = extract::client_instance(&alert_name, &resource, raw, &payload);
        let id = AlertIdentity::new(&resource, &client_instance, &alert_name);
        if !id.is_complete() {
            tracing::warn!(
                group_key = %id.group_key,
                alert_name = %id.alert_name,
                "Derived identity is incomplete; delivery rejected"
            );
            return Ok(None);
        }

        let now = Utc::now();
        let mut record = match self.store.alert(&id.group_key, &id.alert_name)? {
            Some(mut existing) => {
                existing.occurrence_count += 1;
                existing.last_seen_at = now;
                tracing::debug!(
                    group_key = %id.group_key,
                    alert_name = %id.alert_name,
                    occurrence = existing.occurrence_count,
                    "Repeat occurrence of known alert"
                );
                existing
            }
            None => {
                let mut rec = AlertRecord::new(&id.group_key, &id.alert_name, now);
                rec.subscription_id = string_field(data, "SubscriptionId");
                rec.resource = resource;
                rec.client_instance = client_instance;
                rec.analytics_url = string_field(data, "LinkToSearchResults");
                rec.search_window_start = parse_window(data, "SearchIntervalStartTimeUtc");
                // The lowercase `t` in this key matches what the monitoring
                // platform actually sends.
                rec.search_window_end = parse_window(data, "SearchIntervalEndtimeUtc");
                rec.raw_payload = raw.to_string();
                tracing::info!(
                    group_key = %id.group_key,
                    alert_name = %id.alert_name,
                    "New alert condition"
                );
                rec
            }
        };

        if !record.has_ticket() {
            match self.ticketing.create_incident(&record).await {
                Ok(ticket) => {
                    tracing::info!(
                        group_key = %record.group_key,
                        number = %ticket.number,
                        "Ticket created"
                    );
                    record.ticket_id = Some(ticket.number);
                    record.ticket_url = Some(ticket.url);
                }
                Err(e) => {
                    tracing::error!(
                        group_key = %record.group_key,
                        alert_name = %record.alert_name,
                        error = %e,
                        "Ticket creation failed; persisting record without a ticket"
                    );
                }
            }
        }

        self.store.upsert_alert(&record)?;

        if record.has_ticket() {
            let link = IncidentLink {
                source_system: self.ticketing.name().to_string(),
                ticket_id: record.ticket_id.clone().unwrap_or_default(),
                alert_group_key: record.group_key.clone(),
                alert_name: record.alert_name.clone(),
                ticket_url: record.ticket_url.clone().unwrap_or_default(),
                linked_at: now,
            };
            self.store.upsert_incident_link(&link)?;
        }

        Ok(Some(record))
    }
}

fn string_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn parse_window(data: &Value, key: &str) -> Option<DateTime<Utc>> {
    let raw = data.get(key).and_then(Value::as_str)?;
    match raw.parse::<DateTime<Utc>>() {
        Ok(ts) => Some(ts),
        Err(e) => {
            tracing::warn!(key, value = raw, error = %e, "Unparseable search window timestamp");
            None
        }
    }
}
