use crate::error::{Result, TicketingError};
use crate::TicketingBackend;
use alerthub_common::types::{AlertCategory, AlertRecord, TicketRef};
use async_trait::async_trait;
use base64::Engine;
use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing;

const SERVICE: &str = "SNOW";

/// Static request fields for the ServiceNow-style gateway, all externally
/// configured. `credentials` is the raw `user:password` pair the Basic auth
/// header is built from; empty means the header is omitted entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowSettings {
    pub url: String,
    pub credentials: String,
    pub user_agent: Option<String>,
    pub caller_id: String,
    pub opened_by: String,
    pub business_service: String,
    pub it_service: String,
    pub contact_type: String,
    pub assignment_group: String,
    pub location: String,
    pub gravity: String,
    pub impact: String,
    pub stage: String,
}

#[derive(Debug, Serialize)]
struct IncidentRequest {
    caller_id: String,
    opened_by: String,
    business_service: String,
    it_service: String,
    contact_type: String,
    short_description: String,
    description: String,
    assignment_group: String,
    location: String,
    gravity: String,
    impact: String,
    stage: String,
}

#[derive(Debug, Deserialize)]
struct IncidentResponse {
    result: Option<IncidentResult>,
}

#[derive(Debug, Deserialize)]
struct IncidentResult {
    #[serde(default)]
    number: String,
    #[serde(default)]
    url: String,
}

pub struct SnowBackend {
    client: reqwest::Client,
    settings: SnowSettings,
}

impl SnowBackend {
    pub fn new(settings: SnowSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    fn apply_headers(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut req = req;
        if !self.settings.credentials.is_empty() {
            let encoded = base64::engine::general_purpose::STANDARD
                .encode(self.settings.credentials.as_bytes());
            req = req.header(header::AUTHORIZATION, format!("Basic {encoded}"));
        }
        if let Some(agent) = self.settings.user_agent.as_deref() {
            if !agent.is_empty() {
                req = req.header(header::USER_AGENT, agent);
            }
        }
        req
    }

    fn request_for(&self, alert: &AlertRecord) -> IncidentRequest {
        IncidentRequest {
            caller_id: self.settings.caller_id.clone(),
            opened_by: self.settings.opened_by.clone(),
            business_service: self.settings.business_service.clone(),
            it_service: self.settings.it_service.clone(),
            contact_type: self.settings.contact_type.clone(),
            short_description: short_description(alert),
            description: format!("{} {}", alert.description, alert.analytics_url),
            assignment_group: self.settings.assignment_group.clone(),
            location: self.settings.location.clone(),
            gravity: self.settings.gravity.clone(),
            impact: self.settings.impact.clone(),
            stage: self.settings.stage.clone(),
        }
    }

    async fn get_status(&self, url: &str) -> Result<Value> {
        let resp = self.apply_headers(self.client.get(url)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TicketingError::Api {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json::<Value>().await?)
    }
}

/// Ticket title: alert name plus client instance, with the resource name
/// spliced in for disk alerts.
fn short_description(alert: &AlertRecord) -> String {
    if alert.category == AlertCategory::Disk {
        format!(
            "{} ({}) {}",
            alert.alert_name, alert.resource, alert.client_instance
        )
    } else {
        format!("{} {}", alert.alert_name, alert.client_instance)
    }
}

/// `{base}/state?number=a&number=b...`; no query part for an empty batch.
fn status_url(base_url: &str, ticket_ids: &[String]) -> String {
    if ticket_ids.is_empty() {
        return format!("{base_url}/state");
    }
    let query = ticket_ids
        .iter()
        .map(|id| format!("number={id}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{base_url}/state?{query}")
}

#[async_trait]
impl TicketingBackend for SnowBackend {
    async fn create_incident(&self, alert: &AlertRecord) -> Result<TicketRef> {
        let request = self.request_for(alert);
        let url = format!("{}/create_incident", self.settings.url);

        let resp = self
            .apply_headers(self.client.post(&url))
            .json(&request)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TicketingError::Api {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: IncidentResponse = resp.json().await?;
        let result = parsed
            .result
            .ok_or(TicketingError::EmptyResult { service: SERVICE })?;
        Ok(TicketRef {
            number: result.number,
            url: result.url,
        })
    }

    async fn incident_status(&self, ticket_id: &str) -> Result<Value> {
        let url = format!("{}/state?number={}", self.settings.url, ticket_id);
        self.get_status(&url).await
    }

    async fn incidents_status(&self, ticket_ids: &[String]) -> Result<Value> {
        let url = status_url(&self.settings.url, ticket_ids);
        tracing::info!(url = %url, "Calling incident status REST API");
        self.get_status(&url).await
    }

    fn name(&self) -> &str {
        SERVICE
    }
}
