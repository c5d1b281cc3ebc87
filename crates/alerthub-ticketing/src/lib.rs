//! Ticketing gateway for external service-management systems.
//!
//! The correlation engine talks to exactly one [`TicketingBackend`],
//! chosen at startup and injected by reference; nothing selects a backend
//! from ambient state mid-request. Built-in backends are the
//! ServiceNow-style REST gateway ([`snow::SnowBackend`]) and a no-op stub
//! for dry-run deployments ([`stub::StubBackend`]).
//!
//! Every outbound call is a single attempt. Failures are returned to the
//! caller, which logs and proceeds without a ticket; the retry is the next
//! natural repetition of the alert, never this crate.

pub mod error;
pub mod snow;
pub mod stub;


use alerthub_common::types::{AlertRecord, TicketRef};
use async_trait::async_trait;
use crate::error::Result;

/// A service-management backend that can open tickets for alert records
/// and report ticket state.
#[async_trait]
pub trait TicketingBackend: Send + Sync {
    /// Opens a ticket for the given alert condition.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success response, or a
    /// response that carries no ticket. The caller treats all of these as
    /// non-fatal: the record is persisted unticketed and the next
    /// occurrence tries again.
    async fn create_incident(&self, alert: &AlertRecord) -> Result<TicketRef>;

    /// Fetches the state of a single ticket.
    async fn incident_status(&self, ticket_id: &str) -> Result<serde_json::Value>;

    /// Fetches the state of several tickets in one call.
    async fn incidents_status(&self, ticket_ids: &[String]) -> Result<serde_json::Value>;

    /// Backend name constant, also recorded as `source_system` on incident
    /// links (e.g. `"SNOW"`).
    fn name(&self) -> &str;
}
