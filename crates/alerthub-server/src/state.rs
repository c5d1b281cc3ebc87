use alerthub_ingest::engine::CorrelationEngine;
use alerthub_storage::HubStore;
use alerthub_ticketing::TicketingBackend;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<CorrelationEngine>,
    pub store: Arc<HubStore>,
    pub ticketing: Arc<dyn TicketingBackend>,
    pub start_time: DateTime<Utc>,
}
