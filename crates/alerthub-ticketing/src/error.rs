/// Errors that can occur while talking to a service-management backend.
#[derive(Debug, thiserror::Error)]
pub enum TicketingError {
    /// An HTTP request to the backend failed at the transport layer.
    #[error("Ticketing: HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Ticketing: {service} returned status={status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The create response parsed but carried no result object, so no
    /// ticket number is available.
    #[error("Ticketing: {service} create response carried no result")]
    EmptyResult { service: &'static str },

    /// JSON serialization or deserialization failed.
    #[error("Ticketing: JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience `Result` alias for ticketing operations.
pub type Result<T> = std::result::Result<T, TicketingError>;
