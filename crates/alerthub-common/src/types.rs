use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse alert classification, stored on the record and consulted when the
/// ticket title is built (disk alerts carry the resource name in the title).
///
/// Persisted as the uppercase text the original table column used, and
/// parsed leniently: anything unrecognized folds to `Other`.
///
/// # Examples
///
/// ```
/// use alerthub_common::types::AlertCategory;
///
/// let cat: AlertCategory = "disk".parse().unwrap();
/// assert_eq!(cat, AlertCategory::Disk);
/// assert_eq!(cat.to_string(), "DISK");
/// assert_eq!("anything-else".parse::<AlertCategory>().unwrap(), AlertCategory::Other);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertCategory {
    Disk,
    Other,
}

impl Default for AlertCategory {
    fn default() -> Self {
        AlertCategory::Other
    }
}

impl std::fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertCategory::Disk => write!(f, "DISK"),
            AlertCategory::Other => write!(f, "OTHER"),
        }
    }
}

impl std::str::FromStr for AlertCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DISK" => Ok(AlertCategory::Disk),
            _ => Ok(AlertCategory::Other),
        }
    }
}

/// One persisted alert condition.
///
/// Identity is the (`group_key`, `alert_name`) pair: the group key is
/// `resource + " - " + client_instance`, the alert name is the monitoring
/// rule that fired. At most one record exists per pair at any time; repeat
/// deliveries bump `occurrence_count` and `last_seen_at` instead of
/// creating rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    pub group_key: String,
    pub alert_name: String,
    pub subscription_id: String,
    pub resource: String,
    pub client_instance: String,
    /// Search window bounds from the triggering query; set at creation only
    /// and absent when the payload omitted or mangled them.
    pub search_window_start: Option<DateTime<Utc>>,
    pub search_window_end: Option<DateTime<Utc>>,
    pub status: String,
    /// Set exactly once, when the first successful ticket creation for this
    /// record completes. Never overwritten while the record exists.
    pub ticket_id: Option<String>,
    pub ticket_url: Option<String>,
    /// Link to the analytics query that produced the alert.
    pub analytics_url: String,
    pub occurrence_count: i64,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub description: String,
    pub category: AlertCategory,
    /// Verbatim webhook body from the delivery that created the record,
    /// kept for audit. Not refreshed on repeats.
    pub raw_payload: String,
}

impl AlertRecord {
    /// A fresh record for a first-seen alert condition: one occurrence,
    /// open, unticketed, both seen-timestamps at `now`.
    pub fn new(group_key: &str, alert_name: &str, now: DateTime<Utc>) -> Self {
        Self {
            group_key: group_key.to_string(),
            alert_name: alert_name.to_string(),
            subscription_id: String::new(),
            resource: String::new(),
            client_instance: String::new(),
            search_window_start: None,
            search_window_end: None,
            status: "Open".to_string(),
            ticket_id: None,
            ticket_url: None,
            analytics_url: String::new(),
            occurrence_count: 1,
            first_seen_at: now,
            last_seen_at: now,
            description: String::new(),
            category: AlertCategory::Other,
            raw_payload: String::new(),
        }
    }

    pub fn has_ticket(&self) -> bool {
        self.ticket_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Audit record tying a created ticket back to its originating alert.
///
/// Keyed by (`source_system`, `ticket_id`); the back-reference to the alert
/// is lookup-only, not ownership. Rewritten (not duplicated) on repeat
/// deliveries of an already-ticketed alert, refreshing `linked_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentLink {
    pub source_system: String,
    pub ticket_id: String,
    pub alert_group_key: String,
    pub alert_name: String,
    pub ticket_url: String,
    pub linked_at: DateTime<Utc>,
}

/// Successful result of a ticket creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRef {
    pub number: String,
    pub url: String,
}
