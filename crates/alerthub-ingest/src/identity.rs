//! Identity derivation for alert deduplication.

use serde_json::Value;

/// Discriminator used when the payload names no alert rule.
pub const NO_NAME_FOUND: &str = "NO-NAME-FOUND";

/// The two-part identity of an alert condition: the group key partitions by
/// resource + client instance, the alert name discriminates within the
/// group. Deliveries with equal identities are the same ongoing condition.
///
/// # Examples
///
/// ```
/// use alerthub_ingest::identity::AlertIdentity;
///
/// let a = AlertIdentity::new("host01", "inst-A", "HighCPU");
/// let b = AlertIdentity::new("host01", "inst-A", "HighCPU");
/// assert_eq!(a, b);
/// assert_eq!(a.group_key, "host01 - inst-A");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertIdentity {
    pub group_key: String,
    pub alert_name: String,
}

impl AlertIdentity {
    pub fn new(resource: &str, client_instance: &str, alert_name: &str) -> Self {
        Self {
            group_key: format!("{resource} - {client_instance}"),
            alert_name: alert_name.to_string(),
        }
    }

    /// Both parts present; anything less rejects the delivery outright.
    pub fn is_complete(&self) -> bool {
        !self.group_key.is_empty() && !self.alert_name.is_empty()
    }
}

/// The monitoring rule name from `data.AlertRuleName`, or the
/// [`NO_NAME_FOUND`] placeholder.
pub fn alert_rule_name(payload: &Value) -> String {
    payload
        .get("data")
        .and_then(|d| d.get("AlertRuleName"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| NO_NAME_FOUND.to_string())
}
