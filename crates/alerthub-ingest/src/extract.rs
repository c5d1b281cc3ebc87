//! Field extraction heuristics for semi-structured alert payloads.
//!
//! Monitoring payloads carry a tabular `SearchResult` (columns + rows)
//! under `data`, plus free-form text that may mention the client instance
//! as `HOST\instance`. Extraction is layered: pattern match first, column
//! lookup second, empty-string degradation last. Extraction never aborts a
//! request; a miss reduces deduplication fidelity and is logged as a
//! warning.

use regex::Regex;
use serde_json::Value;
use tracing;

fn first_table(payload: &Value) -> Option<&Value> {
    payload
        .get("data")?
        .get("SearchResult")?
        .get("tables")?
        .get(0)
}

fn column_index(payload: &Value, column: &str) -> Option<usize> {
    first_table(payload)?
        .get("columns")?
        .as_array()?
        .iter()
        .position(|c| c.get("name").and_then(Value::as_str) == Some(column))
}

fn first_row_value(payload: &Value, index: usize) -> Option<String> {
    let cell = first_table(payload)?.get("rows")?.get(0)?.get(index)?;
    match cell {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// The resource (computer) name from the `Computer` column of the first
/// result row. Missing column, malformed schema, or missing row all degrade
/// to an empty string; the caller proceeds with a coarser identity.
pub fn resource_name(alert_name: &str, payload: &Value) -> String {
    match column_index(payload, "Computer").and_then(|i| first_row_value(payload, i)) {
        Some(name) => name,
        None => {
            tracing::warn!(
                alert_name = %alert_name,
                "No Computer column in search result; resource name is empty"
            );
            String::new()
        }
    }
}

/// Host prefix used in the instance pattern: the resource name cut at one
/// character before the first dot. The extra character dropped is
/// long-standing behavior that existing deduplication keys depend on, so it
/// stays. A resource with no dot is used whole.
fn host_prefix(resource_name: &str) -> &str {
    match resource_name.find('.') {
        Some(idx) => &resource_name[..idx.saturating_sub(1)],
        None => resource_name,
    }
}

/// The client instance ("sub-resource") identifier.
///
/// Tries, in order: the last `hostprefix\word` occurrence in the raw
/// payload text (case-insensitive), then the `InstanceName` column of the
/// first result row. Backslashes are replaced with hyphens because the
/// result becomes part of a storage key.
pub fn client_instance(
    alert_name: &str,
    resource_name: &str,
    raw_payload: &str,
    payload: &Value,
) -> String {
    let prefix = host_prefix(resource_name);
    let mut instance = String::new();

    let pattern = format!(r"(?i)({}\\)\w+", regex::escape(prefix));
    match Regex::new(&pattern) {
        Ok(rx) => {
            if let Some(m) = rx.find_iter(raw_payload).last() {
                instance = m.as_str().to_string();
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Client-instance pattern failed to compile");
        }
    }

    if instance.is_empty() {
        match column_index(payload, "InstanceName").and_then(|i| first_row_value(payload, i)) {
            Some(value) => instance = value,
            None => {
                tracing::warn!(
                    alert_name = %alert_name,
                    "No instance pattern match and no InstanceName column; client instance is empty"
                );
            }
        }
    }

    instance.replace('\\', "-")
}
