use crate::error::Result;
use crate::store::HubStore;
use alerthub_common::types::{AlertCategory, AlertRecord};
use chrono::DateTime;

fn to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<AlertRecord> {
    let start_ms: Option<i64> = row.get("search_window_start")?;
    let end_ms: Option<i64> = row.get("search_window_end")?;
    let first_ms: i64 = row.get("first_seen_at")?;
    let last_ms: i64 = row.get("last_seen_at")?;
    let category_str: String = row.get("category")?;
    let category = category_str.parse().unwrap_or(AlertCategory::Other);

    Ok(AlertRecord {
        group_key: row.get("group_key")?,
        alert_name: row.get("alert_name")?,
        subscription_id: row.get("subscription_id")?,
        resource: row.get("resource")?,
        client_instance: row.get("client_instance")?,
        search_window_start: start_ms.and_then(DateTime::from_timestamp_millis),
        search_window_end: end_ms.and_then(DateTime::from_timestamp_millis),
        status: row.get("status")?,
        ticket_id: row.get("ticket_id")?,
        ticket_url: row.get("ticket_url")?,
        analytics_url: row.get("analytics_url")?,
        occurrence_count: row.get("occurrence_count")?,
        first_seen_at: DateTime::from_timestamp_millis(first_ms).unwrap_or_default(),
        last_seen_at: DateTime::from_timestamp_millis(last_ms).unwrap_or_default(),
        description: row.get("description")?,
        category,
        raw_payload: row.get("raw_payload")?,
    })
}

impl HubStore {
    /// Point lookup by the record's composite identity.
    pub fn alert(&self, group_key: &str, alert_name: &str) -> Result<Option<AlertRecord>> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare_cached(
            "SELECT group_key, alert_name, subscription_id, resource, client_instance,
                    search_window_start, search_window_end, status, ticket_id, ticket_url,
                    analytics_url, occurrence_count, first_seen_at, last_seen_at,
                    description, category, raw_payload
             FROM alerts WHERE group_key = ?1 AND alert_name = ?2",
        )?;
        let mut rows = stmt.query_map(rusqlite::params![group_key, alert_name], to_record)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Insert-or-replace the record under its identity.
    pub fn upsert_alert(&self, record: &AlertRecord) -> Result<()> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare_cached(
            "INSERT OR REPLACE INTO alerts (
                group_key, alert_name, subscription_id, resource, client_instance,
                search_window_start, search_window_end, status, ticket_id, ticket_url,
                analytics_url, occurrence_count, first_seen_at, last_seen_at,
                description, category, raw_payload
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        )?;
        stmt.execute(rusqlite::params![
            &record.group_key,
            &record.alert_name,
            &record.subscription_id,
            &record.resource,
            &record.client_instance,
            record.search_window_start.map(|t| t.timestamp_millis()),
            record.search_window_end.map(|t| t.timestamp_millis()),
            &record.status,
            &record.ticket_id,
            &record.ticket_url,
            &record.analytics_url,
            record.occurrence_count,
            record.first_seen_at.timestamp_millis(),
            record.last_seen_at.timestamp_millis(),
            &record.description,
            record.category.to_string(),
            &record.raw_payload,
        ])?;
        Ok(())
    }

    /// Removes a record. Never called by the correlation flow; deletion is
    /// an operator action. Returns true when a row was removed.
    pub fn delete_alert(&self, group_key: &str, alert_name: &str) -> Result<bool> {
        let conn = self.lock_conn();
        let removed = conn.execute(
            "DELETE FROM alerts WHERE group_key = ?1 AND alert_name = ?2",
            rusqlite::params![group_key, alert_name],
        )?;
        Ok(removed > 0)
    }
}
