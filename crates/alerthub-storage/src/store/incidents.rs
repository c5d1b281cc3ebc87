use crate::error::Result;
use crate::store::HubStore;
use alerthub_common::types::IncidentLink;
use chrono::DateTime;

fn to_link(row: &rusqlite::Row<'_>) -> rusqlite::Result<IncidentLink> {
    let linked_ms: i64 = row.get("linked_at")?;
    Ok(IncidentLink {
        source_system: row.get("source_system")?,
        ticket_id: row.get("ticket_id")?,
        alert_group_key: row.get("alert_group_key")?,
        alert_name: row.get("alert_name")?,
        ticket_url: row.get("ticket_url")?,
        linked_at: DateTime::from_timestamp_millis(linked_ms).unwrap_or_default(),
    })
}

impl HubStore {
    pub fn incident_link(
        &self,
        source_system: &str,
        ticket_id: &str,
    ) -> Result<Option<IncidentLink>> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare_cached(
            "SELECT source_system, ticket_id, alert_group_key, alert_name, ticket_url, linked_at
             FROM incident_links WHERE source_system = ?1 AND ticket_id = ?2",
        )?;
        let mut rows = stmt.query_map(rusqlite::params![source_system, ticket_id], to_link)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Insert-or-replace under (source_system, ticket_id). Repeat writes for
    /// an already-linked ticket rewrite the row and refresh `linked_at`.
    pub fn upsert_incident_link(&self, link: &IncidentLink) -> Result<()> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare_cached(
            "INSERT OR REPLACE INTO incident_links (
                source_system, ticket_id, alert_group_key, alert_name, ticket_url, linked_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        stmt.execute(rusqlite::params![
            &link.source_system,
            &link.ticket_id,
            &link.alert_group_key,
            &link.alert_name,
            &link.ticket_url,
            link.linked_at.timestamp_millis(),
        ])?;
        Ok(())
    }

    /// All recorded links, oldest first. Feeds the batch status poll.
    pub fn list_incident_links(&self) -> Result<Vec<IncidentLink>> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare_cached(
            "SELECT source_system, ticket_id, alert_group_key, alert_name, ticket_url, linked_at
             FROM incident_links ORDER BY linked_at ASC",
        )?;
        let rows = stmt.query_map([], to_link)?;
        let mut links = Vec::new();
        for row in rows {
            links.push(row?);
        }
        Ok(links)
    }

    pub fn delete_incident_link(&self, source_system: &str, ticket_id: &str) -> Result<bool> {
        let conn = self.lock_conn();
        let removed = conn.execute(
            "DELETE FROM incident_links WHERE source_system = ?1 AND ticket_id = ?2",
            rusqlite::params![source_system, ticket_id],
        )?;
        Ok(removed > 0)
    }
}
