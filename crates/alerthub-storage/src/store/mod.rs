mod alerts;
mod incidents;

use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing;

const ALERTS_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS alerts (
    group_key TEXT NOT NULL,
    alert_name TEXT NOT NULL,
    subscription_id TEXT NOT NULL DEFAULT '',
    resource TEXT NOT NULL DEFAULT '',
    client_instance TEXT NOT NULL DEFAULT '',
    search_window_start INTEGER,
    search_window_end INTEGER,
    status TEXT NOT NULL DEFAULT 'Open',
    ticket_id TEXT,
    ticket_url TEXT,
    analytics_url TEXT NOT NULL DEFAULT '',
    occurrence_count INTEGER NOT NULL DEFAULT 1,
    first_seen_at INTEGER NOT NULL,
    last_seen_at INTEGER NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    category TEXT NOT NULL DEFAULT 'OTHER',
    raw_payload TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (group_key, alert_name)
);
";

const INCIDENT_LINKS_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS incident_links (
    source_system TEXT NOT NULL,
    ticket_id TEXT NOT NULL,
    alert_group_key TEXT NOT NULL DEFAULT '',
    alert_name TEXT NOT NULL DEFAULT '',
    ticket_url TEXT NOT NULL DEFAULT '',
    linked_at INTEGER NOT NULL,
    PRIMARY KEY (source_system, ticket_id)
);
";

/// Handle to the alert and incident-link tables.
///
/// Safe to share behind an `Arc`: the single connection is guarded by a
/// `Mutex`, and every operation is one statement, so callers get per-key
/// atomicity and nothing more. Concurrent lookup-then-upsert sequences for
/// the same key can interleave; that weak consistency is accepted by the
/// correlation flow.
pub struct HubStore {
    conn: Mutex<Connection>,
}

impl HubStore {
    /// Opens (creating if needed) `alerthub.db` under `data_dir` and
    /// ensures the schema exists.
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join("alerthub.db");
        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(ALERTS_SCHEMA)?;
        conn.execute_batch(INCIDENT_LINKS_SCHEMA)?;
        tracing::debug!(db = %path.display(), "Alert store ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the connection, recovering from a poisoned Mutex if necessary.
    pub(crate) fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
