//! Persistence layer for alert records and incident links.
//!
//! One SQLite database (`alerthub.db` under the configured data directory)
//! holds two tables: `alerts`, keyed by (group_key, alert_name), with one
//! row per distinct ongoing alert condition, and `incident_links`, keyed by
//! (source_system, ticket_id), recording which ticket an alert spawned.
//! The schema is created lazily on first open and creation is idempotent.
//!
//! Both tables are plain point-lookup/upsert/delete stores; no range
//! queries or secondary indexes. Per-key operations are individually
//! atomic; nothing spans keys.

pub mod error;
pub mod store;


pub use store::HubStore;
