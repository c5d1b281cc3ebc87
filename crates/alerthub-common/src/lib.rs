//! Shared domain types for the alerthub workspace.
//!
//! An alert condition is a distinct (resource, client instance, rule name)
//! triple tracked as one ongoing issue. [`types::AlertRecord`] is the
//! persisted representation of one such condition; [`types::IncidentLink`]
//! ties a created service-management ticket back to the record that spawned
//! it.

pub mod types;
