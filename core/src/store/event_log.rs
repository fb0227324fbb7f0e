//! Store methods for the analytics event log.

use crate::error::WidgetResult;
use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::WidgetStore;

/// An analytics event as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub event_id:   String,
    pub event_name: String,
    pub label:      String,
    pub payload:    String, // JSON-serialized AnalyticsEvent
    pub created_at: String,
}

impl WidgetStore {
    pub fn append_event(&self, entry: &EventLogEntry) -> WidgetResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (event_id, event_name, label, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.event_id,
                entry.event_name,
                entry.label,
                entry.payload,
                entry.created_at,
            ],
        )?;
        Ok(())
    }

    /// All events with the given name, oldest first.
    pub fn events_named(&self, event_name: &str) -> WidgetResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_id, event_name, label, payload, created_at
             FROM event_log WHERE event_name = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![event_name], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    event_id:   row.get(1)?,
                    event_name: row.get(2)?,
                    label:      row.get(3)?,
                    payload:    row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self) -> WidgetResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM event_log", [], |row| row.get(0))?;
        Ok(count)
    }
}
