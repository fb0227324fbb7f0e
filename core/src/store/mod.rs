//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The tracker and reporters call store methods, never SQL directly.

use crate::error::WidgetResult;
use rusqlite::Connection;

mod event_log;
mod kv;

pub use event_log::EventLogEntry;

pub struct WidgetStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl WidgetStore {
    pub fn open(path: &str) -> WidgetResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> WidgetResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new in-memory database (isolated).
    /// For file-based (or shared-cache URI) databases, this opens the same one.
    pub fn reopen(&self) -> WidgetResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order. Idempotent.
    pub fn migrate(&self) -> WidgetResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_storage.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_event_log.sql"))?;
        Ok(())
    }
}
