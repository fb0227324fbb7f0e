//! Store methods backing `KeyValueStorage`.

use crate::{error::WidgetResult, storage::KeyValueStorage};
use rusqlite::{params, OptionalExtension};

use super::WidgetStore;

impl WidgetStore {
    pub fn kv_get(&self, key: &str) -> WidgetResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> WidgetResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, ?3)",
            params![key, value, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn kv_remove(&self, key: &str) -> WidgetResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Number of stored keys (for tests).
    pub fn kv_count(&self) -> WidgetResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl KeyValueStorage for WidgetStore {
    fn get(&self, key: &str) -> WidgetResult<Option<String>> {
        self.kv_get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> WidgetResult<()> {
        self.kv_set(key, value)
    }

    fn remove(&mut self, key: &str) -> WidgetResult<()> {
        self.kv_remove(key)
    }
}
