//! Key/value settings storage. Values are stored as JSON text.

use std::collections::BTreeMap;

use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use tracing::info;

use super::{now_timestamp, Database, DbResult};

impl Database {
    /// Get a setting value.
    pub fn get_setting(&self, key: &str) -> DbResult<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;

        raw.map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(Into::into)
    }

    /// Insert or replace a setting value.
    pub fn set_setting(&self, key: &str, value: &Value) -> DbResult<()> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            r#"
            INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, json, now_timestamp()],
        )?;
        info!(key, "Saved setting");
        Ok(())
    }

    /// All stored settings keyed by name.
    pub fn all_settings(&self) -> DbResult<BTreeMap<String, Value>> {
        let mut stmt = self.conn.prepare("SELECT key, value FROM settings")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut settings = BTreeMap::new();
        for row in rows {
            let (key, raw) = row?;
            settings.insert(key, serde_json::from_str(&raw)?);
        }
        Ok(settings)
    }

    /// Remove every stored setting.
    pub fn clear_settings(&self) -> DbResult<()> {
        let removed = self.conn.execute("DELETE FROM settings", [])?;
        info!(removed, "Cleared settings");
        Ok(())
    }
}
