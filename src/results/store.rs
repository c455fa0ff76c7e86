use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use tracing::debug;

use crate::results::migrations::BASE_MIGRATION;
use crate::results::{result_id, ResultKind, StoredResult};

pub struct ResultStore {
    conn: Connection,
}

impl ResultStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(BASE_MIGRATION)?;
        Ok(())
    }

    /// Saving the same payload twice keeps the first row and returns the
    /// same id.
    pub fn put(&self, kind: ResultKind, payload: &Value) -> Result<String> {
        let id = result_id(payload);
        let inserted = self.conn.execute(
            r#"
INSERT OR IGNORE INTO results(id, kind, created_at, payload_json)
VALUES (?1, ?2, ?3, ?4)
"#,
            params![
                id,
                kind.as_slug(),
                Utc::now().to_rfc3339(),
                serde_json::to_string(payload)?
            ],
        )?;
        debug!("stored {kind} result {id} (new: {})", inserted > 0);
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Result<Option<StoredResult>> {
        let mut stmt = self.conn.prepare(
            r#"
SELECT id, kind, created_at, payload_json
FROM results
WHERE id = ?1
"#,
        )?;
        let row = stmt
            .query_row(params![id.trim().to_ascii_lowercase()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .optional()?;
        let Some((id, kind_raw, created_at_raw, payload_json)) = row else {
            return Ok(None);
        };
        let kind = kind_raw
            .parse::<ResultKind>()
            .map_err(anyhow::Error::msg)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());
        Ok(Some(StoredResult {
            id,
            kind,
            created_at,
            payload: serde_json::from_str(&payload_json)?,
        }))
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM results", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
