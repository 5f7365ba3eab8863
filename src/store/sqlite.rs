//! SQLite progress store
//!
//! All users share one database (`<data_dir>/progress.db`). Records are kept
//! as JSON blobs so the schema does not change when `UserProgress` grows.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{ProgressStore, StoreError, StoredProgress};
use crate::gamification::UserProgress;
use crate::identity::{Identity, UserId};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS user_progress (
    user_id TEXT PRIMARY KEY,
    data TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);

INSERT OR IGNORE INTO schema_version VALUES (1);
"#;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let store = Self { conn };
        store.init_schema()?;
        debug!(path = %path.display(), "Opened progress database");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        self.run_migrations()
    }

    fn run_migrations(&self) -> Result<(), StoreError> {
        let version: i32 = self
            .conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| {
                r.get(0)
            })?;

        // Migration 2: display name for leaderboards
        if version < 2 {
            let has_name: bool = self
                .conn
                .query_row(
                    "SELECT COUNT(*) FROM pragma_table_info('user_progress') WHERE name = 'display_name'",
                    [],
                    |r| r.get::<_, i32>(0),
                )
                .map(|c| c > 0)?;

            if !has_name {
                self.conn.execute_batch(
                    "ALTER TABLE user_progress ADD COLUMN display_name TEXT NOT NULL DEFAULT '';",
                )?;
            }
            self.conn
                .execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
        }

        Ok(())
    }

    /// Current schema version
    pub fn schema_version(&self) -> Result<i32, StoreError> {
        Ok(self
            .conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))?)
    }
}

impl ProgressStore for SqliteStore {
    fn load(&self, user: &UserId) -> Result<Option<UserProgress>, StoreError> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM user_progress WHERE user_id = ?1",
                [user.as_str()],
                |r| r.get(0),
            )
            .optional()?;

        match data {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, identity: &Identity, progress: &UserProgress) -> Result<(), StoreError> {
        let data = serde_json::to_string(progress)?;
        let now = chrono::Utc::now().timestamp_millis();
        self.conn.execute(
            r#"
            INSERT INTO user_progress (user_id, data, updated_at, display_name)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                data = ?2, updated_at = ?3, display_name = ?4
            "#,
            params![identity.id.as_str(), data, now, identity.name],
        )?;
        Ok(())
    }

    fn records(&self) -> Result<Vec<StoredProgress>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id, display_name, data FROM user_progress ORDER BY rowid")?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (user_id, name, data) = row?;
            records.push(StoredProgress {
                user_id: UserId::new(user_id),
                name,
                progress: serde_json::from_str(&data)?,
            });
        }
        Ok(records)
    }
}
