//! SQLite-backed [`KeyValueStore`].

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use log::warn;
use rusqlite::params;

use super::connection::Database;
use crate::managers::persistence_bridge::KeyValueStore;
use crate::types::errors::PersistenceError;

/// Rows of `kv_store`, keyed by `(key, owner)`. A missing owner is stored as
/// the empty string.
pub struct SqliteStore {
    db: Mutex<Database>,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl KeyValueStore for SqliteStore {
    fn load(&self, key: &str, owner: Option<&str>) -> Result<Option<String>, PersistenceError> {
        let db = self
            .db
            .lock()
            .map_err(|e| PersistenceError::ReadFailure(e.to_string()))?;

        let result = db.connection().query_row(
            "SELECT value FROM kv_store WHERE key = ?1 AND owner = ?2",
            params![key, owner.unwrap_or_default()],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(PersistenceError::DatabaseError(e.to_string())),
        }
    }

    fn save(&self, key: &str, owner: Option<&str>, value: &str) -> Result<(), PersistenceError> {
        let db = self
            .db
            .lock()
            .map_err(|e| PersistenceError::WriteFailure(e.to_string()))?;

        db.connection()
            .execute(
                "INSERT INTO kv_store (key, owner, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(key, owner) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, owner.unwrap_or_default(), value, Self::now()],
            )
            .map_err(|e| {
                warn!("kv_store write for {} failed: {}", key, e);
                PersistenceError::DatabaseError(e.to_string())
            })?;
        Ok(())
    }
}
