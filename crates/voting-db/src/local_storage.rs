//! Durable key-value storage scoped to this device.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Database, DbError, OptionalExt};

/// Persisted session identifier.
pub const SESSION_ID_KEY: &str = "session_id";
/// Set once the backend accepted the session registration.
pub const SESSION_REGISTERED_KEY: &str = "session_registered";
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";
/// Informational admin flag; not a security boundary.
pub const ADMIN_AUTHENTICATED_KEY: &str = "admin_authenticated";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredItem {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

impl Database {
    pub fn get_item(&self, key: &str) -> Result<Option<String>, DbError> {
        self.with_conn(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM local_storage WHERE key = ?1",
                    [key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP",
                rusqlite::params![key, value],
            )?;
            Ok(())
        })
    }

    /// Insert only when the key is absent. Returns whether the row was written.
    pub fn set_item_if_absent(&self, key: &str, value: &str) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO local_storage (key, value, updated_at)
                 VALUES (?1, ?2, CURRENT_TIMESTAMP)",
                rusqlite::params![key, value],
            )?;
            Ok(inserted > 0)
        })
    }

    pub fn remove_item(&self, key: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM local_storage WHERE key = ?1", [key])?;
            Ok(())
        })
    }

    pub fn get_all_items(&self) -> Result<Vec<StoredItem>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT key, value, COALESCE(updated_at, '') FROM local_storage ORDER BY key ASC",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(StoredItem {
                    key: row.get(0)?,
                    value: row.get(1)?,
                    updated_at: row.get(2)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    pub fn get_flag(&self, key: &str) -> Result<bool, DbError> {
        Ok(self.get_item(key)?.as_deref() == Some("true"))
    }

    pub fn set_flag(&self, key: &str, value: bool) -> Result<(), DbError> {
        if value {
            self.set_item(key, "true")
        } else {
            self.remove_item(key)
        }
    }

    /// Read an RFC 3339 timestamp item.
    pub fn get_timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, DbError> {
        let Some(raw) = self.get_item(key)? else {
            return Ok(None);
        };
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| DbError::InvalidData(format!("{key}: {e}")))
    }

    pub fn set_timestamp(&self, key: &str, at: DateTime<Utc>) -> Result<(), DbError> {
        self.set_item(key, &at.to_rfc3339())
    }
}
