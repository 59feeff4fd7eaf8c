// storage module for settings, history and session persistence using SQLite
// settings are kept as the raw JSON the shell wrote so the shell owns merging

use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};

/// visits kept in history, oldest dropped first
pub const HISTORY_LIMIT: usize = 200;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("db error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("serialize error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("db lock poisoned")]
    Lock,
}

/// one visited url
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub url: String,
    pub visited_at: i64,
}

pub struct Storage {
    conn: Mutex<Connection>,
}

fn timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

impl Storage {
    /// open (or create) the database file, creating parent dirs as needed
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        info!(path = %path.display(), "opening storage");
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL,
                visited_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS session (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                last_url TEXT NOT NULL
            );
            ",
        )?;
        debug!("storage schema ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_db<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> SqlResult<T>,
    {
        let guard = self.conn.lock().map_err(|_| StorageError::Lock)?;
        Ok(f(&guard)?)
    }

    // --- settings ---

    /// stored settings JSON, `Value::Null` when nothing was saved yet
    pub fn read_settings(&self) -> Result<Value, StorageError> {
        let json: Option<String> = self.with_db(|conn| {
            conn.query_row("SELECT json FROM settings WHERE id = 1", [], |row| row.get(0))
                .optional()
        })?;
        match json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Value::Null),
        }
    }

    pub fn write_settings(&self, value: &Value) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.with_db(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO settings (id, json) VALUES (1, ?1)",
                params![json],
            )?;
            Ok(())
        })
    }

    // --- history ---

    /// record a visit, keep the newest [`HISTORY_LIMIT`], and make it the session url
    pub fn append_history(&self, url: &str) -> Result<(), StorageError> {
        let limit = i64::try_from(HISTORY_LIMIT).unwrap_or(i64::MAX);
        self.with_db(|conn| {
            conn.execute(
                "INSERT INTO history (url, visited_at) VALUES (?1, ?2)",
                params![url, timestamp()],
            )?;
            conn.execute(
                "DELETE FROM history WHERE id NOT IN
                 (SELECT id FROM history ORDER BY id DESC LIMIT ?1)",
                params![limit],
            )?;
            conn.execute(
                "INSERT OR REPLACE INTO session (id, last_url) VALUES (1, ?1)",
                params![url],
            )?;
            Ok(())
        })?;
        debug!(url, "history appended");
        Ok(())
    }

    /// newest first
    #[cfg(test)]
    pub fn history(&self, limit: usize) -> Result<Vec<Visit>, StorageError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.with_db(|conn| {
            let mut stmt = conn.prepare(
                "SELECT url, visited_at FROM history ORDER BY id DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok(Visit {
                    url: row.get(0)?,
                    visited_at: row.get(1)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
    }

    pub fn clear_history(&self) -> Result<(), StorageError> {
        self.with_db(|conn| {
            conn.execute("DELETE FROM history", [])?;
            Ok(())
        })?;
        info!("history cleared");
        Ok(())
    }

    // --- session ---

    /// empty when no page was visited yet
    pub fn last_url(&self) -> Result<String, StorageError> {
        let url: Option<String> = self.with_db(|conn| {
            conn.query_row("SELECT last_url FROM session WHERE id = 1", [], |row| row.get(0))
                .optional()
        })?;
        Ok(url.unwrap_or_default())
    }

    pub fn remember_url(&self, url: &str) -> Result<(), StorageError> {
        self.with_db(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO session (id, last_url) VALUES (1, ?1)",
                params![url],
            )?;
            Ok(())
        })
    }
}
