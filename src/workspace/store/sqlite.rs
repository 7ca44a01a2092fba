// src/workspace/store/sqlite.rs

use std::path::Path;
use std::sync::Mutex;

use bevy::log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};

use super::backend::KeyValueBackend;
use crate::workspace::error::{WorkspaceError, WorkspaceResult};

/// Key-value backend on a single SQLite table.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Opens (or creates) the store file and ensures WAL mode is enabled.
    pub fn open(path: &Path) -> WorkspaceResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;

        // PRAGMA settings are per connection, so they are applied on every open.
        let journal_mode: String =
            conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        if journal_mode.to_uppercase() != "WAL" {
            warn!(
                "Failed to set WAL mode on store {:?}. Current mode: {}",
                path.file_name(),
                journal_mode
            );
        } else {
            debug!("WAL mode activated for store {:?}", path.file_name());
        }

        conn.execute_batch(
            "PRAGMA synchronous=NORMAL;
             PRAGMA busy_timeout=5000;",
        )?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> WorkspaceResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> WorkspaceResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn_mut(&mut self) -> WorkspaceResult<&mut Connection> {
        self.conn.get_mut().map_err(|_| WorkspaceError::LockPoisoned)
    }
}

impl KeyValueBackend for SqliteBackend {
    fn read(&self, key: &str) -> WorkspaceResult<Option<String>> {
        let conn = self.conn.lock().map_err(|_| WorkspaceError::LockPoisoned)?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> WorkspaceResult<()> {
        let conn = self.conn_mut()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> WorkspaceResult<bool> {
        let conn = self.conn_mut()?;
        let changed = conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(changed > 0)
    }

    fn keys(&self) -> WorkspaceResult<Vec<String>> {
        let conn = self.conn.lock().map_err(|_| WorkspaceError::LockPoisoned)?;
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut keys = Vec::new();
        for key in rows {
            keys.push(key?);
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_backend_round_trip() {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        assert_eq!(backend.read("a").unwrap(), None);

        backend.write("a", "1").unwrap();
        backend.write("a", "2").unwrap();
        backend.write("b", "3").unwrap();
        assert_eq!(backend.read("a").unwrap().as_deref(), Some("2"));
        assert_eq!(backend.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);

        assert!(backend.delete("a").unwrap());
        assert!(!backend.delete("a").unwrap());
        assert_eq!(backend.read("a").unwrap(), None);
    }
}
