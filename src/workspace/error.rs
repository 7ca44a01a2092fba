// src/workspace/error.rs

use std::fmt;

use thiserror::Error;

/// The two record families kept in the entity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKind {
    Database,
    Mapper,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Database, RecordKind::Mapper];

    /// Storage key prefix, e.g. `database-` in `database-db-1700000000000`.
    pub fn key_prefix(self) -> &'static str {
        match self {
            RecordKind::Database => "database-",
            RecordKind::Mapper => "mapper-",
        }
    }

    /// Prefix used when generating fresh ids.
    pub fn id_prefix(self) -> &'static str {
        match self {
            RecordKind::Database => "db-",
            RecordKind::Mapper => "map-",
        }
    }

    /// Reserved key holding the JSON id index for this kind.
    pub fn index_key(self) -> &'static str {
        match self {
            RecordKind::Database => "index:database",
            RecordKind::Mapper => "index:mapper",
        }
    }

    pub fn storage_key(self, id: &str) -> String {
        format!("{}{}", self.key_prefix(), id)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Database => write!(f, "database"),
            RecordKind::Mapper => write!(f, "mapper"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: RecordKind, id: String },
    #[error("box '{0}' not found on this canvas")]
    BoxNotFound(String),
    #[error("{kind} '{id}' already exists")]
    Conflict { kind: RecordKind, id: String },
    #[error("record '{key}' is corrupt: {reason}")]
    CorruptRecord { key: String, reason: String },
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("cell {0} is empty, nothing to transfer")]
    EmptyCell(String),
    #[error("invalid id '{0}'")]
    InvalidId(String),
    #[error("rename of '{from}' to '{to}' aborted: {reason}")]
    RenameAborted {
        from: String,
        to: String,
        reason: String,
    },
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage lock poisoned")]
    LockPoisoned,
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

impl WorkspaceError {
    pub fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
        WorkspaceError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn corrupt(key: impl Into<String>, reason: impl fmt::Display) -> Self {
        WorkspaceError::CorruptRecord {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}
