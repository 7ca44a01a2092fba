// src/workspace/store/mod.rs
//! Namespaced record persistence over a flat key-value backend.

pub mod backend;
pub mod memory;
pub mod sqlite;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use bevy::log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use backend::KeyValueBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use super::error::{RecordKind, WorkspaceError, WorkspaceResult};

/// Records are stored as JSON under `<kind prefix><id>`. The set of ids per
/// kind is kept in an explicit index persisted next to the records, so
/// listing never scans the backend.
pub struct EntityStore {
    backend: Box<dyn KeyValueBackend>,
    index: BTreeMap<RecordKind, BTreeSet<String>>,
}

impl EntityStore {
    pub fn open(backend: Box<dyn KeyValueBackend>) -> WorkspaceResult<Self> {
        let mut index = BTreeMap::new();
        for kind in RecordKind::ALL {
            let ids = match backend.read(kind.index_key())? {
                Some(raw) => serde_json::from_str::<BTreeSet<String>>(&raw)
                    .map_err(|e| WorkspaceError::corrupt(kind.index_key(), e))?,
                None => BTreeSet::new(),
            };
            debug!("EntityStore: {} {} id(s) indexed.", ids.len(), kind);
            index.insert(kind, ids);
        }
        Ok(Self { backend, index })
    }

    pub fn open_sqlite(path: &Path) -> WorkspaceResult<Self> {
        info!("EntityStore: opening {:?}", path);
        Self::open(Box::new(SqliteBackend::open(path)?))
    }

    pub fn in_memory() -> Self {
        Self {
            backend: Box::new(MemoryBackend::new()),
            index: RecordKind::ALL
                .into_iter()
                .map(|kind| (kind, BTreeSet::new()))
                .collect(),
        }
    }

    pub fn contains(&self, kind: RecordKind, id: &str) -> bool {
        self.index.get(&kind).is_some_and(|ids| ids.contains(id))
    }

    /// All ids of one kind, sorted.
    pub fn list_ids(&self, kind: RecordKind) -> Vec<String> {
        self.index
            .get(&kind)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn put<T: Serialize>(&mut self, kind: RecordKind, id: &str, record: &T) -> WorkspaceResult<()> {
        validate_id(id)?;
        let json = serde_json::to_string(record)?;
        let key = kind.storage_key(id);
        self.backend.write(&key, &json)?;
        if !self.contains(kind, id) {
            let previous = self.index_snapshot(kind);
            self.index_mut(kind).insert(id.to_string());
            if let Err(e) = self.commit_index(kind, previous) {
                self.rollback_key(&key);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Reads and decodes a record. Undecodable JSON is reported as
    /// [`WorkspaceError::CorruptRecord`], never as an empty record.
    pub fn get<T: DeserializeOwned>(&self, kind: RecordKind, id: &str) -> WorkspaceResult<T> {
        let key = kind.storage_key(id);
        let raw = self
            .backend
            .read(&key)?
            .ok_or_else(|| WorkspaceError::not_found(kind, id))?;
        serde_json::from_str(&raw).map_err(|e| WorkspaceError::corrupt(key, e))
    }

    /// Drops the id from the persisted index before deleting the record, so
    /// a failure never leaves an indexed id without its record.
    pub fn remove(&mut self, kind: RecordKind, id: &str) -> WorkspaceResult<()> {
        let key = kind.storage_key(id);
        let indexed = self.contains(kind, id);
        let previous = self.index_snapshot(kind);
        if indexed {
            self.index_mut(kind).remove(id);
            self.commit_index(kind, previous.clone())?;
        }
        match self.backend.delete(&key) {
            Ok(existed) if existed || indexed => Ok(()),
            Ok(_) => Err(WorkspaceError::not_found(kind, id)),
            Err(e) => {
                if indexed {
                    self.restore_index(kind, previous);
                }
                Err(e)
            }
        }
    }

    /// Moves a record to a new id.
    ///
    /// The new key is written and read back, then the index is switched,
    /// then the old key is deleted. If any step fails the new key and the
    /// index are restored, leaving the store as it was.
    pub fn rename(&mut self, kind: RecordKind, old_id: &str, new_id: &str) -> WorkspaceResult<()> {
        let new_id = new_id.trim();
        validate_id(new_id)?;
        if old_id == new_id {
            return Ok(());
        }
        if !self.contains(kind, old_id) {
            return Err(WorkspaceError::not_found(kind, old_id));
        }
        if self.contains(kind, new_id) {
            return Err(WorkspaceError::Conflict {
                kind,
                id: new_id.to_string(),
            });
        }

        let old_key = kind.storage_key(old_id);
        let new_key = kind.storage_key(new_id);
        let payload = self
            .backend
            .read(&old_key)?
            .ok_or_else(|| WorkspaceError::not_found(kind, old_id))?;

        let abort = |reason: String| WorkspaceError::RenameAborted {
            from: old_id.to_string(),
            to: new_id.to_string(),
            reason,
        };

        self.backend.write(&new_key, &payload)?;
        match self.backend.read(&new_key) {
            Ok(Some(copy)) if copy == payload => {}
            Ok(_) => {
                self.rollback_key(&new_key);
                return Err(abort("copy did not verify".to_string()));
            }
            Err(e) => {
                self.rollback_key(&new_key);
                return Err(abort(e.to_string()));
            }
        }

        let previous = self.index_snapshot(kind);
        let ids = self.index_mut(kind);
        ids.remove(old_id);
        ids.insert(new_id.to_string());
        if let Err(e) = self.commit_index(kind, previous.clone()) {
            self.rollback_key(&new_key);
            return Err(abort(e.to_string()));
        }
        if let Err(e) = self.backend.delete(&old_key) {
            self.restore_index(kind, previous);
            self.rollback_key(&new_key);
            return Err(abort(e.to_string()));
        }
        info!("EntityStore: renamed {} '{}' -> '{}'", kind, old_id, new_id);
        Ok(())
    }

    /// Recreates the id index from a full key scan. Maintenance only.
    pub fn rebuild_index(&mut self) -> WorkspaceResult<BTreeMap<RecordKind, usize>> {
        let keys = self.backend.keys()?;
        let mut counts = BTreeMap::new();
        for kind in RecordKind::ALL {
            let ids: BTreeSet<String> = keys
                .iter()
                .filter_map(|key| key.strip_prefix(kind.key_prefix()))
                .map(str::to_string)
                .collect();
            counts.insert(kind, ids.len());
            self.index.insert(kind, ids);
            self.persist_index(kind)?;
        }
        Ok(counts)
    }

    /// Raw access for single, non-namespaced keys (mailbox slot, session).
    pub fn get_value(&self, key: &str) -> WorkspaceResult<Option<String>> {
        self.backend.read(key)
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> WorkspaceResult<()> {
        self.backend.write(key, value)
    }

    pub fn remove_value(&mut self, key: &str) -> WorkspaceResult<bool> {
        self.backend.delete(key)
    }

    fn index_mut(&mut self, kind: RecordKind) -> &mut BTreeSet<String> {
        self.index.entry(kind).or_default()
    }

    fn index_snapshot(&self, kind: RecordKind) -> BTreeSet<String> {
        self.index.get(&kind).cloned().unwrap_or_default()
    }

    /// Persists the in-memory index; on failure puts `previous` back in memory.
    fn commit_index(&mut self, kind: RecordKind, previous: BTreeSet<String>) -> WorkspaceResult<()> {
        if let Err(e) = self.persist_index(kind) {
            self.index.insert(kind, previous);
            return Err(e);
        }
        Ok(())
    }

    /// Best-effort return to an earlier index, in memory and on disk.
    fn restore_index(&mut self, kind: RecordKind, previous: BTreeSet<String>) {
        self.index.insert(kind, previous);
        if let Err(e) = self.persist_index(kind) {
            warn!("EntityStore: could not restore {} index: {}", kind, e);
        }
    }

    fn persist_index(&mut self, kind: RecordKind) -> WorkspaceResult<()> {
        let ids = self.index.get(&kind).cloned().unwrap_or_default();
        let json = serde_json::to_string(&ids)?;
        self.backend.write(kind.index_key(), &json)
    }

    fn rollback_key(&mut self, key: &str) {
        if let Err(e) = self.backend.delete(key) {
            warn!("EntityStore: rollback of '{}' failed: {}", key, e);
        }
    }
}

pub(crate) fn validate_id(id: &str) -> WorkspaceResult<()> {
    if id.trim().is_empty() || id != id.trim() {
        return Err(WorkspaceError::InvalidId(id.to_string()));
    }
    Ok(())
}
