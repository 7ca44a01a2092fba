// src/workspace/store/memory.rs

use std::collections::BTreeMap;

use super::backend::KeyValueBackend;
use crate::workspace::error::WorkspaceResult;

/// Volatile backend for tests and the degraded in-memory workspace.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: BTreeMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn read(&self, key: &str) -> WorkspaceResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> WorkspaceResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> WorkspaceResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> WorkspaceResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}
