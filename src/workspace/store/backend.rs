// src/workspace/store/backend.rs

use crate::workspace::error::WorkspaceResult;

/// Flat string-to-string storage underneath [`super::EntityStore`].
///
/// Every write is a single-key overwrite; there is no partial state.
pub trait KeyValueBackend: Send + Sync {
    fn read(&self, key: &str) -> WorkspaceResult<Option<String>>;

    fn write(&mut self, key: &str, value: &str) -> WorkspaceResult<()>;

    /// Returns whether the key existed.
    fn delete(&mut self, key: &str) -> WorkspaceResult<bool>;

    /// Full key scan. Only maintenance paths (index rebuild, verify) call this.
    fn keys(&self) -> WorkspaceResult<Vec<String>>;
}
