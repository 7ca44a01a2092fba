// src/workspace/transfer.rs

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use super::error::{WorkspaceError, WorkspaceResult};
use super::store::EntityStore;

/// Storage key mirroring the mailbox slot.
pub const TRANSFER_KEY: &str = "transferring-cell";

/// One grid cell on its way to a mapper canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransfer {
    #[serde(rename = "database")]
    pub source_database_id: String,
    #[serde(rename = "column")]
    pub column_label: String,
    /// 1-based.
    #[serde(rename = "row")]
    pub row_number: usize,
    pub value: String,
    #[serde(rename = "cellRef")]
    pub reference: String,
    #[serde(rename = "targetMapper")]
    pub target_mapper_id: String,
}

/// Single-slot handoff between the database grid and a mapper canvas.
///
/// At most one transfer is pending. Posting replaces whatever was there
/// (last write wins); the target canvas takes it exactly once.
#[derive(Resource, Debug, Default, Clone)]
pub struct TransferMailbox {
    slot: Option<PendingTransfer>,
}

impl TransferMailbox {
    /// Returns the transfer that was overwritten, if any.
    pub fn post(&mut self, transfer: PendingTransfer) -> Option<PendingTransfer> {
        self.slot.replace(transfer)
    }

    pub fn peek(&self) -> Option<&PendingTransfer> {
        self.slot.as_ref()
    }

    /// Removes and returns the pending transfer only if it targets `mapper_id`.
    /// A transfer for another canvas is left in place.
    pub fn take_for(&mut self, mapper_id: &str) -> Option<PendingTransfer> {
        if self.slot.as_ref()?.target_mapper_id == mapper_id {
            self.slot.take()
        } else {
            None
        }
    }

    /// Keeps a pending transfer addressed to a renamed canvas deliverable.
    pub fn retarget(&mut self, old_mapper_id: &str, new_mapper_id: &str) -> bool {
        match self.slot.as_mut() {
            Some(pending) if pending.target_mapper_id == old_mapper_id => {
                pending.target_mapper_id = new_mapper_id.to_string();
                true
            }
            _ => false,
        }
    }

    /// Retargets a transfer addressed to a renamed canvas and mirrors the
    /// slot. Returns whether anything changed.
    pub fn follow_rename(
        &mut self,
        store: &mut EntityStore,
        old_mapper_id: &str,
        new_mapper_id: &str,
    ) -> WorkspaceResult<bool> {
        if !self.retarget(old_mapper_id, new_mapper_id) {
            return Ok(false);
        }
        self.persist(store)?;
        Ok(true)
    }

    /// Discards a transfer addressed to a deleted canvas and mirrors the
    /// slot. Returns whether anything changed.
    pub fn drop_for(&mut self, store: &mut EntityStore, mapper_id: &str) -> WorkspaceResult<bool> {
        if self.take_for(mapper_id).is_none() {
            return Ok(false);
        }
        self.persist(store)?;
        Ok(true)
    }

    /// Loads the slot mirrored in the store.
    pub fn restore(store: &EntityStore) -> WorkspaceResult<Self> {
        let slot = match store.get_value(TRANSFER_KEY)? {
            Some(raw) => Some(
                serde_json::from_str(&raw).map_err(|e| WorkspaceError::corrupt(TRANSFER_KEY, e))?,
            ),
            None => None,
        };
        Ok(Self { slot })
    }

    /// Mirrors the slot into the store: written when pending, removed when empty.
    pub fn persist(&self, store: &mut EntityStore) -> WorkspaceResult<()> {
        match &self.slot {
            Some(pending) => store.set_value(TRANSFER_KEY, &serde_json::to_string(pending)?),
            None => store.remove_value(TRANSFER_KEY).map(|_| ()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(value: &str, target: &str) -> PendingTransfer {
        PendingTransfer {
            source_database_id: "db-1".to_string(),
            column_label: "A".to_string(),
            row_number: 1,
            value: value.to_string(),
            reference: "db-1:A1".to_string(),
            target_mapper_id: target.to_string(),
        }
    }

    #[test]
    fn last_write_wins() {
        let mut mailbox = TransferMailbox::default();
        assert!(mailbox.post(transfer("A", "map-1")).is_none());
        let replaced = mailbox.post(transfer("B", "map-1"));
        assert_eq!(replaced.map(|t| t.value), Some("A".to_string()));

        let taken = mailbox.take_for("map-1").unwrap();
        assert_eq!(taken.value, "B");
        assert!(mailbox.peek().is_none());
        assert!(mailbox.take_for("map-1").is_none());
    }

    #[test]
    fn other_canvas_does_not_consume() {
        let mut mailbox = TransferMailbox::default();
        mailbox.post(transfer("A", "map-42"));
        assert!(mailbox.take_for("map-7").is_none());
        assert!(mailbox.peek().is_some());
        assert!(mailbox.take_for("map-42").is_some());
    }

    #[test]
    fn persists_in_original_shape() {
        let mut store = EntityStore::in_memory();
        let mut mailbox = TransferMailbox::default();
        mailbox.post(transfer("secret", "map-42"));
        mailbox.persist(&mut store).unwrap();

        let raw = store.get_value(TRANSFER_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["cellRef"], "db-1:A1");
        assert_eq!(json["targetMapper"], "map-42");
        assert_eq!(json["row"], 1);

        let restored = TransferMailbox::restore(&store).unwrap();
        assert_eq!(restored.peek(), mailbox.peek());

        mailbox.take_for("map-42");
        mailbox.persist(&mut store).unwrap();
        assert_eq!(store.get_value(TRANSFER_KEY).unwrap(), None);
    }

    #[test]
    fn retarget_follows_rename() {
        let mut mailbox = TransferMailbox::default();
        mailbox.post(transfer("A", "map-1"));
        assert!(mailbox.retarget("map-1", "flows"));
        assert!(mailbox.take_for("flows").is_some());
    }

    #[test]
    fn rename_and_delete_update_the_stored_slot() {
        let mut store = EntityStore::in_memory();
        let mut mailbox = TransferMailbox::default();
        mailbox.post(transfer("A", "map-1"));
        mailbox.persist(&mut store).unwrap();

        assert!(!mailbox.follow_rename(&mut store, "map-9", "other").unwrap());
        assert!(mailbox.follow_rename(&mut store, "map-1", "flows").unwrap());
        let stored = TransferMailbox::restore(&store).unwrap();
        assert_eq!(stored.peek().map(|t| t.target_mapper_id.as_str()), Some("flows"));

        assert!(!mailbox.drop_for(&mut store, "map-1").unwrap());
        assert!(mailbox.drop_for(&mut store, "flows").unwrap());
        assert!(mailbox.peek().is_none());
        assert_eq!(store.get_value(TRANSFER_KEY).unwrap(), None);
    }
}
