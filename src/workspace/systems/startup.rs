// src/workspace/systems/startup.rs
use bevy::prelude::*;

use crate::workspace::resources::{WorkspaceIndex, WorkspaceStore};
use crate::workspace::transfer::TransferMailbox;

/// Fills the sidebar index and restores a transfer left pending by the
/// previous run.
pub fn restore_workspace(
    workspace: Res<WorkspaceStore>,
    mut index: ResMut<WorkspaceIndex>,
    mut mailbox: ResMut<TransferMailbox>,
) {
    index.refresh(&workspace.store);
    info!(
        "Workspace: {} database(s) and {} mapper(s) in {}",
        index.databases.len(),
        index.mappers.len(),
        workspace.location
    );

    match TransferMailbox::restore(&workspace.store) {
        Ok(restored) => {
            if let Some(pending) = restored.peek() {
                info!(
                    "Workspace: Pending transfer of {} to mapper '{}' restored.",
                    pending.reference, pending.target_mapper_id
                );
            }
            *mailbox = restored;
        }
        Err(e) => warn!("Workspace: Ignoring unreadable transfer slot: {}", e),
    }
}
