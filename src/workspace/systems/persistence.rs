// src/workspace/systems/persistence.rs
use bevy::prelude::*;

use super::records::{save_open_database, save_open_mapper};
use crate::workspace::{
    events::OperationFeedback,
    resources::{OpenDatabase, OpenMapper, WorkspaceOptions, WorkspaceStore},
};

/// Saves dirty open records at the end of the frame when auto-save is on.
/// A failing save is reported once, then retried silently until it succeeds.
pub fn auto_save_open_records(
    options: Res<WorkspaceOptions>,
    mut workspace: ResMut<WorkspaceStore>,
    mut open_db: ResMut<OpenDatabase>,
    mut open_map: ResMut<OpenMapper>,
    mut feedback: EventWriter<OperationFeedback>,
    mut failing: Local<(bool, bool)>,
) {
    if !options.auto_save {
        return;
    }

    if open_db.dirty {
        match save_open_database(&mut workspace, &mut open_db) {
            Ok(_) => failing.0 = false,
            Err(e) => {
                if !failing.0 {
                    error!("Workspace: Auto-save of database failed: {}", e);
                    feedback.write(OperationFeedback::error(format!("Auto-save failed: {}", e)));
                }
                failing.0 = true;
            }
        }
    }

    if open_map.dirty {
        match save_open_mapper(&mut workspace, &mut open_map) {
            Ok(_) => failing.1 = false,
            Err(e) => {
                if !failing.1 {
                    error!("Workspace: Auto-save of mapper failed: {}", e);
                    feedback.write(OperationFeedback::error(format!("Auto-save failed: {}", e)));
                }
                failing.1 = true;
            }
        }
    }
}
