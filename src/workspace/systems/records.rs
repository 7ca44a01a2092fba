// src/workspace/systems/records.rs
use bevy::prelude::*;

use crate::workspace::{
    canvas::MapperCanvas,
    error::{RecordKind, WorkspaceResult},
    events::{
        OperationFeedback, RecordOpened, RequestCreateRecord, RequestDeleteRecord,
        RequestOpenRecord, RequestRenameRecord, RequestSaveRecord,
    },
    grid::DatabaseGrid,
    ids::IdGenerator,
    resources::{OpenDatabase, OpenMapper, WorkspaceIndex, WorkspaceStore},
    transfer::TransferMailbox,
};

/// Creates an empty record under a fresh id, saves it and opens it.
pub fn handle_create_record(
    mut events: EventReader<RequestCreateRecord>,
    mut workspace: ResMut<WorkspaceStore>,
    mut ids: ResMut<IdGenerator>,
    mut index: ResMut<WorkspaceIndex>,
    mut open_db: ResMut<OpenDatabase>,
    mut open_map: ResMut<OpenMapper>,
    mut feedback: EventWriter<OperationFeedback>,
    mut opened: EventWriter<RecordOpened>,
) {
    for event in events.read() {
        let id = ids.next_id(event.kind, &workspace.store);
        let created: WorkspaceResult<()> = match event.kind {
            RecordKind::Database => {
                let grid = DatabaseGrid::new(&id);
                grid.save(&mut workspace.store).map(|()| {
                    warn_if_discarding(event.kind, open_db.id(), open_db.dirty);
                    open_db.grid = Some(grid);
                    open_db.dirty = false;
                })
            }
            RecordKind::Mapper => {
                let canvas = MapperCanvas::new(&id);
                canvas.save(&mut workspace.store).map(|()| {
                    warn_if_discarding(event.kind, open_map.id(), open_map.dirty);
                    *open_map = OpenMapper {
                        canvas: Some(canvas),
                        ..default()
                    };
                })
            }
        };

        match created {
            Ok(()) => {
                info!("Workspace: Created {} '{}'", event.kind, id);
                index.refresh(&workspace.store);
                feedback.write(OperationFeedback::info(format!("Created {} '{}'.", event.kind, id)));
                opened.write(RecordOpened { kind: event.kind, id });
            }
            Err(e) => {
                error!("Workspace: Failed to create {}: {}", event.kind, e);
                feedback.write(OperationFeedback::error(format!(
                    "Failed to create {}: {}",
                    event.kind, e
                )));
            }
        }
    }
}

/// Loads a record. A mapper also takes the transfer addressed to it and
/// holds it as the pending placement.
pub fn handle_open_record(
    mut events: EventReader<RequestOpenRecord>,
    mut workspace: ResMut<WorkspaceStore>,
    mut mailbox: ResMut<TransferMailbox>,
    mut open_db: ResMut<OpenDatabase>,
    mut open_map: ResMut<OpenMapper>,
    mut feedback: EventWriter<OperationFeedback>,
    mut opened: EventWriter<RecordOpened>,
) {
    for event in events.read() {
        match event.kind {
            RecordKind::Database => {
                if open_db.id() != Some(event.id.as_str()) {
                    match DatabaseGrid::load(&workspace.store, &event.id) {
                        Ok(grid) => {
                            warn_if_discarding(event.kind, open_db.id(), open_db.dirty);
                            open_db.grid = Some(grid);
                            open_db.dirty = false;
                        }
                        Err(e) => {
                            error!("Workspace: Failed to open database '{}': {}", event.id, e);
                            feedback.write(OperationFeedback::error(format!(
                                "Could not open database '{}': {}",
                                event.id, e
                            )));
                            continue;
                        }
                    }
                }
            }
            RecordKind::Mapper => {
                if open_map.id() != Some(event.id.as_str()) {
                    match MapperCanvas::load(&workspace.store, &event.id) {
                        Ok(canvas) => {
                            warn_if_discarding(event.kind, open_map.id(), open_map.dirty);
                            *open_map = OpenMapper {
                                canvas: Some(canvas),
                                ..default()
                            };
                        }
                        Err(e) => {
                            error!("Workspace: Failed to open mapper '{}': {}", event.id, e);
                            feedback.write(OperationFeedback::error(format!(
                                "Could not open mapper '{}': {}",
                                event.id, e
                            )));
                            continue;
                        }
                    }
                }

                let consumed = open_map
                    .canvas
                    .as_ref()
                    .and_then(|canvas| canvas.consume_pending_transfer(&mut mailbox));
                if let Some(descriptor) = consumed {
                    if let Err(e) = mailbox.persist(&mut workspace.store) {
                        warn!("Workspace: Could not clear stored transfer slot: {}", e);
                    }
                    info!(
                        "Workspace: Mapper '{}' received {}",
                        event.id, descriptor.reference
                    );
                    feedback.write(OperationFeedback::info(format!(
                        "Click on the canvas to place {}.",
                        descriptor.reference
                    )));
                    open_map.pending_placement = Some(descriptor);
                }
            }
        }

        debug!("Workspace: Opened {} '{}'", event.kind, event.id);
        opened.write(RecordOpened {
            kind: event.kind,
            id: event.id.clone(),
        });
    }
}

pub fn handle_rename_record(
    mut events: EventReader<RequestRenameRecord>,
    mut workspace: ResMut<WorkspaceStore>,
    mut mailbox: ResMut<TransferMailbox>,
    mut index: ResMut<WorkspaceIndex>,
    mut open_db: ResMut<OpenDatabase>,
    mut open_map: ResMut<OpenMapper>,
    mut feedback: EventWriter<OperationFeedback>,
) {
    for event in events.read() {
        let old_id = event.old_id.as_str();
        let new_id = event.new_id.trim();
        info!("Workspace: Rename {} '{}' -> '{}'", event.kind, old_id, new_id);

        if let Err(e) = workspace.store.rename(event.kind, old_id, new_id) {
            warn!("Workspace: Rename failed: {}", e);
            feedback.write(OperationFeedback::error(format!("Rename failed: {}", e)));
            continue;
        }
        if old_id == new_id {
            continue;
        }

        match event.kind {
            RecordKind::Database => {
                if let Some(grid) = open_db.grid.as_mut().filter(|g| g.id() == old_id) {
                    grid.set_id(new_id);
                }
            }
            RecordKind::Mapper => {
                if let Some(canvas) = open_map.canvas.as_mut().filter(|c| c.id() == old_id) {
                    canvas.set_id(new_id);
                }
                if let Err(e) = mailbox.follow_rename(&mut workspace.store, old_id, new_id) {
                    warn!("Workspace: Could not update stored transfer slot: {}", e);
                }
            }
        }

        index.refresh(&workspace.store);
        feedback.write(OperationFeedback::info(format!(
            "Renamed {} '{}' to '{}'.",
            event.kind, old_id, new_id
        )));
    }
}

pub fn handle_delete_record(
    mut events: EventReader<RequestDeleteRecord>,
    mut workspace: ResMut<WorkspaceStore>,
    mut mailbox: ResMut<TransferMailbox>,
    mut index: ResMut<WorkspaceIndex>,
    mut open_db: ResMut<OpenDatabase>,
    mut open_map: ResMut<OpenMapper>,
    mut feedback: EventWriter<OperationFeedback>,
) {
    for event in events.read() {
        if let Err(e) = workspace.store.remove(event.kind, &event.id) {
            warn!("Workspace: Delete failed: {}", e);
            feedback.write(OperationFeedback::error(format!("Delete failed: {}", e)));
            continue;
        }

        match event.kind {
            RecordKind::Database => {
                if open_db.id() == Some(event.id.as_str()) {
                    *open_db = OpenDatabase::default();
                }
            }
            RecordKind::Mapper => {
                if open_map.id() == Some(event.id.as_str()) {
                    *open_map = OpenMapper::default();
                }
                if let Err(e) = mailbox.drop_for(&mut workspace.store, &event.id) {
                    warn!("Workspace: Could not clear stored transfer slot: {}", e);
                }
            }
        }

        info!("Workspace: Deleted {} '{}'", event.kind, event.id);
        index.refresh(&workspace.store);
        feedback.write(OperationFeedback::info(format!("Deleted {} '{}'.", event.kind, event.id)));
    }
}

pub fn handle_save_record(
    mut events: EventReader<RequestSaveRecord>,
    mut workspace: ResMut<WorkspaceStore>,
    mut open_db: ResMut<OpenDatabase>,
    mut open_map: ResMut<OpenMapper>,
    mut feedback: EventWriter<OperationFeedback>,
) {
    for event in events.read() {
        let saved = match event.kind {
            RecordKind::Database => save_open_database(&mut workspace, &mut open_db),
            RecordKind::Mapper => save_open_mapper(&mut workspace, &mut open_map),
        };
        match saved {
            Ok(Some(id)) => {
                feedback.write(OperationFeedback::info(format!("Saved {} '{}'.", event.kind, id)));
            }
            Ok(None) => {
                feedback.write(OperationFeedback::error(format!("No {} is open.", event.kind)));
            }
            Err(e) => {
                error!("Workspace: Save failed: {}", e);
                feedback.write(OperationFeedback::error(format!("Save failed: {}", e)));
            }
        }
    }
}

/// Returns the saved id, or `None` when nothing is open.
pub(crate) fn save_open_database(
    workspace: &mut WorkspaceStore,
    open_db: &mut OpenDatabase,
) -> WorkspaceResult<Option<String>> {
    let Some(grid) = open_db.grid.as_ref() else {
        return Ok(None);
    };
    grid.save(&mut workspace.store)?;
    open_db.dirty = false;
    Ok(Some(grid.id().to_string()))
}

pub(crate) fn save_open_mapper(
    workspace: &mut WorkspaceStore,
    open_map: &mut OpenMapper,
) -> WorkspaceResult<Option<String>> {
    let Some(canvas) = open_map.canvas.as_ref() else {
        return Ok(None);
    };
    canvas.save(&mut workspace.store)?;
    open_map.dirty = false;
    Ok(Some(canvas.id().to_string()))
}

fn warn_if_discarding(kind: RecordKind, current: Option<&str>, dirty: bool) {
    if let (Some(id), true) = (current, dirty) {
        warn!("Workspace: Discarding unsaved changes to {} '{}'", kind, id);
    }
}
