// src/workspace/systems/grid_edits.rs
use bevy::prelude::*;

use crate::workspace::{
    error::{RecordKind, WorkspaceError},
    events::{
        GridAxis, OperationFeedback, RequestGrowGrid, RequestOpenRecord, RequestSendCellToMapper,
        UpdateCellEvent,
    },
    resources::{OpenDatabase, WorkspaceStore},
    transfer::TransferMailbox,
};

pub fn handle_cell_update(
    mut events: EventReader<UpdateCellEvent>,
    mut open_db: ResMut<OpenDatabase>,
    mut feedback: EventWriter<OperationFeedback>,
) {
    let open = &mut *open_db;
    for event in events.read() {
        let Some(grid) = open.grid.as_mut() else {
            warn!("Workspace: Cell update with no database open");
            continue;
        };
        match grid.set_cell(event.row, event.col, event.value.clone()) {
            Ok(()) => {
                trace!("Workspace: {} = {:?}", grid.cell_reference(event.row, event.col), event.value);
                open.dirty = true;
            }
            Err(e) => {
                feedback.write(OperationFeedback::error(format!("Cell update rejected: {}", e)));
            }
        }
    }
}

pub fn handle_grow_grid(mut events: EventReader<RequestGrowGrid>, mut open_db: ResMut<OpenDatabase>) {
    let open = &mut *open_db;
    for event in events.read() {
        let Some(grid) = open.grid.as_mut() else {
            continue;
        };
        match event.axis {
            GridAxis::Rows => grid.grow_rows(),
            GridAxis::Columns => grid.grow_columns(),
        }
        debug!(
            "Workspace: '{}' is now {}x{}",
            grid.id(),
            grid.row_count(),
            grid.column_count()
        );
        open.dirty = true;
    }
}

/// Posts the selected cell to the mailbox (last write wins), mirrors the
/// slot to the store and asks for the target mapper to be opened.
pub fn handle_send_cell_to_mapper(
    mut events: EventReader<RequestSendCellToMapper>,
    mut workspace: ResMut<WorkspaceStore>,
    mut mailbox: ResMut<TransferMailbox>,
    open_db: Res<OpenDatabase>,
    mut feedback: EventWriter<OperationFeedback>,
    mut open_writer: EventWriter<RequestOpenRecord>,
) {
    for event in events.read() {
        let Some(grid) = open_db.grid.as_ref() else {
            feedback.write(OperationFeedback::error("Open a database first."));
            continue;
        };
        if !workspace.store.contains(RecordKind::Mapper, &event.target_mapper_id) {
            let e = WorkspaceError::not_found(RecordKind::Mapper, &event.target_mapper_id);
            feedback.write(OperationFeedback::error(format!("Send failed: {}", e)));
            continue;
        }

        match grid.begin_transfer(event.row, event.col, &event.target_mapper_id, &mut mailbox) {
            Ok(transfer) => {
                if let Err(e) = mailbox.persist(&mut workspace.store) {
                    warn!("Workspace: Transfer not mirrored to store: {}", e);
                }
                info!(
                    "Workspace: Sent {} to mapper '{}'",
                    transfer.reference, transfer.target_mapper_id
                );
                feedback.write(OperationFeedback::info(format!(
                    "Sent {} to mapper '{}'.",
                    transfer.reference, transfer.target_mapper_id
                )));
                open_writer.write(RequestOpenRecord {
                    kind: RecordKind::Mapper,
                    id: transfer.target_mapper_id,
                });
            }
            Err(e) => {
                feedback.write(OperationFeedback::error(format!("Send failed: {}", e)));
            }
        }
    }
}
