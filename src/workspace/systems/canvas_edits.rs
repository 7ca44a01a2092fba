// src/workspace/systems/canvas_edits.rs
use bevy::prelude::*;

use crate::workspace::{
    events::{OperationFeedback, RequestMoveBox, RequestPlaceBox, RequestRemoveBox},
    resources::OpenMapper,
};

pub fn handle_place_box(
    mut events: EventReader<RequestPlaceBox>,
    mut open_map: ResMut<OpenMapper>,
    mut feedback: EventWriter<OperationFeedback>,
) {
    let open = &mut *open_map;
    for event in events.read() {
        let Some(canvas) = open.canvas.as_mut() else {
            continue;
        };
        let Some(descriptor) = open.pending_placement.take() else {
            continue;
        };
        let reference = descriptor.reference.clone();
        let box_id = canvas.place_box(descriptor, event.x, event.y);
        debug!("Workspace: Placed {} as '{}' on '{}'", reference, box_id, canvas.id());
        open.selected_box = Some(box_id);
        open.dirty = true;
        feedback.write(OperationFeedback::info(format!("Placed {} on the canvas.", reference)));
    }
}

pub fn handle_move_box(
    mut events: EventReader<RequestMoveBox>,
    mut open_map: ResMut<OpenMapper>,
    mut feedback: EventWriter<OperationFeedback>,
) {
    let open = &mut *open_map;
    for event in events.read() {
        let Some(canvas) = open.canvas.as_mut() else {
            continue;
        };
        match canvas.move_box(&event.box_id, event.dx, event.dy) {
            Ok((x, y)) => {
                trace!("Workspace: Box '{}' at ({}, {})", event.box_id, x, y);
                open.dirty = true;
            }
            Err(e) => {
                feedback.write(OperationFeedback::error(format!("Move failed: {}", e)));
            }
        }
    }
}

pub fn handle_remove_box(
    mut events: EventReader<RequestRemoveBox>,
    mut open_map: ResMut<OpenMapper>,
    mut feedback: EventWriter<OperationFeedback>,
) {
    let open = &mut *open_map;
    for event in events.read() {
        let Some(canvas) = open.canvas.as_mut() else {
            continue;
        };
        match canvas.remove_box(&event.box_id) {
            Ok(removed) => {
                if open.selected_box.as_deref() == Some(removed.id.as_str()) {
                    open.selected_box = None;
                }
                open.dirty = true;
                feedback.write(OperationFeedback::info(format!("Removed {} from the canvas.", removed.reference)));
            }
            Err(e) => {
                feedback.write(OperationFeedback::error(format!("Remove failed: {}", e)));
            }
        }
    }
}
