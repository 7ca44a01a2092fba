// src/workspace/events.rs
use bevy::prelude::Event;

use super::error::RecordKind;

/// Sent by the sidebar "New database" / "New mapper" buttons.
#[derive(Event, Debug, Clone)]
pub struct RequestCreateRecord {
    pub kind: RecordKind,
}

/// Loads a record into the editor. Opening a mapper also consumes a
/// transfer addressed to it.
#[derive(Event, Debug, Clone)]
pub struct RequestOpenRecord {
    pub kind: RecordKind,
    pub id: String,
}

#[derive(Event, Debug, Clone)]
pub struct RequestRenameRecord {
    pub kind: RecordKind,
    pub old_id: String,
    pub new_id: String,
}

#[derive(Event, Debug, Clone)]
pub struct RequestDeleteRecord {
    pub kind: RecordKind,
    pub id: String,
}

/// Writes the open record of `kind` to the store.
#[derive(Event, Debug, Clone)]
pub struct RequestSaveRecord {
    pub kind: RecordKind,
}

#[derive(Event, Debug, Clone)]
pub struct UpdateCellEvent {
    pub row: usize,
    pub col: usize,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    Rows,
    Columns,
}

#[derive(Event, Debug, Clone)]
pub struct RequestGrowGrid {
    pub axis: GridAxis,
}

/// Posts a cell of the open database to the transfer mailbox and opens the
/// target mapper.
#[derive(Event, Debug, Clone)]
pub struct RequestSendCellToMapper {
    pub row: usize,
    pub col: usize,
    pub target_mapper_id: String,
}

/// Drops the pending placement at canvas coordinates `(x, y)`.
#[derive(Event, Debug, Clone)]
pub struct RequestPlaceBox {
    pub x: f32,
    pub y: f32,
}

#[derive(Event, Debug, Clone)]
pub struct RequestMoveBox {
    pub box_id: String,
    pub dx: f32,
    pub dy: f32,
}

#[derive(Event, Debug, Clone)]
pub struct RequestRemoveBox {
    pub box_id: String,
}

/// Emitted after a record was loaded, so the UI can switch pages.
#[derive(Event, Debug, Clone)]
pub struct RecordOpened {
    pub kind: RecordKind,
    pub id: String,
}

/// User-facing result of an operation. Shown by the UI, never fatal.
#[derive(Event, Debug, Clone)]
pub struct OperationFeedback {
    pub message: String,
    pub is_error: bool,
}

impl OperationFeedback {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}
