// src/workspace/canvas.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{RecordKind, WorkspaceError, WorkspaceResult};
use super::store::EntityStore;
use super::transfer::{PendingTransfer, TransferMailbox};

/// A box taken from the mailbox but not yet dropped on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxDescriptor {
    pub source_database_id: String,
    pub source_column_label: String,
    pub source_row_number: usize,
    pub value: String,
    pub reference: String,
}

impl From<PendingTransfer> for BoxDescriptor {
    fn from(transfer: PendingTransfer) -> Self {
        Self {
            source_database_id: transfer.source_database_id,
            source_column_label: transfer.column_label,
            source_row_number: transfer.row_number,
            value: transfer.value,
            reference: transfer.reference,
        }
    }
}

/// A positioned copy of a grid cell. `value` is a snapshot taken when the
/// cell was sent; it does not follow later edits of the source grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBox {
    pub id: String,
    pub x: f32,
    pub y: f32,
    #[serde(rename = "database")]
    pub source_database_id: String,
    #[serde(rename = "column")]
    pub source_column_label: String,
    #[serde(rename = "row")]
    pub source_row_number: usize,
    pub value: String,
    #[serde(rename = "cellRef")]
    pub reference: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCanvas {
    #[serde(default)]
    cells: Vec<PlacedBox>,
}

/// A "mapper": an ordered list of placed boxes. Order is insertion order
/// and only matters for stable rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct MapperCanvas {
    id: String,
    boxes: Vec<PlacedBox>,
}

impl MapperCanvas {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            boxes: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn boxes(&self) -> &[PlacedBox] {
        &self.boxes
    }

    pub fn get_box(&self, box_id: &str) -> Option<&PlacedBox> {
        self.boxes.iter().find(|b| b.id == box_id)
    }

    /// Takes the mailbox content if it is addressed to this canvas.
    pub fn consume_pending_transfer(&self, mailbox: &mut TransferMailbox) -> Option<BoxDescriptor> {
        mailbox.take_for(&self.id).map(BoxDescriptor::from)
    }

    /// Appends a box at `(x, y)`, clamped to the non-negative quadrant.
    /// Returns the new box id.
    pub fn place_box(&mut self, descriptor: BoxDescriptor, x: f32, y: f32) -> String {
        let id = self.fresh_box_id();
        self.boxes.push(PlacedBox {
            id: id.clone(),
            x: clamp_axis(x),
            y: clamp_axis(y),
            source_database_id: descriptor.source_database_id,
            source_column_label: descriptor.source_column_label,
            source_row_number: descriptor.source_row_number,
            value: descriptor.value,
            reference: descriptor.reference,
        });
        id
    }

    /// Shifts a box by a delta; each axis is clamped at zero. Returns the new position.
    pub fn move_box(&mut self, box_id: &str, dx: f32, dy: f32) -> WorkspaceResult<(f32, f32)> {
        let placed = self
            .boxes
            .iter_mut()
            .find(|b| b.id == box_id)
            .ok_or_else(|| WorkspaceError::BoxNotFound(box_id.to_string()))?;
        placed.x = clamp_axis(placed.x + dx);
        placed.y = clamp_axis(placed.y + dy);
        Ok((placed.x, placed.y))
    }

    pub fn remove_box(&mut self, box_id: &str) -> WorkspaceResult<PlacedBox> {
        let pos = self
            .boxes
            .iter()
            .position(|b| b.id == box_id)
            .ok_or_else(|| WorkspaceError::BoxNotFound(box_id.to_string()))?;
        Ok(self.boxes.remove(pos))
    }

    pub fn save(&self, store: &mut EntityStore) -> WorkspaceResult<()> {
        let stored = StoredCanvas {
            cells: self.boxes.clone(),
        };
        store.put(RecordKind::Mapper, &self.id, &stored)
    }

    pub fn load(store: &EntityStore, id: &str) -> WorkspaceResult<Self> {
        let stored: StoredCanvas = store.get(RecordKind::Mapper, id)?;
        let key = RecordKind::Mapper.storage_key(id);
        validate_boxes(&key, &stored.cells)?;
        Ok(Self {
            id: id.to_string(),
            boxes: stored.cells,
        })
    }

    fn fresh_box_id(&self) -> String {
        loop {
            let candidate = format!("cell-{}", Uuid::new_v4().simple());
            if self.get_box(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

fn validate_boxes(key: &str, boxes: &[PlacedBox]) -> WorkspaceResult<()> {
    let mut seen = HashSet::new();
    for placed in boxes {
        if !seen.insert(placed.id.as_str()) {
            return Err(WorkspaceError::corrupt(key, format!("duplicate box id '{}'", placed.id)));
        }
        if !(placed.x >= 0.0 && placed.y >= 0.0) {
            return Err(WorkspaceError::corrupt(
                key,
                format!("box '{}' has negative position ({}, {})", placed.id, placed.x, placed.y),
            ));
        }
    }
    Ok(())
}

fn clamp_axis(value: f32) -> f32 {
    value.max(0.0)
}
