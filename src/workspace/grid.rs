// src/workspace/grid.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::column_label::column_label;
use super::error::{RecordKind, WorkspaceError, WorkspaceResult};
use super::store::EntityStore;
use super::transfer::{PendingTransfer, TransferMailbox};

pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_COLUMNS: usize = 10;

/// A "database": a sparse grid of string cells over a grow-only extent.
///
/// Growth has no upper bound. The grid is sparse, so an oversized extent
/// only costs the two counters; the UI is expected to virtualize rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseGrid {
    id: String,
    rows: usize,
    cols: usize,
    cells: BTreeMap<(usize, usize), String>,
}

/// On-disk shape: `{ "cells": [["<row>-<col>", value], ...], "rows": n, "cols": n }`.
#[derive(Debug, Serialize, Deserialize)]
struct StoredGrid {
    #[serde(default)]
    cells: Vec<(String, String)>,
    rows: usize,
    cols: usize,
}

impl DatabaseGrid {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLUMNS,
            cells: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.cols
    }

    fn check_bounds(&self, row: usize, col: usize) -> WorkspaceResult<()> {
        if row >= self.rows || col >= self.cols {
            return Err(WorkspaceError::OutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Writes a cell; an empty value clears it.
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> WorkspaceResult<()> {
        self.check_bounds(row, col)?;
        let value = value.into();
        if value.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
        Ok(())
    }

    /// Stored value, or `""` for an empty in-range cell.
    pub fn cell(&self, row: usize, col: usize) -> WorkspaceResult<&str> {
        self.check_bounds(row, col)?;
        Ok(self.cells.get(&(row, col)).map(String::as_str).unwrap_or(""))
    }

    pub fn grow_rows(&mut self) {
        self.rows += 1;
    }

    pub fn grow_columns(&mut self) {
        self.cols += 1;
    }

    /// Non-empty cells in row-major order.
    pub fn filled_cells(&self) -> impl Iterator<Item = ((usize, usize), &str)> {
        self.cells.iter().map(|(&pos, value)| (pos, value.as_str()))
    }

    pub fn filled_count(&self) -> usize {
        self.cells.len()
    }

    /// `"{id}:{column label}{row + 1}"`, e.g. `db-1:A1`.
    pub fn cell_reference(&self, row: usize, col: usize) -> String {
        format!("{}:{}{}", self.id, column_label(col), row + 1)
    }

    pub fn save(&self, store: &mut EntityStore) -> WorkspaceResult<()> {
        store.put(RecordKind::Database, &self.id, &self.to_stored())
    }

    pub fn load(store: &EntityStore, id: &str) -> WorkspaceResult<Self> {
        let stored: StoredGrid = store.get(RecordKind::Database, id)?;
        Self::from_stored(id, stored)
    }

    /// Posts the cell at `(row, col)` to the mailbox for `target_mapper_id`,
    /// replacing any transfer still pending.
    pub fn begin_transfer(
        &self,
        row: usize,
        col: usize,
        target_mapper_id: &str,
        mailbox: &mut TransferMailbox,
    ) -> WorkspaceResult<PendingTransfer> {
        let value = self.cell(row, col)?;
        if value.is_empty() {
            return Err(WorkspaceError::EmptyCell(self.cell_reference(row, col)));
        }
        let transfer = PendingTransfer {
            source_database_id: self.id.clone(),
            column_label: column_label(col),
            row_number: row + 1,
            value: value.to_string(),
            reference: self.cell_reference(row, col),
            target_mapper_id: target_mapper_id.to_string(),
        };
        mailbox.post(transfer.clone());
        Ok(transfer)
    }

    fn to_stored(&self) -> StoredGrid {
        StoredGrid {
            cells: self
                .cells
                .iter()
                .map(|((row, col), value)| (format!("{}-{}", row, col), value.clone()))
                .collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    fn from_stored(id: &str, stored: StoredGrid) -> WorkspaceResult<Self> {
        let key = RecordKind::Database.storage_key(id);
        if stored.rows == 0 || stored.cols == 0 {
            return Err(WorkspaceError::corrupt(
                key,
                format!("extent must be positive, got {}x{}", stored.rows, stored.cols),
            ));
        }
        let mut grid = Self {
            id: id.to_string(),
            rows: stored.rows,
            cols: stored.cols,
            cells: BTreeMap::new(),
        };
        for (cell_key, value) in stored.cells {
            let (row, col) = parse_cell_key(&cell_key)
                .ok_or_else(|| WorkspaceError::corrupt(&key, format!("bad cell key '{}'", cell_key)))?;
            grid.set_cell(row, col, value).map_err(|e| WorkspaceError::corrupt(&key, e))?;
        }
        Ok(grid)
    }
}

fn parse_cell_key(key: &str) -> Option<(usize, usize)> {
    let (row, col) = key.split_once('-')?;
    Some((row.parse().ok()?, col.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_twenty_by_ten_and_empty() {
        let grid = DatabaseGrid::new("db-1");
        assert_eq!((grid.row_count(), grid.column_count()), (20, 10));
        assert_eq!(grid.filled_count(), 0);
        assert_eq!(grid.cell(19, 9).unwrap(), "");
    }

    #[test]
    fn empty_write_clears_cell() {
        let mut grid = DatabaseGrid::new("db-1");
        grid.set_cell(2, 3, "x").unwrap();
        assert_eq!(grid.cell(2, 3).unwrap(), "x");
        grid.set_cell(2, 3, "").unwrap();
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut grid = DatabaseGrid::new("db-1");
        assert!(matches!(grid.set_cell(20, 0, "x"), Err(WorkspaceError::OutOfRange { .. })));
        assert!(matches!(grid.cell(0, 10), Err(WorkspaceError::OutOfRange { .. })));

        grid.grow_rows();
        grid.grow_columns();
        grid.set_cell(20, 10, "corner").unwrap();
        assert_eq!(grid.cell(20, 10).unwrap(), "corner");
    }

    #[test]
    fn growth_keeps_existing_cells() {
        let mut grid = DatabaseGrid::new("db-1");
        grid.set_cell(0, 0, "keep").unwrap();
        grid.grow_rows();
        grid.grow_columns();
        assert_eq!((grid.row_count(), grid.column_count()), (21, 11));
        assert_eq!(grid.cell(0, 0).unwrap(), "keep");
    }

    #[test]
    fn save_load_round_trip() {
        let mut store = EntityStore::in_memory();
        let mut grid = DatabaseGrid::new("db-1");
        grid.grow_rows();
        grid.grow_columns();
        grid.grow_columns();
        grid.set_cell(0, 0, "alpha").unwrap();
        grid.set_cell(20, 11, "edge").unwrap();
        grid.set_cell(5, 2, "mid").unwrap();
        grid.save(&mut store).unwrap();

        let loaded = DatabaseGrid::load(&store, "db-1").unwrap();
        assert_eq!(loaded, grid);
    }

    #[test]
    fn stored_layout_matches_original_format() {
        let mut store = EntityStore::in_memory();
        let mut grid = DatabaseGrid::new("db-1");
        grid.set_cell(1, 2, "v").unwrap();
        grid.save(&mut store).unwrap();

        let raw = store.get_value("database-db-1").unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["rows"], 20);
        assert_eq!(json["cols"], 10);
        assert_eq!(json["cells"][0][0], "1-2");
        assert_eq!(json["cells"][0][1], "v");
    }

    #[test]
    fn loads_record_written_by_the_browser_app() {
        let mut store = EntityStore::in_memory();
        store.put(RecordKind::Database, "db-7", &serde_json::json!({
            "cells": [["0-0", "secret"], ["3-1", ""]],
            "rows": 22,
            "cols": 10
        })).unwrap();
        let grid = DatabaseGrid::load(&store, "db-7").unwrap();
        assert_eq!(grid.row_count(), 22);
        assert_eq!(grid.cell(0, 0).unwrap(), "secret");
        assert_eq!(grid.filled_count(), 1);
    }

    #[test]
    fn invalid_shapes_are_corrupt() {
        let mut store = EntityStore::in_memory();
        let cases = [
            serde_json::json!({ "cells": [], "rows": 0, "cols": 10 }),
            serde_json::json!({ "cells": [["a-b", "x"]], "rows": 20, "cols": 10 }),
            serde_json::json!({ "cells": [["25-0", "x"]], "rows": 20, "cols": 10 }),
            serde_json::json!({ "rows": "many" }),
        ];
        for case in cases {
            store.put(RecordKind::Database, "bad", &case).unwrap();
            assert!(
                matches!(DatabaseGrid::load(&store, "bad"), Err(WorkspaceError::CorruptRecord { .. })),
                "expected corrupt for {case}"
            );
        }
    }

    #[test]
    fn transfer_requires_value() {
        let grid = DatabaseGrid::new("db-1");
        let mut mailbox = TransferMailbox::default();
        assert!(matches!(
            grid.begin_transfer(0, 0, "map-1", &mut mailbox),
            Err(WorkspaceError::EmptyCell(_))
        ));
        assert!(mailbox.peek().is_none());
    }

    #[test]
    fn transfer_builds_reference() {
        let mut grid = DatabaseGrid::new("db-1");
        grid.set_cell(4, 27, "x").unwrap_err();
        grid.set_cell(4, 2, "payload").unwrap();
        let mut mailbox = TransferMailbox::default();
        let transfer = grid.begin_transfer(4, 2, "map-1", &mut mailbox).unwrap();
        assert_eq!(transfer.reference, "db-1:C5");
        assert_eq!(transfer.column_label, "C");
        assert_eq!(transfer.row_number, 5);
        assert_eq!(mailbox.peek(), Some(&transfer));
    }
}
