// src/workspace/resources.rs
use bevy::prelude::*;

use super::canvas::{BoxDescriptor, MapperCanvas};
use super::error::RecordKind;
use super::grid::DatabaseGrid;
use super::store::EntityStore;

/// The process-wide entity store.
#[derive(Resource)]
pub struct WorkspaceStore {
    pub store: EntityStore,
    /// Human-readable location, shown in the settings page.
    pub location: String,
    /// Set when the configured file could not be opened and the
    /// workspace fell back to memory.
    pub degraded: Option<String>,
}

impl WorkspaceStore {
    pub fn new(store: EntityStore, location: impl Into<String>) -> Self {
        Self {
            store,
            location: location.into(),
            degraded: None,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct WorkspaceOptions {
    /// Save the open record after every mutation.
    pub auto_save: bool,
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self { auto_save: true }
    }
}

/// Sorted ids for the sidebar, refreshed after create/rename/delete.
#[derive(Resource, Debug, Default, Clone)]
pub struct WorkspaceIndex {
    pub databases: Vec<String>,
    pub mappers: Vec<String>,
}

impl WorkspaceIndex {
    pub fn refresh(&mut self, store: &EntityStore) {
        self.databases = store.list_ids(RecordKind::Database);
        self.mappers = store.list_ids(RecordKind::Mapper);
    }

    pub fn ids(&self, kind: RecordKind) -> &[String] {
        match kind {
            RecordKind::Database => &self.databases,
            RecordKind::Mapper => &self.mappers,
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct OpenDatabase {
    pub grid: Option<DatabaseGrid>,
    pub dirty: bool,
}

impl OpenDatabase {
    pub fn id(&self) -> Option<&str> {
        self.grid.as_ref().map(DatabaseGrid::id)
    }
}

#[derive(Resource, Debug, Default)]
pub struct OpenMapper {
    pub canvas: Option<MapperCanvas>,
    pub dirty: bool,
    /// Taken from the mailbox on open, waiting for a click on the canvas.
    pub pending_placement: Option<BoxDescriptor>,
    pub selected_box: Option<String>,
}

impl OpenMapper {
    pub fn id(&self) -> Option<&str> {
        self.canvas.as_ref().map(MapperCanvas::id)
    }
}
