// src/workspace/plugin.rs
use std::path::PathBuf;

use bevy::prelude::*;

use super::events::{
    OperationFeedback, RecordOpened, RequestCreateRecord, RequestDeleteRecord, RequestGrowGrid,
    RequestMoveBox, RequestOpenRecord, RequestPlaceBox, RequestRemoveBox, RequestRenameRecord,
    RequestSaveRecord, RequestSendCellToMapper, UpdateCellEvent,
};
use super::ids::IdGenerator;
use super::resources::{OpenDatabase, OpenMapper, WorkspaceIndex, WorkspaceOptions, WorkspaceStore};
use super::store::EntityStore;
use super::systems;
use super::transfer::TransferMailbox;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorkspaceSystemSet {
    Edits,   // Grid edits and outgoing transfers
    Records, // Create / open / rename / delete / save
    Canvas,  // Box placement and movement on the open mapper
    Persist, // Auto-save
}

#[derive(Debug, Clone)]
pub enum StoreLocation {
    File(PathBuf),
    InMemory,
}

/// Entity store, transfer mailbox and the record editing systems.
pub struct WorkspacePlugin {
    pub location: StoreLocation,
}

impl WorkspacePlugin {
    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::InMemory,
        }
    }
}

fn open_store(location: &StoreLocation) -> WorkspaceStore {
    match location {
        StoreLocation::InMemory => WorkspaceStore::new(EntityStore::in_memory(), "memory"),
        StoreLocation::File(path) => match EntityStore::open_sqlite(path) {
            Ok(store) => WorkspaceStore::new(store, path.display().to_string()),
            Err(e) => {
                error!("Workspace: Could not open {:?}: {}. Using a temporary in-memory store.", path, e);
                let mut fallback = WorkspaceStore::new(EntityStore::in_memory(), "memory");
                fallback.degraded = Some(format!("Could not open {}: {}", path.display(), e));
                fallback
            }
        },
    }
}

impl Plugin for WorkspacePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                WorkspaceSystemSet::Edits,
                WorkspaceSystemSet::Records.after(WorkspaceSystemSet::Edits),
                WorkspaceSystemSet::Canvas.after(WorkspaceSystemSet::Records),
                WorkspaceSystemSet::Persist.after(WorkspaceSystemSet::Canvas),
            ),
        );

        app.insert_resource(open_store(&self.location))
            .init_resource::<WorkspaceOptions>()
            .init_resource::<WorkspaceIndex>()
            .init_resource::<TransferMailbox>()
            .init_resource::<IdGenerator>()
            .init_resource::<OpenDatabase>()
            .init_resource::<OpenMapper>();

        app.add_event::<RequestCreateRecord>()
            .add_event::<RequestOpenRecord>()
            .add_event::<RequestRenameRecord>()
            .add_event::<RequestDeleteRecord>()
            .add_event::<RequestSaveRecord>()
            .add_event::<UpdateCellEvent>()
            .add_event::<RequestGrowGrid>()
            .add_event::<RequestSendCellToMapper>()
            .add_event::<RequestPlaceBox>()
            .add_event::<RequestMoveBox>()
            .add_event::<RequestRemoveBox>()
            .add_event::<RecordOpened>()
            .add_event::<OperationFeedback>();

        app.add_systems(Startup, systems::startup::restore_workspace);

        app.add_systems(
            Update,
            (
                systems::grid_edits::handle_cell_update,
                systems::grid_edits::handle_grow_grid,
                systems::grid_edits::handle_send_cell_to_mapper,
            )
                .chain()
                .in_set(WorkspaceSystemSet::Edits),
        );
        app.add_systems(
            Update,
            (
                systems::records::handle_create_record,
                systems::records::handle_rename_record,
                systems::records::handle_delete_record,
                systems::records::handle_open_record,
                systems::records::handle_save_record,
            )
                .chain()
                .in_set(WorkspaceSystemSet::Records),
        );
        app.add_systems(
            Update,
            (
                systems::canvas_edits::handle_place_box,
                systems::canvas_edits::handle_move_box,
                systems::canvas_edits::handle_remove_box,
            )
                .chain()
                .in_set(WorkspaceSystemSet::Canvas),
        );
        app.add_systems(
            Update,
            systems::persistence::auto_save_open_records.in_set(WorkspaceSystemSet::Persist),
        );

        info!("WorkspacePlugin initialized ({:?}).", self.location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::error::RecordKind;
    use crate::workspace::events::GridAxis;
    use crate::workspace::grid::DatabaseGrid;
    use crate::workspace::transfer::{PendingTransfer, TRANSFER_KEY};

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(WorkspacePlugin::in_memory());
        app.update();
        app
    }

    fn feedback(app: &App) -> Vec<OperationFeedback> {
        app.world()
            .resource::<Events<OperationFeedback>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    fn create(app: &mut App, kind: RecordKind) -> String {
        app.world_mut().send_event(RequestCreateRecord { kind });
        app.update();
        let index = app.world().resource::<WorkspaceIndex>();
        index.ids(kind).last().cloned().unwrap()
    }

    #[test]
    fn create_opens_and_indexes() {
        let mut app = app();
        let db = create(&mut app, RecordKind::Database);
        assert!(db.starts_with("db-"));
        assert_eq!(app.world().resource::<OpenDatabase>().id(), Some(db.as_str()));
        assert!(app.world().resource::<WorkspaceStore>().store.contains(RecordKind::Database, &db));
    }

    #[test]
    fn edits_are_auto_saved() {
        let mut app = app();
        let db = create(&mut app, RecordKind::Database);
        app.world_mut().send_event(UpdateCellEvent { row: 1, col: 2, value: "alpha".into() });
        app.world_mut().send_event(RequestGrowGrid { axis: GridAxis::Rows });
        app.update();

        let stored = DatabaseGrid::load(&app.world().resource::<WorkspaceStore>().store, &db).unwrap();
        assert_eq!(stored.cell(1, 2).unwrap(), "alpha");
        assert_eq!(stored.row_count(), 21);
        assert!(!app.world().resource::<OpenDatabase>().dirty);
    }

    #[test]
    fn manual_save_when_auto_save_is_off() {
        let mut app = app();
        app.world_mut().resource_mut::<WorkspaceOptions>().auto_save = false;
        let db = create(&mut app, RecordKind::Database);
        app.world_mut().send_event(UpdateCellEvent { row: 0, col: 0, value: "x".into() });
        app.update();
        let store = &app.world().resource::<WorkspaceStore>().store;
        assert_eq!(DatabaseGrid::load(store, &db).unwrap().filled_count(), 0);

        app.world_mut().send_event(RequestSaveRecord { kind: RecordKind::Database });
        app.update();
        let store = &app.world().resource::<WorkspaceStore>().store;
        assert_eq!(DatabaseGrid::load(store, &db).unwrap().cell(0, 0).unwrap(), "x");
    }

    #[test]
    fn send_cell_opens_mapper_with_pending_placement() {
        let mut app = app();
        let map = create(&mut app, RecordKind::Mapper);
        create(&mut app, RecordKind::Database);
        app.world_mut().send_event(UpdateCellEvent { row: 0, col: 0, value: "secret".into() });
        app.update();

        app.world_mut().send_event(RequestSendCellToMapper {
            row: 0,
            col: 0,
            target_mapper_id: map.clone(),
        });
        app.update();

        let open_map = app.world().resource::<OpenMapper>();
        assert_eq!(open_map.id(), Some(map.as_str()));
        let pending = open_map.pending_placement.as_ref().unwrap();
        assert_eq!(pending.value, "secret");
        assert!(app.world().resource::<TransferMailbox>().peek().is_none());
        let store = &app.world().resource::<WorkspaceStore>().store;
        assert_eq!(store.get_value(TRANSFER_KEY).unwrap(), None);

        app.world_mut().send_event(RequestPlaceBox { x: 10.0, y: 20.0 });
        app.update();
        let open_map = app.world().resource::<OpenMapper>();
        let canvas = open_map.canvas.as_ref().unwrap();
        assert_eq!(canvas.boxes().len(), 1);
        assert_eq!(canvas.boxes()[0].value, "secret");
        assert_eq!(open_map.selected_box.as_deref(), Some(canvas.boxes()[0].id.as_str()));
        assert!(open_map.pending_placement.is_none());
    }

    #[test]
    fn send_to_missing_mapper_is_reported() {
        let mut app = app();
        create(&mut app, RecordKind::Database);
        app.world_mut().send_event(UpdateCellEvent { row: 0, col: 0, value: "v".into() });
        app.world_mut().send_event(RequestSendCellToMapper {
            row: 0,
            col: 0,
            target_mapper_id: "map-404".into(),
        });
        app.update();
        assert!(feedback(&app).iter().any(|f| f.is_error && f.message.contains("map-404")));
        assert!(app.world().resource::<TransferMailbox>().peek().is_none());
    }

    #[test]
    fn rename_conflict_leaves_both_records() {
        let mut app = app();
        let a = create(&mut app, RecordKind::Database);
        let b = create(&mut app, RecordKind::Database);
        app.world_mut().send_event(RequestRenameRecord {
            kind: RecordKind::Database,
            old_id: a.clone(),
            new_id: b.clone(),
        });
        app.update();
        assert!(feedback(&app).iter().any(|f| f.is_error));
        let index = app.world().resource::<WorkspaceIndex>();
        assert_eq!(index.databases.len(), 2);

        app.world_mut().send_event(RequestRenameRecord {
            kind: RecordKind::Database,
            old_id: b.clone(),
            new_id: "  assets  ".into(),
        });
        app.update();
        let index = app.world().resource::<WorkspaceIndex>();
        assert!(index.databases.contains(&"assets".to_string()));
        assert!(!index.databases.contains(&b));
        assert_eq!(app.world().resource::<OpenDatabase>().id(), Some("assets"));
    }

    #[test]
    fn delete_closes_open_record() {
        let mut app = app();
        let map = create(&mut app, RecordKind::Mapper);
        app.world_mut().send_event(RequestDeleteRecord { kind: RecordKind::Mapper, id: map.clone() });
        app.update();
        assert!(app.world().resource::<OpenMapper>().canvas.is_none());
        assert!(app.world().resource::<WorkspaceIndex>().mappers.is_empty());

        app.world_mut().send_event(RequestOpenRecord { kind: RecordKind::Mapper, id: map });
        app.update();
        assert!(feedback(&app).iter().any(|f| f.is_error));
    }

    fn post_transfer(app: &mut App, target: &str) {
        let transfer = PendingTransfer {
            source_database_id: "db-1".into(),
            column_label: "A".into(),
            row_number: 1,
            value: "MFA".into(),
            reference: "db-1:A1".into(),
            target_mapper_id: target.into(),
        };
        let world = app.world_mut();
        world.resource_mut::<TransferMailbox>().post(transfer);
        let mailbox = world.resource::<TransferMailbox>().clone();
        mailbox.persist(&mut world.resource_mut::<WorkspaceStore>().store).unwrap();
    }

    fn stored_target(app: &App) -> Option<String> {
        let store = &app.world().resource::<WorkspaceStore>().store;
        TransferMailbox::restore(store)
            .unwrap()
            .peek()
            .map(|t| t.target_mapper_id.clone())
    }

    #[test]
    fn pending_transfer_follows_mapper_rename_and_delete() {
        let mut app = app();
        let map = create(&mut app, RecordKind::Mapper);
        post_transfer(&mut app, &map);

        app.world_mut().send_event(RequestRenameRecord {
            kind: RecordKind::Mapper,
            old_id: map,
            new_id: "flows".into(),
        });
        app.update();
        assert_eq!(stored_target(&app).as_deref(), Some("flows"));

        app.world_mut().send_event(RequestDeleteRecord { kind: RecordKind::Mapper, id: "flows".into() });
        app.update();
        assert!(app.world().resource::<TransferMailbox>().peek().is_none());
        assert_eq!(stored_target(&app), None);
    }
}
