// src/cli/records.rs
use super::CliError;
use crate::workspace::canvas::MapperCanvas;
use crate::workspace::column_label::column_label;
use crate::workspace::grid::DatabaseGrid;
use crate::workspace::store::EntityStore;
use crate::workspace::transfer::TransferMailbox;
use crate::workspace::RecordKind;

pub fn list(store: &EntityStore, only: Option<RecordKind>) {
    for kind in RecordKind::ALL {
        if only.is_some_and(|k| k != kind) {
            continue;
        }
        let ids = store.list_ids(kind);
        println!("=== {}s ({}) ===", kind, ids.len());
        for id in ids {
            println!("  {}", id);
        }
        println!();
    }
}

pub fn show(store: &EntityStore, kind: RecordKind, id: &str) -> Result<(), CliError> {
    match kind {
        RecordKind::Database => {
            let grid = DatabaseGrid::load(store, id)?;
            println!(
                "Database '{}': {} rows x {} columns, {} filled cell(s)\n",
                grid.id(),
                grid.row_count(),
                grid.column_count(),
                grid.filled_count()
            );
            println!("{:<8} {}", "Cell", "Value");
            println!("{}", "-".repeat(40));
            for ((row, col), value) in grid.filled_cells() {
                println!("{:<8} {}", format!("{}{}", column_label(col), row + 1), value);
            }
        }
        RecordKind::Mapper => {
            let canvas = MapperCanvas::load(store, id)?;
            println!("Mapper '{}': {} box(es)\n", canvas.id(), canvas.boxes().len());
            println!("{:<40} {:>8} {:>8}  {:<16} {}", "Box", "X", "Y", "Source", "Value");
            println!("{}", "-".repeat(90));
            for placed in canvas.boxes() {
                println!(
                    "{:<40} {:>8.1} {:>8.1}  {:<16} {}",
                    placed.id, placed.x, placed.y, placed.reference, placed.value
                );
            }
        }
    }
    Ok(())
}

pub fn rename(store: &mut EntityStore, kind: RecordKind, old_id: &str, new_id: &str) -> Result<(), CliError> {
    let new_id = new_id.trim();
    store.rename(kind, old_id, new_id)?;
    println!("Renamed {} '{}' -> '{}'", kind, old_id, new_id);
    if kind == RecordKind::Mapper {
        match TransferMailbox::restore(store)
            .and_then(|mut mailbox| mailbox.follow_rename(store, old_id, new_id))
        {
            Ok(true) => println!("Pending transfer now targets '{}'", new_id),
            Ok(false) => {}
            Err(e) => eprintln!("Warning: transfer slot not updated: {}", e),
        }
    }
    Ok(())
}

pub fn delete(store: &mut EntityStore, kind: RecordKind, id: &str) -> Result<(), CliError> {
    store.remove(kind, id)?;
    println!("Deleted {} '{}'", kind, id);
    if kind == RecordKind::Mapper {
        match TransferMailbox::restore(store).and_then(|mut mailbox| mailbox.drop_for(store, id)) {
            Ok(true) => println!("Discarded the transfer pending for '{}'", id),
            Ok(false) => {}
            Err(e) => eprintln!("Warning: transfer slot not updated: {}", e),
        }
    }
    Ok(())
}
