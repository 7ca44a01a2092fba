// src/cli/maintenance.rs
use super::CliError;
use crate::workspace::canvas::MapperCanvas;
use crate::workspace::grid::DatabaseGrid;
use crate::workspace::store::EntityStore;
use crate::workspace::transfer::TransferMailbox;
use crate::workspace::RecordKind;

/// Loads every indexed record plus the transfer slot. Returns the number of
/// problems found.
pub fn check(store: &EntityStore) -> usize {
    let mut problems = 0;
    for kind in RecordKind::ALL {
        for id in store.list_ids(kind) {
            let result = match kind {
                RecordKind::Database => DatabaseGrid::load(store, &id).map(|_| ()),
                RecordKind::Mapper => MapperCanvas::load(store, &id).map(|_| ()),
            };
            match result {
                Ok(()) => println!("  OK    {} '{}'", kind, id),
                Err(e) => {
                    problems += 1;
                    println!("  FAIL  {} '{}': {}", kind, id, e);
                }
            }
        }
    }

    match TransferMailbox::restore(store) {
        Ok(mailbox) => match mailbox.peek() {
            Some(pending) if !store.contains(RecordKind::Mapper, &pending.target_mapper_id) => {
                problems += 1;
                println!(
                    "  FAIL  transfer of {} targets missing mapper '{}'",
                    pending.reference, pending.target_mapper_id
                );
            }
            Some(pending) => println!("  OK    transfer of {} pending", pending.reference),
            None => println!("  OK    no pending transfer"),
        },
        Err(e) => {
            problems += 1;
            println!("  FAIL  transfer slot: {}", e);
        }
    }
    problems
}

pub fn verify(store: &EntityStore) -> Result<(), CliError> {
    println!("=== Verifying workspace ===\n");
    match check(store) {
        0 => {
            println!("\nAll records are readable.");
            Ok(())
        }
        n => Err(CliError::Problems(n)),
    }
}

pub fn reindex(store: &mut EntityStore) -> Result<(), CliError> {
    let counts = store.rebuild_index()?;
    for (kind, count) in counts {
        println!("Indexed {} {}(s)", count, kind);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::transfer::TRANSFER_KEY;

    #[test]
    fn counts_corrupt_records_and_dangling_transfer() {
        let mut store = EntityStore::in_memory();
        DatabaseGrid::new("db-1").save(&mut store).unwrap();
        store
            .put(RecordKind::Mapper, "map-1", &serde_json::json!({ "cells": "nope" }))
            .unwrap();
        store
            .set_value(
                TRANSFER_KEY,
                r#"{"database":"db-1","column":"A","row":1,"value":"v","cellRef":"db-1:A1","targetMapper":"map-9"}"#,
            )
            .unwrap();
        assert_eq!(check(&store), 2);
        assert!(matches!(verify(&store), Err(CliError::Problems(2))));
    }

    #[test]
    fn clean_store_verifies() {
        let mut store = EntityStore::in_memory();
        MapperCanvas::new("map-1").save(&mut store).unwrap();
        assert_eq!(check(&store), 0);
    }
}
