// src/workspace/ids.rs

use bevy::prelude::Resource;
use chrono::Utc;

use super::error::RecordKind;
use super::store::EntityStore;

/// Issues `db-<millis>` / `map-<millis>` ids.
///
/// The stamp never repeats within one generator and ids already present in
/// the store are skipped, so two records created in the same millisecond
/// still get distinct ids.
#[derive(Resource, Debug, Default)]
pub struct IdGenerator {
    last_stamp: i64,
}

impl IdGenerator {
    pub fn next_id(&mut self, kind: RecordKind, store: &EntityStore) -> String {
        self.next_id_at(kind, store, Utc::now().timestamp_millis())
    }

    fn next_id_at(&mut self, kind: RecordKind, store: &EntityStore, now_millis: i64) -> String {
        let mut stamp = now_millis.max(self.last_stamp + 1);
        loop {
            let candidate = format!("{}{}", kind.id_prefix(), stamp);
            if !store.contains(kind, &candidate) {
                self.last_stamp = stamp;
                return candidate;
            }
            stamp += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::grid::DatabaseGrid;

    #[test]
    fn same_millisecond_yields_distinct_ids() {
        let store = EntityStore::in_memory();
        let mut ids = IdGenerator::default();
        let a = ids.next_id_at(RecordKind::Database, &store, 1_000);
        let b = ids.next_id_at(RecordKind::Database, &store, 1_000);
        assert_eq!(a, "db-1000");
        assert_eq!(b, "db-1001");
    }

    #[test]
    fn skips_ids_already_stored() {
        let mut store = EntityStore::in_memory();
        DatabaseGrid::new("db-5000").save(&mut store).unwrap();
        let mut ids = IdGenerator::default();
        assert_eq!(ids.next_id_at(RecordKind::Database, &store, 5_000), "db-5001");
        assert_eq!(ids.next_id_at(RecordKind::Mapper, &store, 5_000), "map-5002");
    }
}
