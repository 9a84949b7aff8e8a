#![allow(dead_code)]

use std::cell::RefCell;
use std::path::Path;

use serde_json::Value;
use viet_migrate_catalog::{Collection, Record};
use viet_migrate_db::Destination;
use viet_migrate_import::{CollectionOutcome, MigrationProgress, MigrationReport};

pub fn write_source(dir: &Path, collection: Collection, document: Value) {
    std::fs::write(dir.join(collection.file_name()), document.to_string()).unwrap();
}

/// One call made against a [`RecordingDestination`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Insert { table: String, row: Record },
    Upsert { table: String, row: Record, key: String },
    FirstId { table: String },
    Update { table: String, id: Value, row: Record },
}

/// Destination that accepts everything and remembers what it was asked to do.
#[derive(Default)]
pub struct RecordingDestination {
    pub calls: RefCell<Vec<Call>>,
}

impl RecordingDestination {
    pub fn written_rows(&self) -> Vec<Record> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Insert { row, .. } | Call::Upsert { row, .. } | Call::Update { row, .. } => {
                    Some(row.clone())
                }
                Call::FirstId { .. } => None,
            })
            .collect()
    }
}

impl Destination for RecordingDestination {
    type Error = std::io::Error;

    fn insert(&self, table: &str, row: &Record) -> Result<(), Self::Error> {
        self.calls.borrow_mut().push(Call::Insert {
            table: table.to_string(),
            row: row.clone(),
        });
        Ok(())
    }

    fn upsert(&self, table: &str, row: &Record, key: &str) -> Result<(), Self::Error> {
        self.calls.borrow_mut().push(Call::Upsert {
            table: table.to_string(),
            row: row.clone(),
            key: key.to_string(),
        });
        Ok(())
    }

    fn first_id(&self, table: &str) -> Result<Option<Value>, Self::Error> {
        self.calls.borrow_mut().push(Call::FirstId {
            table: table.to_string(),
        });
        Ok(None)
    }

    fn update(&self, table: &str, id: &Value, row: &Record) -> Result<(), Self::Error> {
        self.calls.borrow_mut().push(Call::Update {
            table: table.to_string(),
            id: id.clone(),
            row: row.clone(),
        });
        Ok(())
    }
}

/// Progress reporter that keeps every event for inspection.
#[derive(Default)]
pub struct RecordingProgress {
    pub started: RefCell<Vec<Collection>>,
    pub failures: RefCell<Vec<(Collection, String)>>,
    pub done: RefCell<Vec<(Collection, CollectionOutcome)>>,
    pub completed: RefCell<bool>,
}

impl MigrationProgress for RecordingProgress {
    fn on_collection_start(&self, collection: Collection) {
        self.started.borrow_mut().push(collection);
    }

    fn on_record_failed(&self, collection: Collection, message: &str) {
        self.failures
            .borrow_mut()
            .push((collection, message.to_string()));
    }

    fn on_collection_done(&self, collection: Collection, outcome: &CollectionOutcome) {
        self.done.borrow_mut().push((collection, *outcome));
    }

    fn on_complete(&self, _report: &MigrationReport) {
        *self.completed.borrow_mut() = true;
    }
}
