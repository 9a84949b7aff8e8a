//! Per-collection migration.
//!
//! Each collection is read, every record reshaped through the catalogue, and
//! written with the collection's strategy. A record that fails to write is
//! reported through the progress callback and counted; it never stops the
//! collection.

use serde_json::Value;
use thiserror::Error;
use viet_migrate_catalog::{Collection, Record, SourceShape, WriteStrategy, department_page_record};
use viet_migrate_db::Destination;

use crate::progress::MigrationProgress;
use crate::report::{CollectionOutcome, SkipReason};
use crate::source::{SourceDir, SourceError, SourceRead};

/// Why a single record was not written.
#[derive(Debug, Error)]
pub enum RecordError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Store(E),
    #[error("record has no '{key}' to upsert on")]
    MissingNaturalKey { key: &'static str },
    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },
    #[error("entry '{slug}' is not a JSON object")]
    EntryNotAnObject { slug: String },
}

/// Write one prepared row using the collection's strategy.
pub fn write_record<D: Destination>(
    dest: &D,
    collection: Collection,
    row: &Record,
) -> Result<(), RecordError<D::Error>> {
    let table = collection.table();
    match collection.strategy() {
        WriteStrategy::Insert => dest.insert(table, row).map_err(RecordError::Store),
        WriteStrategy::Upsert { key } => {
            if !row.contains_key(key) {
                return Err(RecordError::MissingNaturalKey { key });
            }
            dest.upsert(table, row, key).map_err(RecordError::Store)
        }
        WriteStrategy::Singleton => match dest.first_id(table).map_err(RecordError::Store)? {
            Some(id) => dest.update(table, &id, row).map_err(RecordError::Store),
            None => dest.insert(table, row).map_err(RecordError::Store),
        },
    }
}

/// Tally of one collection's writes.
#[derive(Default)]
struct Tally {
    written: usize,
    failed: usize,
}

impl Tally {
    fn record<E: std::error::Error + 'static>(
        &mut self,
        collection: Collection,
        result: Result<(), RecordError<E>>,
        progress: &dyn MigrationProgress,
    ) {
        match result {
            Ok(()) => self.written += 1,
            Err(e) => {
                self.failed += 1;
                progress.on_record_failed(collection, &e.to_string());
            }
        }
    }

    fn outcome(self) -> CollectionOutcome {
        CollectionOutcome::Migrated {
            written: self.written,
            failed: self.failed,
        }
    }
}

/// Migrate one collection from `source` into `dest`.
///
/// Only source problems are returned as errors; write failures are counted in
/// the outcome.
pub fn migrate_collection<D: Destination>(
    dest: &D,
    source: &SourceDir,
    collection: Collection,
    progress: &dyn MigrationProgress,
) -> Result<CollectionOutcome, SourceError> {
    let document = match source.read(collection)? {
        SourceRead::Absent => return Ok(CollectionOutcome::Skipped(SkipReason::Missing)),
        SourceRead::Found(document) => document,
    };

    let outcome = match (collection.shape(), document) {
        (SourceShape::List, Value::Array(items)) => migrate_list(dest, collection, &items, progress),
        (SourceShape::Object, Value::Object(record)) => {
            migrate_singleton(dest, collection, &record, progress)
        }
        (SourceShape::SlugMap, Value::Object(pages)) => {
            migrate_slug_map(dest, collection, &pages, progress)
        }
        (shape, _) => {
            return Err(SourceError::UnexpectedShape {
                collection,
                expected: match shape {
                    SourceShape::List => "an array",
                    SourceShape::Object | SourceShape::SlugMap => "an object",
                },
            });
        }
    };
    Ok(outcome)
}

fn migrate_list<D: Destination>(
    dest: &D,
    collection: Collection,
    items: &[Value],
    progress: &dyn MigrationProgress,
) -> CollectionOutcome {
    if items.is_empty() {
        return CollectionOutcome::Skipped(SkipReason::Empty);
    }

    let mut tally = Tally::default();
    for (index, item) in items.iter().enumerate() {
        let result = match item.as_object() {
            Some(record) => write_record(dest, collection, &collection.prepare(index, record)),
            None => Err(RecordError::NotAnObject { index }),
        };
        tally.record(collection, result, progress);
    }
    tally.outcome()
}

fn migrate_singleton<D: Destination>(
    dest: &D,
    collection: Collection,
    record: &Record,
    progress: &dyn MigrationProgress,
) -> CollectionOutcome {
    let row = collection.prepare(0, record);
    if row.is_empty() {
        return CollectionOutcome::Skipped(SkipReason::Empty);
    }

    let mut tally = Tally::default();
    tally.record(collection, write_record(dest, collection, &row), progress);
    tally.outcome()
}

fn migrate_slug_map<D: Destination>(
    dest: &D,
    collection: Collection,
    pages: &Record,
    progress: &dyn MigrationProgress,
) -> CollectionOutcome {
    if pages.is_empty() {
        return CollectionOutcome::Skipped(SkipReason::Empty);
    }

    let mut tally = Tally::default();
    for (slug, entry) in pages {
        let result = match entry.as_object() {
            Some(entry) => write_record(dest, collection, &department_page_record(slug, entry)),
            None => Err(RecordError::EntryNotAnObject { slug: slug.clone() }),
        };
        tally.record(collection, result, progress);
    }
    tally.outcome()
}
