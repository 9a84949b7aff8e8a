//! Runs the per-collection migrators in order.

use std::time::Instant;

use chrono::Utc;
use viet_migrate_catalog::Collection;
use viet_migrate_db::Destination;

use crate::migrate::migrate_collection;
use crate::progress::MigrationProgress;
use crate::report::{CollectionReport, MigrationReport};
use crate::source::{SourceDir, SourceError};

/// Migrate `collections` sequentially, in the order given.
///
/// Pass [`Collection::all()`] for a full run. Per-record write failures are
/// reported and the run continues; a source error stops the run immediately,
/// leaving earlier writes committed.
pub fn run_migration<D: Destination>(
    dest: &D,
    source: &SourceDir,
    collections: &[Collection],
    progress: &dyn MigrationProgress,
) -> Result<MigrationReport, SourceError> {
    let started_at = Utc::now();
    let clock = Instant::now();
    let mut reports = Vec::with_capacity(collections.len());

    for &collection in collections {
        progress.on_collection_start(collection);
        let outcome = migrate_collection(dest, source, collection, progress)?;
        progress.on_collection_done(collection, &outcome);
        reports.push(CollectionReport {
            collection,
            outcome,
        });
    }

    let report = MigrationReport {
        started_at,
        elapsed: clock.elapsed(),
        collections: reports,
    };
    progress.on_complete(&report);
    Ok(report)
}
