//! Migration progress reporting.

use viet_migrate_catalog::Collection;

use crate::report::{CollectionOutcome, CollectionStatus, MigrationReport};

/// Trait for receiving migration progress updates.
pub trait MigrationProgress {
    /// Called before a collection's source document is read.
    fn on_collection_start(&self, collection: Collection);

    /// Called for each record that could not be written.
    fn on_record_failed(&self, collection: Collection, message: &str);

    /// Called once a collection has been fully attempted or skipped.
    fn on_collection_done(&self, collection: Collection, outcome: &CollectionOutcome);

    /// Called when the whole run is complete.
    fn on_complete(&self, report: &MigrationReport);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl MigrationProgress for SilentProgress {
    fn on_collection_start(&self, _collection: Collection) {}
    fn on_record_failed(&self, _collection: Collection, _message: &str) {}
    fn on_collection_done(&self, _collection: Collection, _outcome: &CollectionOutcome) {}
    fn on_complete(&self, _report: &MigrationReport) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl MigrationProgress for LogProgress {
    fn on_collection_start(&self, collection: Collection) {
        log::debug!("Migrating {}...", collection);
    }

    fn on_record_failed(&self, collection: Collection, message: &str) {
        log::warn!("\u{26A0} {}: {}", collection, message);
    }

    fn on_collection_done(&self, collection: Collection, outcome: &CollectionOutcome) {
        let (level, line) = done_line(collection, outcome);
        log::log!(level, "{}", line);
    }

    fn on_complete(&self, report: &MigrationReport) {
        log::info!("{}", report.summary_line());
    }
}

/// Log level and text for a finished collection.
///
/// Only a collection with no failed records gets the success marker.
fn done_line(collection: Collection, outcome: &CollectionOutcome) -> (log::Level, String) {
    match (outcome.status(), outcome) {
        (CollectionStatus::Migrated, _) => {
            (log::Level::Info, format!("\u{2713} {} migrated", collection))
        }
        (_, CollectionOutcome::Migrated { written, failed }) => (
            log::Level::Warn,
            format!(
                "\u{26A0} {}: {} of {} record(s) written",
                collection,
                written,
                written + failed
            ),
        ),
        (_, CollectionOutcome::Skipped(reason)) => (
            log::Level::Debug,
            format!("- {} skipped ({})", collection, reason),
        ),
    }
}
