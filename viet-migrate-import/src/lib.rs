//! Copy the site's flat JSON documents into the relational store.
//!
//! This crate owns the migration run: reading each collection's source
//! document, reshaping its records, writing them with the collection's write
//! strategy, and reporting per-collection outcomes. Writes are best-effort and
//! non-transactional; a failed record is reported and the run continues.

pub mod driver;
pub mod migrate;
pub mod progress;
pub mod report;
pub mod source;

pub use driver::run_migration;
pub use migrate::{RecordError, migrate_collection, write_record};
pub use progress::{LogProgress, MigrationProgress, SilentProgress};
pub use report::{
    CollectionOutcome, CollectionReport, CollectionStatus, MigrationReport, SkipReason,
};
pub use source::{SourceDir, SourceError, SourceRead};
