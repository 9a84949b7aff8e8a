//! Per-collection outcomes and the run summary.

use std::time::Duration;

use chrono::{DateTime, Utc};
use viet_migrate_catalog::Collection;

/// Why a collection wrote nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No source file.
    Missing,
    /// The source document holds no records.
    Empty,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "no source file"),
            Self::Empty => write!(f, "no records"),
        }
    }
}

/// What happened to one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionOutcome {
    /// Every record was attempted; `failed` of them could not be written.
    Migrated { written: usize, failed: usize },
    Skipped(SkipReason),
}

/// How a collection ended up, from the operator's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Every record was written.
    Migrated,
    /// Some records were written, some failed.
    Partial,
    /// Records were attempted and none was written.
    Failed,
    Skipped,
}

impl CollectionOutcome {
    pub fn status(&self) -> CollectionStatus {
        match *self {
            Self::Migrated { failed: 0, .. } => CollectionStatus::Migrated,
            Self::Migrated { written: 0, .. } => CollectionStatus::Failed,
            Self::Migrated { .. } => CollectionStatus::Partial,
            Self::Skipped(_) => CollectionStatus::Skipped,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub collection: Collection,
    pub outcome: CollectionOutcome,
}

/// Summary of a full migration run.
#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub collections: Vec<CollectionReport>,
}

impl MigrationReport {
    fn count(&self, status: CollectionStatus) -> usize {
        self.collections
            .iter()
            .filter(|c| c.outcome.status() == status)
            .count()
    }

    /// Collections whose every record was written.
    pub fn migrated(&self) -> usize {
        self.count(CollectionStatus::Migrated)
    }

    pub fn partial(&self) -> usize {
        self.count(CollectionStatus::Partial)
    }

    /// Collections where no record could be written.
    pub fn failed(&self) -> usize {
        self.count(CollectionStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(CollectionStatus::Skipped)
    }

    pub fn records_written(&self) -> usize {
        self.totals().0
    }

    pub fn records_failed(&self) -> usize {
        self.totals().1
    }

    fn totals(&self) -> (usize, usize) {
        self.collections
            .iter()
            .fold((0, 0), |(w, f), c| match c.outcome {
                CollectionOutcome::Migrated { written, failed } => (w + written, f + failed),
                CollectionOutcome::Skipped(_) => (w, f),
            })
    }

    /// Outcome for one collection, if it was part of the run.
    pub fn outcome(&self, collection: Collection) -> Option<CollectionOutcome> {
        self.collections
            .iter()
            .find(|c| c.collection == collection)
            .map(|c| c.outcome)
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Migration complete: {} collection(s) migrated, {} partial, {} failed, {} skipped, {} record(s) written, {} record(s) failed ({:.1}s)",
            self.migrated(),
            self.partial(),
            self.failed(),
            self.skipped(),
            self.records_written(),
            self.records_failed(),
            self.elapsed.as_secs_f64()
        )
    }
}
