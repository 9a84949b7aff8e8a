//! The write interface shared by every destination store.

use serde_json::Value;
use viet_migrate_catalog::Record;

/// A relational store the migrator can write rows into.
///
/// Row keys are column names. Implementations decide how unknown columns are
/// reported, but must fail the call rather than silently drop data.
pub trait Destination {
    type Error: std::error::Error + 'static;

    /// Append a new row; the store assigns its identity.
    fn insert(&self, table: &str, row: &Record) -> Result<(), Self::Error>;

    /// Insert a row, or replace the columns of the row whose `key` matches.
    fn upsert(&self, table: &str, row: &Record, key: &str) -> Result<(), Self::Error>;

    /// Identity of the first existing row, if any.
    fn first_id(&self, table: &str) -> Result<Option<Value>, Self::Error>;

    /// Overwrite the given columns on the row with identity `id`.
    fn update(&self, table: &str, id: &Value, row: &Record) -> Result<(), Self::Error>;
}
