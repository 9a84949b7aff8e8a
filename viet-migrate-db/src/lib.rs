//! Destination stores for migrated site data.
//!
//! Defines the [`Destination`] seam the migrator writes through, and a local
//! SQLite mirror of the site schema (via rusqlite with bundled feature) that
//! implements it.

pub mod destination;
pub mod operations;
pub mod queries;
pub mod schema;

pub use destination::Destination;
pub use operations::{StoreError, table_columns};
pub use queries::{JSON_COLUMNS, count_rows, fetch_rows};
pub use schema::{SchemaError, open_database, open_memory};
