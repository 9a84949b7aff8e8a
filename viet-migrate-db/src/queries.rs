//! Read queries for the SQLite mirror.

use rusqlite::Connection;
use rusqlite::types::ValueRef;
use serde_json::Value;
use viet_migrate_catalog::Record;

use crate::operations::{StoreError, table_columns};

/// Columns that hold nested structures serialized as JSON text.
pub const JSON_COLUMNS: &[&str] = &["sections", "curriculum", "stops", "timings"];

/// Number of rows in a table.
pub fn count_rows(conn: &Connection, table: &str) -> Result<i64, StoreError> {
    table_columns(conn, table)?;
    let count = conn.query_row(
        &format!("SELECT COUNT(*) FROM \"{}\"", table),
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// All rows of a table ordered by id, as records keyed by column name.
///
/// NULL columns are included as `null`. Text in one of [`JSON_COLUMNS`] is
/// decoded back into structure; every other text column stays a string.
pub fn fetch_rows(conn: &Connection, table: &str) -> Result<Vec<Record>, StoreError> {
    let columns = table_columns(conn, table)?;
    let mut stmt = conn.prepare(&format!("SELECT * FROM \"{}\" ORDER BY id", table))?;
    let rows = stmt.query_map([], |row| {
        let mut record = Record::new();
        for (i, name) in columns.iter().enumerate() {
            let json = JSON_COLUMNS.contains(&name.as_str());
            record.insert(name.clone(), from_sql(row.get_ref(i)?, json));
        }
        Ok(record)
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn from_sql(value: ValueRef<'_>, json: bool) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            if json {
                if let Ok(structured) = serde_json::from_str(&text) {
                    return structured;
                }
            }
            Value::String(text.into_owned())
        }
        ValueRef::Blob(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}
