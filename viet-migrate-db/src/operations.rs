//! Row writes against the SQLite mirror.
//!
//! Every written key must name an existing column; unknown columns fail the
//! write instead of being dropped.

use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, params_from_iter};
use serde_json::Value;
use thiserror::Error;
use viet_migrate_catalog::Record;

use crate::destination::Destination;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Unknown table '{0}'")]
    UnknownTable(String),
    #[error("Column '{column}' does not exist on table '{table}'")]
    UnknownColumn { table: String, column: String },
    #[error("Row not found: {table} with id {id}")]
    NotFound { table: String, id: String },
}

/// Column names of a table, in declaration order.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    if columns.is_empty() {
        return Err(StoreError::UnknownTable(table.to_string()));
    }
    Ok(columns)
}

/// Reject any key that isn't a column of `table`.
fn check_columns(conn: &Connection, table: &str, row: &Record) -> Result<(), StoreError> {
    let columns = table_columns(conn, table)?;
    match row.keys().find(|key| !columns.contains(*key)) {
        Some(column) => Err(StoreError::UnknownColumn {
            table: table.to_string(),
            column: column.clone(),
        }),
        None => Ok(()),
    }
}

/// Quote an identifier. Several site columns (`from`, `to`, `order`) are keywords.
fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Convert a JSON value to its SQLite storage form.
///
/// Booleans become 0/1; arrays and objects are stored as JSON text.
pub(crate) fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map(SqlValue::Real).unwrap_or(SqlValue::Null),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    }
}

fn insert_sql(table: &str, row: &Record) -> String {
    if row.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES", quote(table));
    }
    let columns: Vec<_> = row.keys().map(|k| quote(k)).collect();
    let placeholders: Vec<_> = (1..=row.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote(table),
        columns.join(", "),
        placeholders.join(", ")
    )
}

impl Destination for Connection {
    type Error = StoreError;

    fn insert(&self, table: &str, row: &Record) -> Result<(), StoreError> {
        check_columns(self, table, row)?;
        self.execute(&insert_sql(table, row), params_from_iter(row.values().map(to_sql)))?;
        Ok(())
    }

    fn upsert(&self, table: &str, row: &Record, key: &str) -> Result<(), StoreError> {
        check_columns(self, table, row)?;

        let updates: Vec<_> = row
            .keys()
            .filter(|k| k.as_str() != key)
            .map(|k| format!("{0} = excluded.{0}", quote(k)))
            .collect();
        let action = if updates.is_empty() {
            "NOTHING".to_string()
        } else {
            format!("UPDATE SET {}", updates.join(", "))
        };

        let sql = format!(
            "{} ON CONFLICT({}) DO {}",
            insert_sql(table, row),
            quote(key),
            action
        );
        self.execute(&sql, params_from_iter(row.values().map(to_sql)))?;
        Ok(())
    }

    fn first_id(&self, table: &str) -> Result<Option<Value>, StoreError> {
        table_columns(self, table)?;
        let sql = format!("SELECT id FROM {} ORDER BY id LIMIT 1", quote(table));
        let mut stmt = self.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(Value::from(row.get::<_, i64>(0)?))),
            None => Ok(None),
        }
    }

    fn update(&self, table: &str, id: &Value, row: &Record) -> Result<(), StoreError> {
        check_columns(self, table, row)?;
        if row.is_empty() {
            return Ok(());
        }

        let assignments: Vec<_> = row
            .keys()
            .enumerate()
            .map(|(i, k)| format!("{} = ?{}", quote(k), i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            quote(table),
            assignments.join(", "),
            row.len() + 1
        );
        let params = row.values().map(to_sql).chain(std::iter::once(to_sql(id)));
        let changed = self.execute(&sql, params_from_iter(params))?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
