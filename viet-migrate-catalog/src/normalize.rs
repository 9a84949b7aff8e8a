//! Field-name normalization from the site's camelCase JSON to snake_case columns.

use serde_json::{Map, Value};

/// A flat source or destination record.
pub type Record = Map<String, Value>;

/// camelCase source names that have a different column name in the database.
///
/// Any field not listed here is written under its own name.
pub const FIELD_NAME_MAP: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("busNo", "bus_no"),
    ("driverContactNo", "driver_contact_no"),
    ("seatingCapacity", "seating_capacity"),
    ("buttonText", "button_text"),
    ("buttonLink", "button_link"),
    ("highestPackageLPA", "highest_package_lpa"),
    ("averagePackageLPA", "average_package_lpa"),
    ("totalOffers", "total_offers"),
    ("companiesVisited", "companies_visited"),
    ("isExternal", "is_external"),
    ("driverName", "driver_name"),
];

/// Column name for a source field.
pub fn destination_name(field: &str) -> &str {
    FIELD_NAME_MAP
        .iter()
        .find(|(from, _)| *from == field)
        .map(|(_, to)| *to)
        .unwrap_or(field)
}

/// Whether a field is absent or `null`.
///
/// Used by the per-collection defaults; [`normalize`] itself keeps `null`.
pub fn is_unset(value: Option<&Value>) -> bool {
    value.is_none_or(Value::is_null)
}

/// Rename every field through [`FIELD_NAME_MAP`].
///
/// An undefined field is one the document does not contain, so it never
/// reaches the output. Explicit `null` values are written as `null`.
///
/// Returns a new record; the input is left untouched because some collections
/// consult the original camelCase fields after normalizing.
pub fn normalize(record: &Record) -> Record {
    record
        .iter()
        .map(|(key, value)| (destination_name(key).to_string(), value.clone()))
        .collect()
}
