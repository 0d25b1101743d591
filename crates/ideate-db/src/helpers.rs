//! Row-to-entity parsing helpers.
//!
//! Converts `libsql::Row` (column-indexed) into `Entity` values. Timestamps
//! are written as RFC 3339 but `SQLite`'s own `strftime`/`datetime` output is
//! accepted too.

use chrono::{DateTime, Utc};
use ideate_core::{Entity, FieldMap};

use crate::error::StoreError;

/// Columns read by every entity query, in `row_to_entity` order.
pub(crate) const SELECT_COLS: &str =
    "id, data, archived, created_at, updated_at, schema_version";

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00.000001Z"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `StoreError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Decode the JSON document column into a `FieldMap`.
///
/// Decoding needs no schema, so records written under an older descriptor
/// still read back unchanged.
///
/// # Errors
///
/// Returns `StoreError::Query` if the column does not hold a field map.
pub fn parse_field_map(s: &str) -> Result<FieldMap, StoreError> {
    serde_json::from_str(s)
        .map_err(|e| StoreError::Query(format!("Invalid document in data column: {e}")))
}

/// Convert a stored INTEGER version into `u64`.
///
/// # Errors
///
/// Returns `StoreError::InvalidState` for negative values.
pub fn parse_version(raw: i64) -> Result<u64, StoreError> {
    u64::try_from(raw)
        .map_err(|_| StoreError::InvalidState(format!("negative schema version {raw}")))
}

/// Build an `Entity` from a row selected with [`SELECT_COLS`].
pub(crate) fn row_to_entity(row: &libsql::Row) -> Result<Entity, StoreError> {
    Ok(Entity {
        id: row.get::<String>(0)?,
        fields: parse_field_map(&row.get::<String>(1)?)?,
        archived: row.get::<i64>(2)? != 0,
        created_date: parse_datetime(&row.get::<String>(3)?)?,
        updated_date: parse_datetime(&row.get::<String>(4)?)?,
        schema_version: parse_version(row.get::<i64>(5)?)?,
    })
}
