//! Validation rules applied before every mutation.
//!
//! # Responsibility
//! - Provide pure predicates checking a row against a schema.
//! - Compose them into the per-operation pipelines both stores run.
//!
//! # Invariants
//! - Predicates never fail; they only answer.
//! - `validate_*` pipelines run before any storage effect, so a rejected
//!   request leaves the store untouched.

use crate::access::error::{AccessError, AccessResult};
use crate::model::row::Row;
use crate::model::schema::TableSchema;

/// True iff every column of `row` is declared by `schema`.
pub fn contains_only_valid_columns(schema: &TableSchema, row: &Row) -> bool {
    row.columns().all(|column| schema.has_column(column))
}

/// True iff every key column is present in `row`; null values count.
pub fn key_columns_contained(schema: &TableSchema, row: &Row) -> bool {
    schema
        .key_columns()
        .iter()
        .all(|key| row.contains_column(key))
}

/// True iff the column set of `row` is exactly the key column set.
pub fn exactly_key_columns_contained(schema: &TableSchema, row: &Row) -> bool {
    row.columns().all(|column| schema.is_key_column(column)) && key_columns_contained(schema, row)
}

/// True iff every mandatory column is present in `row`.
pub fn mandatory_columns_contained(schema: &TableSchema, row: &Row) -> bool {
    schema
        .mandatory_columns()
        .iter()
        .all(|column| row.contains_column(column))
}

pub fn require_valid_columns(schema: &TableSchema, row: &Row) -> AccessResult<()> {
    if contains_only_valid_columns(schema, row) {
        return Ok(());
    }
    Err(AccessError::InvalidColumn {
        table: schema.name().to_string(),
        columns: row
            .columns()
            .filter(|column| !schema.has_column(column))
            .map(str::to_string)
            .collect(),
    })
}

pub fn require_key_columns(schema: &TableSchema, row: &Row) -> AccessResult<()> {
    if key_columns_contained(schema, row) {
        return Ok(());
    }
    Err(AccessError::MissingKeyColumns {
        table: schema.name().to_string(),
        columns: missing_from(schema.key_columns(), row),
    })
}

/// Extra columns are reported before missing keys.
pub fn require_exactly_key_columns(schema: &TableSchema, row: &Row) -> AccessResult<()> {
    let extra: Vec<String> = row
        .columns()
        .filter(|column| !schema.is_key_column(column))
        .map(str::to_string)
        .collect();
    if !extra.is_empty() {
        return Err(AccessError::ExtraColumnsInKeyOnlyRequest {
            table: schema.name().to_string(),
            columns: extra,
        });
    }
    require_key_columns(schema, row)
}

pub fn require_mandatory_columns(schema: &TableSchema, row: &Row) -> AccessResult<()> {
    if mandatory_columns_contained(schema, row) {
        return Ok(());
    }
    Err(AccessError::MissingMandatoryColumns {
        table: schema.name().to_string(),
        columns: missing_from(schema.mandatory_columns(), row),
    })
}

/// Preconditions of `insert` and `insert_or_update`.
pub fn validate_insert(schema: &TableSchema, row: &Row) -> AccessResult<()> {
    require_valid_columns(schema, row)?;
    require_key_columns(schema, row)?;
    require_mandatory_columns(schema, row)
}

/// Preconditions of `update`. Mandatory columns are not re-checked.
pub fn validate_update(schema: &TableSchema, row: &Row) -> AccessResult<()> {
    require_valid_columns(schema, row)?;
    require_key_columns(schema, row)
}

/// Preconditions of `delete`: the request must be a pure key.
pub fn validate_delete(schema: &TableSchema, key: &Row) -> AccessResult<()> {
    require_valid_columns(schema, key)?;
    require_exactly_key_columns(schema, key)
}

/// Preconditions of `search`: filter columns end up in statement text, so
/// they must be declared columns.
pub fn validate_search(schema: &TableSchema, subset: &Row) -> AccessResult<()> {
    require_valid_columns(schema, subset)
}

fn missing_from(required: &[String], row: &Row) -> Vec<String> {
    required
        .iter()
        .filter(|column| !row.contains_column(column))
        .cloned()
        .collect()
}
