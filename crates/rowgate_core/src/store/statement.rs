//! Parameterized statement text for the relational store.
//!
//! # Responsibility
//! - Render insert/update/delete/select statements for one table.
//! - Keep every value out of statement text as a positional `$N` parameter.
//!
//! # Invariants
//! - Only the table name and row column names are interpolated. Callers must
//!   have validated row columns against the schema first.
//! - Ordinals are 1-indexed and follow row iteration order.

use crate::model::row::Row;
use crate::model::schema::TableSchema;
use crate::model::value::ScalarValue;

/// Statement text plus its bound parameters, in ordinal order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<ScalarValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<ScalarValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// `INSERT INTO <table>(<c1>, <c2>) VALUES ($1, $2);`
pub fn insert(schema: &TableSchema, row: &Row) -> Statement {
    let columns = row.columns().collect::<Vec<_>>().join(", ");
    let placeholders = (1..=row.len())
        .map(|ordinal| format!("${ordinal}"))
        .collect::<Vec<_>>()
        .join(", ");
    Statement::new(
        format!(
            "INSERT INTO {}({columns}) VALUES ({placeholders});",
            schema.name()
        ),
        bind_values(row),
    )
}

/// `UPDATE <table> SET <c1> = $1, <c2> = $2;`
///
/// Not scoped to a key: on a live backend this touches every row.
pub fn update(schema: &TableSchema, row: &Row) -> Statement {
    Statement::new(
        format!("UPDATE {} SET {};", schema.name(), assignments(row)),
        bind_values(row),
    )
}

/// `UPDATE <table> SET <c1> = $1, ... WHERE <k1> = $n+1 AND ...;`
pub fn update_by_key(schema: &TableSchema, row: &Row, key: &Row) -> Statement {
    let mut params = bind_values(row);
    params.extend(key.values().cloned());
    Statement::new(
        format!(
            "UPDATE {} SET {} WHERE {};",
            schema.name(),
            assignments(row),
            conditions(key, row.len() + 1)
        ),
        params,
    )
}

/// `DELETE FROM <table> WHERE <k1> = $1 AND <k2> = $2;`
pub fn delete(schema: &TableSchema, key: &Row) -> Statement {
    Statement::new(
        format!("DELETE FROM {} WHERE {};", schema.name(), conditions(key, 1)),
        bind_values(key),
    )
}

/// `SELECT * FROM <table>;`
pub fn select_all(schema: &TableSchema) -> Statement {
    Statement::new(format!("SELECT * FROM {};", schema.name()), Vec::new())
}

/// `SELECT * FROM <table> WHERE <c1> = $1 AND ...;`
pub fn select_where(schema: &TableSchema, subset: &Row) -> Statement {
    Statement::new(
        format!(
            "SELECT * FROM {} WHERE {};",
            schema.name(),
            conditions(subset, 1)
        ),
        bind_values(subset),
    )
}

fn assignments(row: &Row) -> String {
    row.columns()
        .enumerate()
        .map(|(index, column)| format!("{column} = ${}", index + 1))
        .collect::<Vec<_>>()
        .join(", ")
}

fn conditions(row: &Row, first_ordinal: usize) -> String {
    row.columns()
        .enumerate()
        .map(|(index, column)| format!("{column} = ${}", first_ordinal + index))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn bind_values(row: &Row) -> Vec<ScalarValue> {
    row.values().cloned().collect()
}
