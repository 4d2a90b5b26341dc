//! In-process row store.
//!
//! # Responsibility
//! - Keep one table per schema, mapping canonical record keys to rows.
//! - Apply the shared validation pipeline before each mutation.
//!
//! # Invariants
//! - Tables exist only for schemas given at construction.
//! - Scan order is insertion order of still-present keys.
//! - No locking: exclusive access comes from `&mut self`.

use crate::access::contract::{RowStore, UpsertStore};
use crate::access::error::{AccessError, AccessResult};
use crate::access::key::RecordKey;
use crate::access::rules::{validate_delete, validate_insert, validate_search, validate_update};
use crate::model::registry::SchemaRegistry;
use crate::model::row::Row;
use crate::model::schema::TableSchema;
use indexmap::IndexMap;
use log::debug;
use std::collections::HashMap;

type StoredTable = IndexMap<RecordKey, Row>;

/// Map-backed store with immediate consistency.
#[derive(Debug, Default)]
pub struct VolatileStore {
    tables: HashMap<String, StoredTable>,
}

impl VolatileStore {
    /// Allocates one empty table per schema.
    pub fn new<'a>(schemas: impl IntoIterator<Item = &'a TableSchema>) -> Self {
        let tables = schemas
            .into_iter()
            .map(|schema| (schema.name().to_string(), StoredTable::new()))
            .collect();
        Self { tables }
    }

    pub fn from_registry(registry: &SchemaRegistry) -> Self {
        Self::new(registry.iter())
    }

    /// Number of records currently stored for `schema`.
    pub fn record_count(&self, schema: &TableSchema) -> AccessResult<usize> {
        self.table(schema).map(StoredTable::len)
    }

    fn table(&self, schema: &TableSchema) -> AccessResult<&StoredTable> {
        self.tables
            .get(schema.name())
            .ok_or_else(|| AccessError::UnknownTable(schema.name().to_string()))
    }

    fn table_mut(&mut self, schema: &TableSchema) -> AccessResult<&mut StoredTable> {
        self.tables
            .get_mut(schema.name())
            .ok_or_else(|| AccessError::UnknownTable(schema.name().to_string()))
    }
}

impl RowStore for VolatileStore {
    /// Overwrites any record already stored at the same key.
    fn insert(&mut self, schema: &TableSchema, row: &Row) -> AccessResult<()> {
        validate_insert(schema, row)?;
        let key = RecordKey::from_row(schema, row)?;
        let replaced = self.table_mut(schema)?.insert(key, row.clone()).is_some();
        debug!(
            "event=row_insert module=volatile status=ok table={} replaced={}",
            schema.name(),
            replaced
        );
        Ok(())
    }

    fn update(&mut self, schema: &TableSchema, row: &Row) -> AccessResult<()> {
        validate_update(schema, row)?;
        let key = RecordKey::from_row(schema, row)?;
        let table = self.table_mut(schema)?;
        let Some(stored) = table.get_mut(&key) else {
            return Err(AccessError::RecordNotFound {
                table: schema.name().to_string(),
                key: key.to_string(),
            });
        };
        stored.merge_from(row);
        debug!(
            "event=row_update module=volatile status=ok table={} columns={}",
            schema.name(),
            row.len()
        );
        Ok(())
    }

    fn delete(&mut self, schema: &TableSchema, key: &Row) -> AccessResult<()> {
        validate_delete(schema, key)?;
        let record_key = RecordKey::from_row(schema, key)?;
        if self
            .table_mut(schema)?
            .shift_remove(&record_key)
            .is_none()
        {
            return Err(AccessError::RecordNotFound {
                table: schema.name().to_string(),
                key: record_key.to_string(),
            });
        }
        debug!(
            "event=row_delete module=volatile status=ok table={}",
            schema.name()
        );
        Ok(())
    }

    fn scan(&mut self, schema: &TableSchema) -> AccessResult<Vec<Row>> {
        Ok(self.table(schema)?.values().cloned().collect())
    }

    fn search(&mut self, schema: &TableSchema, subset: &Row) -> AccessResult<Vec<Row>> {
        validate_search(schema, subset)?;
        Ok(self
            .table(schema)?
            .values()
            .filter(|row| matches_subset(row, subset))
            .cloned()
            .collect())
    }
}

impl UpsertStore for VolatileStore {
    /// Missing records start empty, so the result holds exactly the columns
    /// of `row`; mandatory completeness is not re-checked after the merge.
    fn insert_or_update(&mut self, schema: &TableSchema, row: &Row) -> AccessResult<()> {
        validate_insert(schema, row)?;
        let key = RecordKey::from_row(schema, row)?;
        self.table_mut(schema)?
            .entry(key)
            .or_default()
            .merge_from(row);
        debug!(
            "event=row_upsert module=volatile status=ok table={}",
            schema.name()
        );
        Ok(())
    }
}

/// Conjunctive loose-equality filter; a record lacking a filter column never
/// matches.
fn matches_subset(row: &Row, subset: &Row) -> bool {
    subset.iter().all(|(column, expected)| {
        row.get(column)
            .is_some_and(|stored| stored.loosely_equals(expected))
    })
}
