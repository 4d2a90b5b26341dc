//! Operation contract shared by every row store.

use crate::access::error::AccessResult;
use crate::model::row::Row;
use crate::model::schema::TableSchema;

/// CRUD surface implemented by both the volatile and the relational store.
///
/// Every mutation validates its request against `schema` before touching
/// storage; see `access::rules` for the exact pipelines.
pub trait RowStore {
    /// Stores a complete record. Requires valid, key and mandatory columns.
    fn insert(&mut self, schema: &TableSchema, row: &Row) -> AccessResult<()>;

    /// Merges `row` into the record addressed by its key.
    fn update(&mut self, schema: &TableSchema, row: &Row) -> AccessResult<()>;

    /// Removes the record addressed by `key`, which must hold exactly the key
    /// columns.
    fn delete(&mut self, schema: &TableSchema, key: &Row) -> AccessResult<()>;

    /// Returns every record of the table. Order is unspecified.
    fn scan(&mut self, schema: &TableSchema) -> AccessResult<Vec<Row>>;

    /// Returns records matching every column/value pair of `subset`.
    /// An empty subset behaves like [`RowStore::scan`].
    fn search(&mut self, schema: &TableSchema, subset: &Row) -> AccessResult<Vec<Row>>;
}

/// Stores that can merge into a record whether or not it already exists.
pub trait UpsertStore: RowStore {
    /// Same preconditions as `insert`; merges over the existing record when
    /// present, otherwise stores `row` as a new record.
    fn insert_or_update(&mut self, schema: &TableSchema, row: &Row) -> AccessResult<()>;
}
