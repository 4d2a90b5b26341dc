//! Name-addressed table access.
//!
//! # Responsibility
//! - Resolve table names case-insensitively against a `SchemaRegistry`.
//! - Delegate every operation to the wrapped `RowStore` unchanged.
//!
//! # Invariants
//! - The service never bypasses store validation.
//! - Unknown table names fail with `AccessError::UnknownTable` before the
//!   store is touched.

use crate::access::contract::{RowStore, UpsertStore};
use crate::access::error::{AccessError, AccessResult};
use crate::model::registry::SchemaRegistry;
use crate::model::row::Row;
use crate::model::schema::TableSchema;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Operation names accepted from external callers.
///
/// Mirrors the HTTP verb mapping of a request router: `GET` scans, `POST`
/// searches, `PUT` inserts, `PATCH` updates and `DELETE` deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Scan,
    Search,
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Search => "search",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Whether the operation reads its row from the request body.
    pub fn takes_row(self) -> bool {
        !matches!(self, Self::Scan)
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scan" | "get" => Ok(Self::Scan),
            "search" | "post" => Ok(Self::Search),
            "insert" | "put" => Ok(Self::Insert),
            "update" | "patch" => Ok(Self::Update),
            "delete" | "del" => Ok(Self::Delete),
            other => Err(UnknownOperation(other.to_string())),
        }
    }
}

/// Returned when an operation name matches no [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl Display for UnknownOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown operation `{}`; expected scan|search|insert|update|delete",
            self.0
        )
    }
}

impl std::error::Error for UnknownOperation {}

/// Result of [`TableService::execute`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableResponse {
    Rows(Vec<Row>),
    /// Serialized as the literal string `"success"`.
    Success(&'static str),
}

impl TableResponse {
    fn success() -> Self {
        Self::Success("success")
    }
}

/// Table-name based facade over one store.
pub struct TableService<S: RowStore> {
    registry: SchemaRegistry,
    store: S,
}

impl<S: RowStore> TableService<S> {
    pub fn new(registry: SchemaRegistry, store: S) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Looks up a schema by name, ignoring ASCII case.
    pub fn resolve(&self, table: &str) -> AccessResult<&TableSchema> {
        resolve(&self.registry, table)
    }

    pub fn insert(&mut self, table: &str, row: &Row) -> AccessResult<()> {
        let schema = resolve(&self.registry, table)?;
        self.store.insert(schema, row)
    }

    pub fn update(&mut self, table: &str, row: &Row) -> AccessResult<()> {
        let schema = resolve(&self.registry, table)?;
        self.store.update(schema, row)
    }

    pub fn delete(&mut self, table: &str, key: &Row) -> AccessResult<()> {
        let schema = resolve(&self.registry, table)?;
        self.store.delete(schema, key)
    }

    pub fn scan(&mut self, table: &str) -> AccessResult<Vec<Row>> {
        let schema = resolve(&self.registry, table)?;
        self.store.scan(schema)
    }

    pub fn search(&mut self, table: &str, subset: &Row) -> AccessResult<Vec<Row>> {
        let schema = resolve(&self.registry, table)?;
        self.store.search(schema, subset)
    }

    /// Runs one operation; `row` is ignored by `Scan` and treated as empty
    /// when absent for the others.
    pub fn execute(
        &mut self,
        operation: Operation,
        table: &str,
        row: Option<&Row>,
    ) -> AccessResult<TableResponse> {
        let empty = Row::new();
        let row = row.unwrap_or(&empty);
        match operation {
            Operation::Scan => self.scan(table).map(TableResponse::Rows),
            Operation::Search => self.search(table, row).map(TableResponse::Rows),
            Operation::Insert => self.insert(table, row).map(|()| TableResponse::success()),
            Operation::Update => self.update(table, row).map(|()| TableResponse::success()),
            Operation::Delete => self.delete(table, row).map(|()| TableResponse::success()),
        }
    }
}

impl<S: UpsertStore> TableService<S> {
    pub fn insert_or_update(&mut self, table: &str, row: &Row) -> AccessResult<()> {
        let schema = resolve(&self.registry, table)?;
        self.store.insert_or_update(schema, row)
    }
}

fn resolve<'a>(registry: &'a SchemaRegistry, table: &str) -> AccessResult<&'a TableSchema> {
    registry
        .find(table)
        .ok_or_else(|| AccessError::UnknownTable(table.to_string()))
}
