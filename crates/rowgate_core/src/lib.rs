//! Schema-described row access for rowgate.
//!
//! Every table is described by a [`TableSchema`]; rows are validated against
//! it before any store mutates, whether the store is the in-process
//! [`VolatileStore`] or the SQL-backed [`RelationalStore`].

pub mod access;
pub mod catalog;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use access::contract::{RowStore, UpsertStore};
pub use access::error::{AccessError, AccessResult};
pub use access::key::{extract_key, RecordKey};
pub use catalog::builtin_registry;
pub use config::{AccessConfig, ConfigError, RelationalConfig};
pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::registry::SchemaRegistry;
pub use model::row::Row;
pub use model::schema::{SchemaError, TableSchema, TableSchemaDef};
pub use model::value::ScalarValue;
pub use service::table_service::{Operation, TableResponse, TableService, UnknownOperation};
pub use store::relational::{ExecutionMode, RelationalStore, UpdateScope};
pub use store::statement::Statement;
pub use store::volatile::VolatileStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
