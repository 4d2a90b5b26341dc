//! SQL-backed row store.
//!
//! # Responsibility
//! - Translate the row access contract into parameterized statements.
//! - Execute them on a borrowed SQLite connection, or only record them when
//!   rehearsing.
//!
//! # Invariants
//! - Validation runs before a statement is built; rejected requests leave
//!   both the backend and the request history untouched.
//! - Every executed or rehearsed statement is appended to the request
//!   history, which is never pruned.
//! - Values are always bound parameters, never statement text.
//! - Backend failures are surfaced once; nothing is retried.

use crate::access::contract::RowStore;
use crate::access::error::{AccessError, AccessResult};
use crate::access::key::{extract_key, RecordKey};
use crate::access::rules::{validate_delete, validate_insert, validate_search, validate_update};
use crate::model::row::Row;
use crate::model::schema::TableSchema;
use crate::model::value::ScalarValue;
use crate::store::statement::{self, Statement};
use log::debug;
use rusqlite::{params_from_iter, Connection};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// How statements are handled, fixed at construction.
#[derive(Debug, Clone, Copy)]
pub enum ExecutionMode<'conn> {
    /// Execute against the connection and return live results.
    Live(&'conn Connection),
    /// Record statements only; reads return no rows.
    Rehearsal,
}

/// Shape of the statement issued by `update`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateScope {
    /// `UPDATE <table> SET ...;` with no WHERE clause.
    #[default]
    Unscoped,
    /// Adds a WHERE clause over the key columns of the supplied row.
    ByKey,
}

/// Row store issuing SQL statements.
#[derive(Debug)]
pub struct RelationalStore<'conn> {
    mode: ExecutionMode<'conn>,
    update_scope: UpdateScope,
    history: Vec<Statement>,
}

impl<'conn> RelationalStore<'conn> {
    pub fn new(mode: ExecutionMode<'conn>) -> Self {
        Self {
            mode,
            update_scope: UpdateScope::default(),
            history: Vec::new(),
        }
    }

    pub fn live(conn: &'conn Connection) -> Self {
        Self::new(ExecutionMode::Live(conn))
    }

    pub fn rehearsal() -> Self {
        Self::new(ExecutionMode::Rehearsal)
    }

    pub fn with_update_scope(mut self, update_scope: UpdateScope) -> Self {
        self.update_scope = update_scope;
        self
    }

    pub fn is_rehearsal(&self) -> bool {
        matches!(self.mode, ExecutionMode::Rehearsal)
    }

    pub fn update_scope(&self) -> UpdateScope {
        self.update_scope
    }

    /// Every statement issued so far, oldest first.
    pub fn history(&self) -> &[Statement] {
        &self.history
    }

    /// Records `statement`, then runs it when live.
    ///
    /// Returns the changed row count, or `None` when rehearsing.
    fn run_mutation(&mut self, statement: Statement) -> AccessResult<Option<usize>> {
        self.history.push(statement.clone());
        let ExecutionMode::Live(conn) = self.mode else {
            debug!("event=statement_run module=relational status=skipped mode=rehearsal");
            return Ok(None);
        };

        let started_at = Instant::now();
        let changed = conn.execute(&statement.sql, params_from_iter(statement.params.iter()))?;
        debug!(
            "event=statement_run module=relational status=ok mode=live params={} changed={} duration_ms={}",
            statement.params.len(),
            changed,
            started_at.elapsed().as_millis()
        );
        Ok(Some(changed))
    }

    /// Records `statement`, then runs it when live and decodes every result
    /// row.
    fn run_query(&mut self, statement: Statement) -> AccessResult<Vec<Row>> {
        self.history.push(statement.clone());
        let ExecutionMode::Live(conn) = self.mode else {
            debug!("event=statement_run module=relational status=skipped mode=rehearsal");
            return Ok(Vec::new());
        };

        let started_at = Instant::now();
        let mut prepared = conn.prepare(&statement.sql)?;
        let column_names: Vec<String> = prepared
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut rows = prepared.query(params_from_iter(statement.params.iter()))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(decode_row(row, &column_names)?);
        }
        debug!(
            "event=statement_run module=relational status=ok mode=live params={} rows={} duration_ms={}",
            statement.params.len(),
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(records)
    }
}

impl RowStore for RelationalStore<'_> {
    fn insert(&mut self, schema: &TableSchema, row: &Row) -> AccessResult<()> {
        validate_insert(schema, row)?;
        self.run_mutation(statement::insert(schema, row))?;
        Ok(())
    }

    /// Live updates that change no row fail with `RecordNotFound`.
    fn update(&mut self, schema: &TableSchema, row: &Row) -> AccessResult<()> {
        validate_update(schema, row)?;
        let update = match self.update_scope {
            UpdateScope::Unscoped => statement::update(schema, row),
            UpdateScope::ByKey => statement::update_by_key(schema, row, &extract_key(schema, row)),
        };
        if self.run_mutation(update)? == Some(0) {
            return Err(not_found(schema, row)?);
        }
        Ok(())
    }

    fn delete(&mut self, schema: &TableSchema, key: &Row) -> AccessResult<()> {
        validate_delete(schema, key)?;
        if self.run_mutation(statement::delete(schema, key))? == Some(0) {
            return Err(not_found(schema, key)?);
        }
        Ok(())
    }

    fn scan(&mut self, schema: &TableSchema) -> AccessResult<Vec<Row>> {
        self.run_query(statement::select_all(schema))
    }

    fn search(&mut self, schema: &TableSchema, subset: &Row) -> AccessResult<Vec<Row>> {
        validate_search(schema, subset)?;
        if subset.is_empty() {
            return self.scan(schema);
        }
        self.run_query(statement::select_where(schema, subset))
    }
}

fn not_found(schema: &TableSchema, row: &Row) -> AccessResult<AccessError> {
    Ok(AccessError::RecordNotFound {
        table: schema.name().to_string(),
        key: RecordKey::from_row(schema, row)?.to_string(),
    })
}

/// SQL NULL reads back as an absent column, matching how the volatile store
/// returns records that never received a value for that column. SQLite has no
/// boolean storage class, so a stored `Bool` reads back as `Integer` 1 or 0.
fn decode_row(row: &rusqlite::Row<'_>, column_names: &[String]) -> AccessResult<Row> {
    let mut record = Row::new();
    for (index, column) in column_names.iter().enumerate() {
        let value = ScalarValue::from_sql_ref(row.get_ref(index)?)?;
        if !value.is_null() {
            record.set(column.as_str(), value);
        }
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::{RelationalStore, UpdateScope};
    use crate::access::contract::RowStore;
    use crate::access::error::AccessError;
    use crate::model::schema::TableSchema;
    use crate::row;

    fn example() -> TableSchema {
        TableSchema::new("T", ["id", "name"], ["id"], ["id"]).expect("valid schema")
    }

    #[test]
    fn rejected_requests_are_not_recorded() {
        let mut store = RelationalStore::rehearsal();

        let err = store
            .insert(&example(), &row! { "id" => 1, "bogus" => 2 })
            .expect_err("invalid column must fail");
        assert!(matches!(err, AccessError::InvalidColumn { .. }));
        assert!(store.history().is_empty());
    }

    #[test]
    fn empty_search_is_recorded_as_scan() {
        let mut store = RelationalStore::rehearsal();

        let rows = store.search(&example(), &row! {}).expect("search");
        assert!(rows.is_empty());
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history()[0].sql, "SELECT * FROM T;");
    }

    #[test]
    fn rehearsal_never_reports_missing_records() {
        let mut store = RelationalStore::rehearsal().with_update_scope(UpdateScope::ByKey);

        store
            .update(&example(), &row! { "id" => 9, "name" => "x" })
            .expect("rehearsed update succeeds");
        store
            .delete(&example(), &row! { "id" => 9 })
            .expect("rehearsed delete succeeds");
        assert_eq!(
            store.history()[0].sql,
            "UPDATE T SET id = $1, name = $2 WHERE id = $3;"
        );
        assert!(store.is_rehearsal());
    }
}
