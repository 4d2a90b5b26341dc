//! Table schema descriptors.
//!
//! # Responsibility
//! - Describe one table: name, full column set, composite key and mandatory
//!   columns.
//! - Reject malformed definitions at construction time.
//!
//! # Invariants
//! - `key_columns` is non-empty and a subset of `columns`.
//! - `mandatory_columns` is a subset of `columns`.
//! - Table and column names are plain SQL identifiers, so they are safe to
//!   interpolate into statement text.
//! - A schema never changes after construction.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static IDENTIFIER_RE: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex")
});

/// Immutable descriptor of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    columns: Vec<String>,
    key_columns: Vec<String>,
    mandatory_columns: Vec<String>,
}

impl TableSchema {
    /// Builds a validated schema.
    ///
    /// `key_columns` order is kept; it fixes the canonical key encoding.
    ///
    /// # Errors
    /// - Returns `SchemaError` when any invariant listed on this module fails.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
        key_columns: impl IntoIterator<Item = S>,
        mandatory_columns: impl IntoIterator<Item = S>,
    ) -> Result<Self, SchemaError> {
        let schema = Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            key_columns: key_columns.into_iter().map(Into::into).collect(),
            mandatory_columns: mandatory_columns.into_iter().map(Into::into).collect(),
        };
        schema.validate()?;
        Ok(schema)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    pub fn mandatory_columns(&self) -> &[String] {
        &self.mandatory_columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|known| known == column)
    }

    pub fn is_key_column(&self, column: &str) -> bool {
        self.key_columns.iter().any(|key| key == column)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if !is_identifier(&self.name) {
            return Err(SchemaError::InvalidIdentifier(self.name.clone()));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !is_identifier(column) {
                return Err(SchemaError::InvalidIdentifier(column.clone()));
            }
            if !seen.insert(column.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.clone(),
                });
            }
        }

        if self.key_columns.is_empty() {
            return Err(SchemaError::EmptyKey(self.name.clone()));
        }

        let mut seen_keys = HashSet::new();
        for key in &self.key_columns {
            if !seen_keys.insert(key.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name.clone(),
                    column: key.clone(),
                });
            }
        }

        for column in self.key_columns.iter().chain(&self.mandatory_columns) {
            if !seen.contains(column.as_str()) {
                return Err(SchemaError::UndeclaredColumn {
                    table: self.name.clone(),
                    column: column.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Serializable schema definition, as read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchemaDef {
    pub name: String,
    pub columns: Vec<String>,
    pub key_columns: Vec<String>,
    /// Defaults to the key columns when omitted.
    #[serde(default)]
    pub mandatory_columns: Option<Vec<String>>,
}

impl TryFrom<TableSchemaDef> for TableSchema {
    type Error = SchemaError;

    fn try_from(value: TableSchemaDef) -> Result<Self, Self::Error> {
        let mandatory = value
            .mandatory_columns
            .unwrap_or_else(|| value.key_columns.clone());
        TableSchema::new(value.name, value.columns, value.key_columns, mandatory)
    }
}

/// Schema definition errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    InvalidIdentifier(String),
    EmptyKey(String),
    DuplicateColumn { table: String, column: String },
    UndeclaredColumn { table: String, column: String },
    DuplicateTable(String),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier(value) => {
                write!(f, "`{value}` is not a valid table or column identifier")
            }
            Self::EmptyKey(table) => write!(f, "table `{table}` declares no key columns"),
            Self::DuplicateColumn { table, column } => {
                write!(f, "table `{table}` lists column `{column}` more than once")
            }
            Self::UndeclaredColumn { table, column } => write!(
                f,
                "table `{table}` references column `{column}` missing from its column list"
            ),
            Self::DuplicateTable(table) => write!(f, "table `{table}` is registered twice"),
        }
    }
}

impl Error for SchemaError {}

fn is_identifier(value: &str) -> bool {
    IDENTIFIER_RE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::{SchemaError, TableSchema, TableSchemaDef};

    #[test]
    fn accepts_well_formed_schema() {
        let schema = TableSchema::new(
            "EXAMPLE",
            ["k1", "k2", "k3", "k4"],
            ["k1", "k2"],
            ["k1", "k2", "k3"],
        )
        .expect("valid schema");

        assert_eq!(schema.name(), "EXAMPLE");
        assert_eq!(schema.key_columns(), ["k1", "k2"]);
        assert!(schema.has_column("k4"));
        assert!(!schema.is_key_column("k3"));
    }

    #[test]
    fn rejects_empty_key() {
        let err = TableSchema::new("T", ["a"], [], ["a"]).expect_err("empty key must fail");
        assert_eq!(err, SchemaError::EmptyKey("T".to_string()));
    }

    #[test]
    fn rejects_key_outside_columns() {
        let err = TableSchema::new("T", ["a"], ["b"], []).expect_err("undeclared key must fail");
        assert_eq!(
            err,
            SchemaError::UndeclaredColumn {
                table: "T".to_string(),
                column: "b".to_string()
            }
        );
    }

    #[test]
    fn rejects_identifiers_that_need_quoting() {
        let err = TableSchema::new("T; DROP TABLE T", ["a"], ["a"], [])
            .expect_err("injected name must fail");
        assert!(matches!(err, SchemaError::InvalidIdentifier(_)));

        let err = TableSchema::new("T", ["a", "b c"], ["a"], [])
            .expect_err("column with space must fail");
        assert_eq!(err, SchemaError::InvalidIdentifier("b c".to_string()));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = TableSchema::new("T", ["a", "a"], ["a"], []).expect_err("duplicate must fail");
        assert!(matches!(err, SchemaError::DuplicateColumn { .. }));
    }

    #[test]
    fn definition_defaults_mandatory_to_key() {
        let def: TableSchemaDef = serde_json::from_str(
            r#"{"name": "Cases", "columns": ["CaseID", "Owner"], "key_columns": ["CaseID"]}"#,
        )
        .expect("valid definition json");
        let schema = TableSchema::try_from(def).expect("valid schema");
        assert_eq!(schema.mandatory_columns(), ["CaseID"]);
    }
}
