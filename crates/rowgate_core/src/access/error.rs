//! Typed failures of row access operations.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AccessResult<T> = Result<T, AccessError>;

/// Error returned by every `RowStore` operation.
///
/// Validation variants are produced before any storage effect, so receiving
/// one guarantees the store is unchanged.
#[derive(Debug)]
pub enum AccessError {
    /// The row names columns the table does not declare.
    InvalidColumn { table: String, columns: Vec<String> },
    /// The row lacks key columns required to address a record.
    MissingKeyColumns { table: String, columns: Vec<String> },
    /// The row lacks columns that every stored record must carry.
    MissingMandatoryColumns { table: String, columns: Vec<String> },
    /// A key-only request (delete) carried non-key columns.
    ExtraColumnsInKeyOnlyRequest { table: String, columns: Vec<String> },
    /// No record exists at the addressed key.
    RecordNotFound { table: String, key: String },
    /// The store does not serve a table with this name.
    UnknownTable(String),
    /// A key column holds a value with no canonical encoding (NaN or an
    /// infinity). Raised before any storage effect.
    KeyEncoding(serde_json::Error),
    /// A live backend call failed. Never retried.
    BackendUnavailable(DbError),
}

impl AccessError {
    /// Whether this failure was raised by precondition checks rather than by
    /// storage.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidColumn { .. }
                | Self::MissingKeyColumns { .. }
                | Self::MissingMandatoryColumns { .. }
                | Self::ExtraColumnsInKeyOnlyRequest { .. }
                | Self::KeyEncoding(_)
        )
    }
}

impl Display for AccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidColumn { table, columns } => write!(
                f,
                "request contains columns unknown to table `{table}`: {}",
                columns.join(", ")
            ),
            Self::MissingKeyColumns { table, columns } => write!(
                f,
                "request is missing key columns of table `{table}`: {}",
                columns.join(", ")
            ),
            Self::MissingMandatoryColumns { table, columns } => write!(
                f,
                "request is missing mandatory columns of table `{table}`: {}",
                columns.join(", ")
            ),
            Self::ExtraColumnsInKeyOnlyRequest { table, columns } => write!(
                f,
                "key-only request for table `{table}` contains non-key columns: {}",
                columns.join(", ")
            ),
            Self::RecordNotFound { table, key } => {
                write!(f, "no record in table `{table}` with key {key}")
            }
            Self::UnknownTable(table) => write!(f, "table `{table}` is not served by this store"),
            Self::KeyEncoding(err) => write!(f, "failed to encode record key: {err}"),
            Self::BackendUnavailable(err) => write!(f, "backend call failed: {err}"),
        }
    }
}

impl Error for AccessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::KeyEncoding(err) => Some(err),
            Self::BackendUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for AccessError {
    fn from(value: DbError) -> Self {
        Self::BackendUnavailable(value)
    }
}

impl From<rusqlite::Error> for AccessError {
    fn from(value: rusqlite::Error) -> Self {
        Self::BackendUnavailable(DbError::Sqlite(value))
    }
}
