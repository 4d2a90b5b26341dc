//! Scalar column values.
//!
//! # Responsibility
//! - Represent one column value of a row (text, number, boolean or null).
//! - Bridge values to SQLite bind parameters and result columns.
//!
//! # Invariants
//! - `loosely_equals` is symmetric.
//! - `Null` is only loosely equal to `Null`.

use crate::db::{DbError, DbResult};
use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use serde::{Deserialize, Serialize};

/// Tagged scalar stored in a row column.
///
/// Serialized untagged, so JSON `null`, `true`, `2`, `2.5` and `"x"` map
/// directly onto the variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Coercive equality used by conjunctive search filters.
    ///
    /// Text compares to text as strings; any other non-null pair is compared
    /// numerically after coercion (`true` is 1, blank text is 0, text that
    /// does not parse as a number matches nothing).
    pub fn loosely_equals(&self, other: &ScalarValue) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Null, _) | (_, Self::Null) => false,
            (Self::Text(left), Self::Text(right)) => left == right,
            (Self::Integer(left), Self::Integer(right)) => left == right,
            (left, right) => left.coerce_number() == right.coerce_number(),
        }
    }

    fn coerce_number(&self) -> f64 {
        match self {
            Self::Null => f64::NAN,
            Self::Bool(value) => f64::from(u8::from(*value)),
            Self::Integer(value) => *value as f64,
            Self::Real(value) => *value,
            Self::Text(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
        }
    }

    /// Decodes one SQLite result column.
    ///
    /// # Errors
    /// - Returns `DbError::InvalidData` for blobs and non UTF-8 text.
    pub fn from_sql_ref(value: ValueRef<'_>) -> DbResult<Self> {
        match value {
            ValueRef::Null => Ok(Self::Null),
            ValueRef::Integer(value) => Ok(Self::Integer(value)),
            ValueRef::Real(value) => Ok(Self::Real(value)),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(|text| Self::Text(text.to_string()))
                .map_err(|err| DbError::InvalidData(format!("non UTF-8 text column: {err}"))),
            ValueRef::Blob(_) => Err(DbError::InvalidData(
                "blob columns are not supported as row values".to_string(),
            )),
        }
    }
}

impl ToSql for ScalarValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Self::Bool(value) => ToSqlOutput::Owned(Value::Integer(i64::from(*value))),
            Self::Integer(value) => ToSqlOutput::Owned(Value::Integer(*value)),
            Self::Real(value) => ToSqlOutput::Owned(Value::Real(*value)),
            Self::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
        })
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::ScalarValue;

    #[test]
    fn loose_equality_coerces_numbers_and_booleans() {
        assert!(ScalarValue::from("2").loosely_equals(&ScalarValue::from(2)));
        assert!(ScalarValue::from(2).loosely_equals(&ScalarValue::from(2.0)));
        assert!(ScalarValue::from(true).loosely_equals(&ScalarValue::from(1)));
        assert!(ScalarValue::from(" 1 ").loosely_equals(&ScalarValue::from(true)));
        assert!(ScalarValue::from("").loosely_equals(&ScalarValue::from(0)));
    }

    #[test]
    fn loose_equality_keeps_text_and_null_strict() {
        assert!(!ScalarValue::from("1.0").loosely_equals(&ScalarValue::from("1")));
        assert!(!ScalarValue::from("abc").loosely_equals(&ScalarValue::from(0)));
        assert!(!ScalarValue::Null.loosely_equals(&ScalarValue::from(0)));
        assert!(!ScalarValue::from("").loosely_equals(&ScalarValue::Null));
        assert!(ScalarValue::Null.loosely_equals(&ScalarValue::Null));
    }

    #[test]
    fn json_maps_onto_untagged_variants() {
        let values: Vec<ScalarValue> =
            serde_json::from_str(r#"[null, true, 2, 2.5, "x"]"#).expect("valid scalar json");
        assert_eq!(
            values,
            vec![
                ScalarValue::Null,
                ScalarValue::Bool(true),
                ScalarValue::Integer(2),
                ScalarValue::Real(2.5),
                ScalarValue::Text("x".to_string()),
            ]
        );
    }
}
