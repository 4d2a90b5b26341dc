//! Composite record keys.
//!
//! # Invariants
//! - A key is the projection of a row onto `key_columns`, in schema key
//!   order, so structurally equal projections encode to the same text.
//! - Whole-number reals encode as integers: `1` and `1.0` address the same
//!   record, as they already match each other under `search`.
//! - Non-finite reals have no encoding and are rejected.

use crate::access::error::{AccessError, AccessResult};
use crate::model::row::Row;
use crate::model::schema::TableSchema;
use crate::model::value::ScalarValue;
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Projects `row` onto the key columns of `schema`.
///
/// Callers must check `key_columns_contained` first; absent key columns are
/// simply left out of the projection.
pub fn extract_key(schema: &TableSchema, row: &Row) -> Row {
    schema
        .key_columns()
        .iter()
        .filter_map(|key| row.get(key).map(|value| (key.as_str(), value.clone())))
        .collect()
}

/// Canonical text encoding of a key projection, used as a storage address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey(String);

impl RecordKey {
    /// Encodes the key of `row` as compact JSON in key column order.
    pub fn from_row(schema: &TableSchema, row: &Row) -> AccessResult<Self> {
        let projection = extract_key(schema, row);
        serde_json::to_string(&CanonicalKey(&projection))
            .map(Self)
            .map_err(AccessError::KeyEncoding)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

struct CanonicalKey<'a>(&'a Row);

impl Serialize for CanonicalKey<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, value) in self.0.iter() {
            match value {
                ScalarValue::Real(number) if !number.is_finite() => {
                    return Err(S::Error::custom(format!(
                        "key column `{column}` holds a non-finite number"
                    )));
                }
                ScalarValue::Real(number) => match whole_integer(*number) {
                    Some(integer) => map.serialize_entry(column, &integer)?,
                    None => map.serialize_entry(column, number)?,
                },
                other => map.serialize_entry(column, other)?,
            }
        }
        map.end()
    }
}

// i64::MAX as f64 rounds up to 2^63, hence the exclusive upper bound.
fn whole_integer(number: f64) -> Option<i64> {
    let in_range = number >= i64::MIN as f64 && number < i64::MAX as f64;
    (number.fract() == 0.0 && in_range).then_some(number as i64)
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
