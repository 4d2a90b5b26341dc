//! Row representation shared by every store.
//!
//! # Responsibility
//! - Map column names to scalar values for full or partial records.
//! - Preserve insertion order, which drives relational parameter ordinals.
//!
//! # Invariants
//! - Setting an existing column keeps its original position.
//! - Equality ignores column order.

use crate::model::value::ScalarValue;
use indexmap::map::Iter;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered column → value mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    values: IndexMap<String, ScalarValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one column, returning the previous value when it existed.
    pub fn set(
        &mut self,
        column: impl Into<String>,
        value: impl Into<ScalarValue>,
    ) -> Option<ScalarValue> {
        self.values.insert(column.into(), value.into())
    }

    pub fn get(&self, column: &str) -> Option<&ScalarValue> {
        self.values.get(column)
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &ScalarValue> + '_ {
        self.values.values()
    }

    pub fn iter(&self) -> Iter<'_, String, ScalarValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Shallow merge: every column of `source` overwrites the same column
    /// here; columns absent from `source` are kept.
    pub fn merge_from(&mut self, source: &Row) {
        for (column, value) in source {
            self.values.insert(column.clone(), value.clone());
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = (&'a String, &'a ScalarValue);
    type IntoIter = Iter<'a, String, ScalarValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<ScalarValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

/// Builds a [`Row`] from `column => value` pairs, keeping their order.
#[macro_export]
macro_rules! row {
    () => {
        $crate::model::row::Row::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut row = $crate::model::row::Row::new();
        $(
            row.set($column, $value);
        )+
        row
    }};
}

#[cfg(test)]
mod tests {
    use super::Row;
    use crate::model::value::ScalarValue;

    #[test]
    fn set_existing_column_keeps_position() {
        let mut row = row! { "a" => 1, "b" => 2 };
        let previous = row.set("a", 3);

        assert_eq!(previous, Some(ScalarValue::Integer(1)));
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(&ScalarValue::Integer(3)));
    }

    #[test]
    fn merge_overwrites_and_keeps_absent_columns() {
        let mut stored = row! { "k" => "1", "x" => "old", "y" => "kept" };
        stored.merge_from(&row! { "k" => "1", "x" => "new", "z" => true });

        assert_eq!(
            stored,
            row! { "k" => "1", "x" => "new", "y" => "kept", "z" => true }
        );
        assert_eq!(stored.columns().collect::<Vec<_>>(), vec!["k", "x", "y", "z"]);
    }

    #[test]
    fn equality_ignores_column_order() {
        let left = row! { "a" => 1, "b" => "two" };
        let right: Row = vec![("b", ScalarValue::from("two")), ("a", ScalarValue::from(1))]
            .into_iter()
            .collect();
        assert_eq!(left, right);
    }

    #[test]
    fn json_object_order_is_preserved() {
        let row: Row =
            serde_json::from_str(r#"{"z": 1, "a": null, "m": "x"}"#).expect("valid row json");
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(
            serde_json::to_string(&row).expect("row serializes"),
            r#"{"z":1,"a":null,"m":"x"}"#
        );
    }
}
