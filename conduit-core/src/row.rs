use crate::{AsValue, Error, Result, Value};
use std::sync::Arc;

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values[i])
    }
    /// Convert the cell of column `name`.
    pub fn get<T: AsValue>(&self, name: &str) -> Result<T> {
        let value = self
            .get_column(name)
            .ok_or_else(|| Error::msg(format!("The row has no column named `{name}`")))?;
        T::try_from_value(value.clone())
            .map_err(|e| e.context(format!("While reading the column `{name}`")))
    }
    /// Whether any cell equals `value`.
    pub fn contains(&self, value: &Value) -> bool {
        self.values.iter().any(|v| v == value)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// Everything an execution produced.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResultSet {
    /// Rows returned by the statement, empty for data-modifying statements.
    pub rows: Vec<RowLabeled>,
    /// Rows returned by a query or affected by a data-modifying statement.
    pub rows_affected: u64,
}

impl ResultSet {
    pub fn from_rows(rows: Vec<RowLabeled>) -> Self {
        Self {
            rows_affected: rows.len() as _,
            rows,
        }
    }
    pub fn affected(rows_affected: u64) -> Self {
        Self {
            rows: Vec::new(),
            rows_affected,
        }
    }
}
