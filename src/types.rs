//! Core data model: the in-memory post record table.
//!
//! A [`PostTable`] is created fresh for every analysis run (from a file path or an uploaded
//! byte stream) and is dropped once the report has been rendered. Nothing here is persisted.

use std::fmt;

use serde::Serialize;

/// A single cell value in a [`PostTable`].
///
/// The loader only produces [`Value::Null`] and [`Value::Utf8`]; numeric variants appear once
/// the analyzer has type-checked the engagement columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value. Text and nulls return `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            Value::Null | Value::Utf8(_) => None,
        }
    }

    /// Text view of the value. Only [`Value::Utf8`] returns `Some`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NaN"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => {
                if v.fract() == 0.0 && v.is_finite() {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

/// In-memory post record table.
///
/// Rows are stored as `Vec<Vec<Value>>`, each row in the same order as [`PostTable::columns`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostTable {
    /// Ordered column labels.
    pub columns: Vec<String>,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl PostTable {
    /// Create a table from column labels and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the index of a column by exact label, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate the values of one column, in row order.
    ///
    /// Yields nothing if `idx` is out of range.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// The first row whose cell count differs from the number of columns, as
    /// `(row index, cell count)`.
    pub fn ragged_row(&self) -> Option<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.columns.len())
            .map(|(i, row)| (i, row.len()))
    }

    /// The first `n` rows (or all rows, if fewer), preserving the column labels.
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Create a new table containing only rows that match `predicate`.
    ///
    /// The returned table keeps the original column labels and row order.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Append a column computed from each row.
    ///
    /// If a column with the same label already exists it is overwritten in place, so deriving a
    /// column twice never duplicates it.
    pub fn with_column<F>(mut self, name: &str, mut derive: F) -> Self
    where
        F: FnMut(&[Value]) -> Value,
    {
        match self.index_of(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    let v = derive(row.as_slice());
                    match row.get_mut(idx) {
                        Some(cell) => *cell = v,
                        None => {
                            row.resize(idx, Value::Null);
                            row.push(v);
                        }
                    }
                }
            }
            None => {
                for row in &mut self.rows {
                    let v = derive(row.as_slice());
                    row.push(v);
                }
                self.columns.push(name.to_owned());
            }
        }
        self
    }
}
