//! Table, Row, and Cell data structures

use std::borrow::Cow;
use std::mem::size_of;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::schema::Column;

/// A cell value with type information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    /// Display text of a nested or binary value
    Complex(String),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            (CellValue::Time(a), CellValue::Time(b)) => a == b,
            (CellValue::Complex(a), CellValue::Complex(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            _ => false,
        }
    }
}

impl CellValue {
    /// Check if the value counts as missing.
    ///
    /// A floating NaN is missing too, matching how dataframe tools count nulls.
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::String(s) | CellValue::Complex(s) => Cow::Borrowed(s.as_str()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
            CellValue::Time(t) => Cow::Owned(t.to_string()),
        }
    }

    /// Bytes owned on the heap by this value
    pub fn heap_size(&self) -> usize {
        match self {
            CellValue::String(s) | CellValue::Complex(s) => s.capacity(),
            _ => 0,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A row in the table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
    /// Original row number in the source file (1-indexed)
    pub source_line: usize,
}

impl Row {
    pub fn new(cells: Vec<CellValue>, source_line: usize) -> Self {
        Self { cells, source_line }
    }
}

/// A table containing columns and rows.
///
/// Column order and row order are those of the source; nothing in the
/// pipeline reorders either.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// All rows in the table
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Add a row to the table, padding short rows with nulls
    pub fn add_row(&mut self, mut cells: Vec<CellValue>, source_line: usize) {
        if cells.len() < self.columns.len() {
            cells.resize(self.columns.len(), CellValue::Null);
        }
        self.rows.push(Row::new(cells, source_line));
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Iterate over the values of one column
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().filter_map(move |row| row.cells.get(index))
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Approximate in-memory size in bytes, following heap allocations
    /// (row vectors, strings) rather than counting fixed-width slots only.
    pub fn memory_usage(&self) -> usize {
        let columns: usize = self
            .columns
            .iter()
            .map(|c| size_of::<Column>() + c.heap_size())
            .sum();
        let rows: usize = self
            .rows
            .iter()
            .map(|row| {
                size_of::<Row>()
                    + row.cells.capacity() * size_of::<CellValue>()
                    + row.cells.iter().map(CellValue::heap_size).sum::<usize>()
            })
            .sum();
        size_of::<Table>() + columns + rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellType;

    fn sample() -> Table {
        let mut table = Table::new(vec![
            Column::with_type("id", 0, CellType::Int, "Int64"),
            Column::with_type("name", 1, CellType::String, "Utf8"),
        ]);
        table.add_row(vec![CellValue::Int(1), "alpha".into()], 2);
        table.add_row(vec![CellValue::Int(2)], 3);
        table
    }

    #[test]
    fn test_add_row_pads_with_nulls() {
        let table = sample();
        assert_eq!(table.rows[1].cells, vec![CellValue::Int(2), CellValue::Null]);
    }

    #[test]
    fn test_nan_counts_as_null() {
        assert!(CellValue::Float(f64::NAN).is_null());
        assert!(!CellValue::Float(0.0).is_null());
        assert!(!CellValue::String(String::new()).is_null());
    }

    #[test]
    fn test_memory_usage_follows_strings() {
        let small = sample();
        let mut big = sample();
        big.rows[0].cells[1] = CellValue::String("x".repeat(10_000));
        assert!(big.memory_usage() >= small.memory_usage() + 10_000 - "alpha".len());
    }

    #[test]
    fn test_column_names_in_order() {
        let table = sample();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "name"]);
    }
}
