//! Table-level and per-column statistics

use serde::Serialize;

use crate::model::Table;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Statistics for one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    /// Declared type name
    pub data_type: String,
    pub non_null: usize,
    pub null: usize,
}

/// Statistics for a whole table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: usize,
    /// Deep in-memory size of the loaded table
    pub memory_bytes: usize,
    pub column_details: Vec<ColumnSummary>,
}

impl TableSummary {
    pub fn memory_mb(&self) -> f64 {
        self.memory_bytes as f64 / BYTES_PER_MB
    }

    /// Memory size as shown to users, e.g. `1.25 MB`
    pub fn memory_display(&self) -> String {
        format!("{:.2} MB", self.memory_mb())
    }
}

/// Compute the summary of a table.
///
/// For every column `non_null + null == rows`.
pub fn summarize(table: &Table) -> TableSummary {
    let rows = table.row_count();
    let column_details = table
        .columns
        .iter()
        .map(|column| {
            let null = table.column_values(column.index).filter(|v| v.is_null()).count();
            // Rows shorter than the schema count as missing in that column
            let present = table.column_values(column.index).count();
            let null = null + (rows - present);
            ColumnSummary {
                name: column.name.clone(),
                data_type: column.data_type.clone(),
                non_null: rows - null,
                null,
            }
        })
        .collect();

    TableSummary {
        rows,
        columns: table.column_count(),
        memory_bytes: table.memory_usage(),
        column_details,
    }
}

/// Format a count with thousands separators, e.g. `1,234,567`
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellType, CellValue, Column};

    fn five_by_three() -> Table {
        let mut table = Table::new(vec![
            Column::with_type("a", 0, CellType::Int, "Int64"),
            Column::with_type("b", 1, CellType::String, "Utf8"),
            Column::with_type("c", 2, CellType::Float, "Float64"),
        ]);
        for i in 0..5i64 {
            let b = if i == 2 { CellValue::Null } else { CellValue::from(format!("v{i}")) };
            table.add_row(vec![CellValue::Int(i), b, CellValue::Float(i as f64)], i as usize + 1);
        }
        table
    }

    #[test]
    fn test_counts_nulls_per_column() {
        let summary = summarize(&five_by_three());
        assert_eq!(summary.rows, 5);
        assert_eq!(summary.columns, 3);
        let b = &summary.column_details[1];
        assert_eq!((b.name.as_str(), b.non_null, b.null), ("b", 4, 1));
        assert_eq!(b.data_type, "Utf8");
        for col in &summary.column_details {
            assert_eq!(col.non_null + col.null, summary.rows);
        }
    }

    #[test]
    fn test_nan_is_counted_as_null() {
        let mut table = five_by_three();
        table.rows[0].cells[2] = CellValue::Float(f64::NAN);
        let summary = summarize(&table);
        assert_eq!(summary.column_details[2].null, 1);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new(vec![Column::new("a", 0), Column::new("b", 1)]);
        let summary = summarize(&table);
        assert_eq!(summary.rows, 0);
        assert!(summary
            .column_details
            .iter()
            .all(|c| c.non_null == 0 && c.null == 0));
        assert!(summary.memory_bytes > 0);
    }

    #[test]
    fn test_memory_display() {
        let summary = TableSummary {
            rows: 0,
            columns: 0,
            memory_bytes: 1024 * 1024 * 3 / 2,
            column_details: Vec::new(),
        };
        assert_eq!(summary.memory_display(), "1.50 MB");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
