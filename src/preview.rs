//! Leading rows of a table for display

use serde::Serialize;

use crate::model::{CellValue, Table};

/// Rows shown unless configured otherwise
pub const DEFAULT_PREVIEW_ROWS: usize = 100;

/// The first rows of a table, in source order, values untouched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// Row count of the whole table
    pub total_rows: usize,
}

impl Preview {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when the table has rows beyond the preview
    pub fn is_truncated(&self) -> bool {
        self.total_rows > self.rows.len()
    }
}

/// Take the first `min(limit, rows)` rows
pub fn preview(table: &Table, limit: usize) -> Preview {
    Preview {
        columns: table.column_names().map(str::to_string).collect(),
        rows: table
            .rows
            .iter()
            .take(limit)
            .map(|row| row.cells.clone())
            .collect(),
        total_rows: table.row_count(),
    }
}
