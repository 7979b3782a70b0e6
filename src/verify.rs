//! Round-trip check of an exported workbook against its source table

use tracing::debug;

use crate::config::Config;
use crate::error::ExportError;
use crate::export::{is_blank_cell, ExportBlob};
use crate::model::Table;
use crate::parser::{ExcelParser, Parser};
use crate::source::SourceBlob;

/// Read the workbook back and compare column names, column order and row count.
///
/// A spreadsheet reader cannot see rows after the last non-blank cell, so
/// trailing rows that export as blank cells only are not counted on either side.
pub fn verify_round_trip(table: &Table, export: &ExportBlob) -> Result<Table, ExportError> {
    let blob = SourceBlob::new("export.xlsx", export.bytes().to_vec());
    let reread = ExcelParser::default()
        .parse(&blob, &Config::default())
        .map_err(|e| ExportError::Reread(Box::new(e)))?;

    // Trailing blank headers over empty columns are invisible to the reader
    let expected: Vec<&str> = table.column_names().collect();
    let actual: Vec<&str> = reread.column_names().collect();
    if actual.len() > expected.len() {
        return Err(ExportError::RoundTrip(format!(
            "expected {} columns, found {}",
            expected.len(),
            actual.len()
        )));
    }
    if let Some((i, want, got)) = expected
        .iter()
        .enumerate()
        .map(|(i, want)| (i, *want, actual.get(i).copied().unwrap_or("")))
        .find(|(_, want, got)| want != got)
    {
        return Err(ExportError::RoundTrip(format!(
            "column {} is named `{}` in the spreadsheet, expected `{}`",
            i + 1,
            got,
            want
        )));
    }

    let expected_rows = populated_rows(table);
    let actual_rows = populated_rows(&reread);
    if expected_rows != actual_rows {
        return Err(ExportError::RoundTrip(format!(
            "expected {} rows, found {}",
            expected_rows, actual_rows
        )));
    }

    debug!(rows = actual_rows, columns = expected.len(), "round-trip check passed");
    Ok(reread)
}

fn populated_rows(table: &Table) -> usize {
    table
        .rows
        .iter()
        .rposition(|row| row.cells.iter().any(|c| !is_blank_cell(c)))
        .map_or(0, |last| last + 1)
}
