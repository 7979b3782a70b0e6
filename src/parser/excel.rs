//! Excel workbook parser (xlsx), used to read exported spreadsheets back

use std::io::Cursor;

use calamine::{Data, DataType as _, Range, Reader, Xlsx};

use crate::config::Config;
use crate::error::LoadError;
use crate::export::SHEET_NAME;
use crate::model::{CellValue, Column, Table};
use crate::source::SourceBlob;

use super::Parser;

/// Parser for Excel workbooks
pub struct ExcelParser {
    sheet_name: String,
}

impl Default for ExcelParser {
    fn default() -> Self {
        Self::new(SHEET_NAME)
    }
}

impl ExcelParser {
    /// Read the named sheet
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }
}

impl Parser for ExcelParser {
    fn parse(&self, blob: &SourceBlob, _config: &Config) -> Result<Table, LoadError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(blob.bytes().as_ref()))?;

        if !workbook.sheet_names().contains(&self.sheet_name) {
            return Err(LoadError::MissingSheet(self.sheet_name.clone()));
        }

        let range: Range<Data> = workbook.worksheet_range(&self.sheet_name)?;
        Ok(parse_range(&range))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "xlsx" | "xlsm")
    }
}

/// Row 0 of the sheet is the header, every following row one table row.
///
/// Positions are absolute: a blank header cell or blank leading rows do not
/// shift the header down, and blank headers keep their empty name.
fn parse_range(range: &Range<Data>) -> Table {
    let Some((last_row, last_col)) = range.end() else {
        return Table::new(Vec::new());
    };
    let cell = |row: u32, col: u32| range.get_value((row, col)).unwrap_or(&Data::Empty);

    let columns: Vec<Column> = (0..=last_col)
        .map(|col| Column::new(cell_to_string(cell(0, col)), col as usize))
        .collect();

    let mut table = Table::new(columns);
    for row in 1..=last_row {
        let cells: Vec<CellValue> = (0..=last_col)
            .map(|col| convert_cell(cell(row, col)))
            .collect();
        table.add_row(cells, row as usize);
    }
    table
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Float(f) => {
            // Spreadsheets store every number as a double
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => CellValue::Date(dt.date()),
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::String(cell_to_string(cell)),
        },
        Data::DateTimeIso(s) => {
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                CellValue::DateTime(dt)
            } else if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                CellValue::Date(d)
            } else {
                CellValue::String(s.clone())
            }
        }
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#{:?}", e)),
    }
}
