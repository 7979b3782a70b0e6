//! Spreadsheet export
//!
//! Encodes a [`Table`] as a single-sheet xlsx workbook: header row first,
//! then one spreadsheet row per table row, no index column.
//!
//! Value coercions:
//! - integers are written as numbers (doubles)
//! - nulls, NaN and empty strings become blank cells
//! - `inf`/`-inf` are written as text
//! - nested values are written as their display text unless the policy is strict

use rust_xlsxwriter::{
    ColNum, DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, RowNum, Workbook,
    Worksheet,
};
use tracing::{debug, info};

use crate::config::{Config, ValuePolicy};
use crate::error::ExportError;
use crate::model::{CellValue, Table};

/// Name of the only worksheet in an export
pub const SHEET_NAME: &str = "Data";

/// Worksheet row limit minus the header row
pub const MAX_DATA_ROWS: usize = 1_048_575;

/// Worksheet column limit
pub const MAX_COLUMNS: usize = 16_384;

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const TIME_FORMAT: &str = "hh:mm:ss";

/// Serialized workbook bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBlob {
    bytes: Vec<u8>,
}

impl ExportBlob {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Writes tables as xlsx workbooks
#[derive(Debug, Clone, Copy, Default)]
pub struct Exporter {
    policy: ValuePolicy,
}

impl Exporter {
    pub fn new(policy: ValuePolicy) -> Self {
        Self { policy }
    }

    /// Encode the whole table
    pub fn export(&self, table: &Table) -> Result<ExportBlob, ExportError> {
        self.check_limits(table)?;
        if self.policy == ValuePolicy::Strict {
            check_strict(table)?;
        }

        let mut workbook = Workbook::new();
        // Pinned creation time keeps repeated exports byte-identical
        let properties =
            DocProperties::new().set_creation_datetime(&ExcelDateTime::from_ymd(2000, 1, 1)?);
        workbook.set_properties(&properties);

        let worksheet = workbook.add_worksheet().set_name(SHEET_NAME)?;
        write_header(worksheet, table)?;
        write_rows(worksheet, table)?;

        let bytes = workbook.save_to_buffer()?;
        info!(
            rows = table.row_count(),
            columns = table.column_count(),
            bytes = bytes.len(),
            "exported spreadsheet"
        );
        Ok(ExportBlob { bytes })
    }

    fn check_limits(&self, table: &Table) -> Result<(), ExportError> {
        if table.row_count() > MAX_DATA_ROWS {
            return Err(ExportError::TooManyRows {
                rows: table.row_count(),
                max: MAX_DATA_ROWS,
            });
        }
        if table.column_count() > MAX_COLUMNS {
            return Err(ExportError::TooManyColumns {
                columns: table.column_count(),
                max: MAX_COLUMNS,
            });
        }
        Ok(())
    }
}

/// Export with the value policy from the config
pub fn export(table: &Table, config: &Config) -> Result<ExportBlob, ExportError> {
    Exporter::new(config.value_policy).export(table)
}

fn check_strict(table: &Table) -> Result<(), ExportError> {
    for column in &table.columns {
        let mut values = table.column_values(column.index);
        if let Some(tz) = &column.timezone {
            if values.any(|v| !v.is_null()) {
                return Err(ExportError::TimezoneAware {
                    column: column.name.clone(),
                    timezone: tz.clone(),
                });
            }
        } else if values.any(|v| matches!(v, CellValue::Complex(_))) {
            return Err(ExportError::UnsupportedValue {
                column: column.name.clone(),
                data_type: column.data_type.clone(),
            });
        }
    }
    Ok(())
}

/// Values written as blank cells: nulls, NaN and empty text
pub(crate) fn is_blank_cell(cell: &CellValue) -> bool {
    match cell {
        CellValue::String(s) | CellValue::Complex(s) => s.is_empty(),
        other => other.is_null(),
    }
}

fn write_header(worksheet: &mut Worksheet, table: &Table) -> Result<(), ExportError> {
    let format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);

    for column in &table.columns {
        worksheet.write_string_with_format(0, column.index as ColNum, &column.name, &format)?;
    }
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, table: &Table) -> Result<(), ExportError> {
    let date = Format::new().set_num_format(DATE_FORMAT);
    let datetime = Format::new().set_num_format(DATETIME_FORMAT);
    let time = Format::new().set_num_format(TIME_FORMAT);

    for (row_idx, row) in table.rows.iter().enumerate() {
        let r = (row_idx + 1) as RowNum;
        for (col_idx, cell) in row.cells.iter().enumerate() {
            if is_blank_cell(cell) {
                continue;
            }
            let c = col_idx as ColNum;
            match cell {
                CellValue::Null => {}
                CellValue::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
                CellValue::Int(i) => {
                    worksheet.write_number(r, c, *i as f64)?;
                }
                CellValue::Float(f) if f.is_infinite() => {
                    worksheet.write_string(r, c, if *f > 0.0 { "inf" } else { "-inf" })?;
                }
                CellValue::Float(f) => {
                    worksheet.write_number(r, c, *f)?;
                }
                CellValue::String(s) | CellValue::Complex(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                CellValue::Date(d) => {
                    worksheet.write_datetime_with_format(r, c, d, &date)?;
                }
                CellValue::DateTime(dt) => {
                    worksheet.write_datetime_with_format(r, c, dt, &datetime)?;
                }
                CellValue::Time(t) => {
                    worksheet.write_datetime_with_format(r, c, t, &time)?;
                }
            }
        }
    }
    debug!(rows = table.row_count(), "wrote worksheet rows");
    Ok(())
}
