//! Error types for the conversion pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Failure while turning an uploaded blob into a [`Table`](crate::model::Table)
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension `{extension}` (expected one of: {expected})")]
    UnsupportedExtension { extension: String, expected: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a Parquet file: missing `PAR1` magic bytes")]
    NotParquet,

    #[error("invalid Parquet data: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("failed to decode column data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("invalid spreadsheet data: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    #[error("sheet `{0}` not found in workbook")]
    MissingSheet(String),
}

/// Failure while encoding a table as a spreadsheet
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("column `{column}` holds {data_type} values, which a spreadsheet cell cannot represent")]
    UnsupportedValue { column: String, data_type: String },

    #[error("column `{column}` is timezone-aware ({timezone}); spreadsheets cannot store timezones")]
    TimezoneAware { column: String, timezone: String },

    #[error("table has {rows} rows but a worksheet holds at most {max} data rows")]
    TooManyRows { rows: usize, max: usize },

    #[error("table has {columns} columns but a worksheet holds at most {max}")]
    TooManyColumns { columns: usize, max: usize },

    #[error("spreadsheet writer failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("exported spreadsheet could not be read back: {0}")]
    Reread(#[source] Box<LoadError>),

    #[error("round-trip check failed: {0}")]
    RoundTrip(String),
}

/// Any failure of the pipeline, collapsed into one user-facing category
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ConvertError {
    /// Message shown in place of the summary, preview and download
    pub fn user_message(&self) -> String {
        format!("file could not be processed: {}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_wraps_diagnostic() {
        let err = ConvertError::from(LoadError::NotParquet);
        assert_eq!(
            err.user_message(),
            "file could not be processed: not a Parquet file: missing `PAR1` magic bytes"
        );
    }

    #[test]
    fn test_export_error_names_column() {
        let err = ExportError::UnsupportedValue {
            column: "tags".into(),
            data_type: "List(Utf8)".into(),
        };
        assert!(err.to_string().contains("`tags`"));
    }
}
