//! Configuration handling for pqxl

use std::path::PathBuf;

use crate::preview::DEFAULT_PREVIEW_ROWS;

/// Output format for the inspection report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Html,
}

/// What the exporter does with values a spreadsheet has no native cell for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValuePolicy {
    /// Nested/binary values become their display text; timezone-aware
    /// datetimes are written as UTC wall-clock times.
    #[default]
    Coerce,
    /// Such values fail the export.
    Strict,
}

/// Configuration for a conversion session
#[derive(Debug, Clone)]
pub struct Config {
    /// Extensions the uploader accepts (lowercase, without the dot)
    pub accepted_extensions: Vec<String>,
    /// Number of rows shown in the preview
    pub preview_rows: usize,
    /// Handling of values without a native spreadsheet type
    pub value_policy: ValuePolicy,
    /// Stop after the summary and preview
    pub summary_only: bool,
    /// Re-read the exported spreadsheet and compare it with the table
    pub verify: bool,
    /// Report format
    pub output_format: OutputFormat,
    /// Where the download is written (file or directory)
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accepted_extensions: vec!["parquet".to_string(), "pq".to_string()],
            preview_rows: DEFAULT_PREVIEW_ROWS,
            value_policy: ValuePolicy::default(),
            summary_only: false,
            verify: false,
            output_format: OutputFormat::default(),
            output: None,
        }
    }
}

impl Config {
    /// Set the preview length
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Set the value policy
    pub fn with_value_policy(mut self, policy: ValuePolicy) -> Self {
        self.value_policy = policy;
        self
    }

    /// Enable summary-only mode
    pub fn with_summary_only(mut self, summary_only: bool) -> Self {
        self.summary_only = summary_only;
        self
    }

    /// Enable the round-trip check after export
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Set report format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set download destination
    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    /// Check an extension against the uploader filter
    pub fn accepts_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.accepted_extensions.iter().any(|e| *e == ext)
    }
}
