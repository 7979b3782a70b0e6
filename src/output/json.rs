//! JSON output format

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::download::{download_name, XLSX_CONTENT_TYPE};
use crate::preview::Preview;
use crate::session::Conversion;
use crate::summary::TableSummary;

use super::OutputFormatter;

/// Pretty-printed JSON output formatter
pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    summary: &'a TableSummary,
    memory: String,
    preview: &'a Preview,
    download: JsonDownload,
}

#[derive(Serialize)]
struct JsonDownload {
    file_name: String,
    content_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_to: Option<String>,
}

impl OutputFormatter for JsonOutput {
    fn render(
        &self,
        conversion: &Conversion,
        saved: Option<&Path>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let report = &conversion.report;
        let output = JsonReport {
            file: &conversion.source_name,
            summary: &report.summary,
            memory: report.summary.memory_display(),
            preview: &report.preview,
            download: JsonDownload {
                file_name: download_name(&conversion.source_name),
                content_type: XLSX_CONTENT_TYPE,
                saved_to: saved.map(|p| p.display().to_string()),
            },
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)?;

        Ok(())
    }
}
