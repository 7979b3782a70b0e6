//! Plain terminal report

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table as TextTable, Tabled};

use crate::download::XLSX_CONTENT_TYPE;
use crate::model::CellValue;
use crate::preview::Preview;
use crate::session::Conversion;
use crate::summary::{format_count, ColumnSummary, TableSummary};

use super::OutputFormatter;

/// Terminal output with aligned tables
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn write_header(&self, writer: &mut dyn Write, source_name: &str) -> Result<()> {
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer, " pqxl: {}", source_name)?;
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_metrics(&self, summary: &TableSummary, writer: &mut dyn Write) -> Result<()> {
        writeln!(
            writer,
            "Rows: {}    Columns: {}    Memory: {}",
            format_count(summary.rows),
            summary.columns,
            summary.memory_display()
        )?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_preview(&self, preview: &Preview, writer: &mut dyn Write) -> Result<()> {
        if preview.is_truncated() {
            writeln!(
                writer,
                "Data Preview (first {} of {} rows):",
                format_count(preview.len()),
                format_count(preview.total_rows)
            )?;
        } else {
            writeln!(writer, "Data Preview:")?;
        }

        if preview.columns.is_empty() {
            writeln!(writer, "  (no columns)")?;
            writeln!(writer)?;
            return Ok(());
        }

        let mut builder = Builder::default();
        builder.push_record(preview.columns.iter().cloned());
        for row in &preview.rows {
            builder.push_record(row.iter().map(preview_cell));
        }
        let mut table = builder.build();
        table.with(Style::modern());
        writeln!(writer, "{}", table)?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_column_details(&self, columns: &[ColumnSummary], writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "Column Details:")?;
        let rows = columns.iter().map(|c| ColumnRow {
            name: &c.name,
            data_type: &c.data_type,
            non_null: c.non_null,
            null: c.null,
        });
        let mut table = TextTable::new(rows);
        table.with(Style::modern());
        writeln!(writer, "{}", table)?;
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Tabled)]
struct ColumnRow<'a> {
    #[tabled(rename = "Column")]
    name: &'a str,
    #[tabled(rename = "Type")]
    data_type: &'a str,
    #[tabled(rename = "Non-Null")]
    non_null: usize,
    #[tabled(rename = "Null")]
    null: usize,
}

fn preview_cell(cell: &CellValue) -> String {
    if cell.is_null() {
        "null".to_string()
    } else {
        cell.display().into_owned()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(
        &self,
        conversion: &Conversion,
        saved: Option<&Path>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let report = &conversion.report;
        self.write_header(writer, &conversion.source_name)?;
        self.write_metrics(&report.summary, writer)?;
        self.write_preview(&report.preview, writer)?;
        self.write_column_details(&report.summary.column_details, writer)?;

        if let Some(path) = saved {
            writeln!(writer, "Saved {} ({})", path.display(), XLSX_CONTENT_TYPE)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::conversion;

    #[test]
    fn test_render_sections() {
        let mut out = Vec::new();
        TerminalOutput::new()
            .render(&conversion(), Some(Path::new("sample.xlsx")), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("pqxl: sample.parquet"));
        assert!(text.contains("Rows: 2    Columns: 2    Memory:"));
        assert!(text.contains("Data Preview:"));
        assert!(text.contains("<b>bold</b>"));
        assert!(text.contains("Non-Null"));
        assert!(text.contains("Utf8"));
        assert!(text.contains("Saved sample.xlsx"));
    }
}
