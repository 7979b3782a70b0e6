//! Rendering of inspection reports

mod html;
mod json;
mod terminal;

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::config::OutputFormat;
use crate::session::Conversion;

pub use html::HtmlOutput;
pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Trait for report formatters
pub trait OutputFormatter {
    /// Render the summary, preview and column details of a conversion.
    /// `saved` is where the workbook was written, if it was.
    fn render(
        &self,
        conversion: &Conversion,
        saved: Option<&Path>,
        writer: &mut dyn Write,
    ) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
            OutputFormat::Html => Box::new(HtmlOutput::new()),
        }
    }
}

/// Render a report to stdout
pub fn render_to_stdout(
    conversion: &Conversion,
    saved: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let formatter = OutputFactory::create(format);
    let mut stdout = std::io::stdout().lock();
    formatter.render(conversion, saved, &mut stdout)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::{CellType, CellValue, Column, Table};
    use crate::preview::preview;
    use crate::session::{Conversion, Report};
    use crate::summary::summarize;

    pub(crate) fn conversion() -> Conversion {
        let mut table = Table::new(vec![
            Column::with_type("id", 0, CellType::Int, "Int64"),
            Column::with_type("label", 1, CellType::String, "Utf8"),
        ]);
        table.add_row(vec![CellValue::Int(1), "<b>bold</b>".into()], 1);
        table.add_row(vec![CellValue::Int(2), CellValue::Null], 2);
        let report = Report {
            summary: summarize(&table),
            preview: preview(&table, 100),
        };
        Conversion {
            source_name: "sample.parquet".into(),
            table,
            report,
            export: None,
        }
    }
}
