//! HTML report output

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::download::{download_name, XLSX_CONTENT_TYPE};
use crate::session::Conversion;
use crate::summary::{format_count, ColumnSummary};

use super::OutputFormatter;

/// Standalone HTML page with metrics, preview and column details
pub struct HtmlOutput;

impl HtmlOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct HtmlView<'a> {
    source_name: &'a str,
    rows: String,
    columns: usize,
    memory: String,
    preview_columns: &'a [String],
    preview_rows: Vec<Vec<String>>,
    truncated: bool,
    column_details: &'a [ColumnSummary],
    download_name: String,
    content_type: &'static str,
    saved_to: Option<String>,
}

impl OutputFormatter for HtmlOutput {
    fn render(
        &self,
        conversion: &Conversion,
        saved: Option<&Path>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let summary = &conversion.report.summary;
        let preview = &conversion.report.preview;

        let view = HtmlView {
            source_name: &conversion.source_name,
            rows: format_count(summary.rows),
            columns: summary.columns,
            memory: summary.memory_display(),
            preview_columns: &preview.columns,
            preview_rows: preview
                .rows
                .iter()
                .map(|row| row.iter().map(|c| c.display().into_owned()).collect())
                .collect(),
            truncated: preview.is_truncated(),
            column_details: &summary.column_details,
            download_name: download_name(&conversion.source_name),
            content_type: XLSX_CONTENT_TYPE,
            saved_to: saved.map(|p| p.display().to_string()),
        };

        let page = Tera::one_off(TEMPLATE, &Context::from_serialize(&view)?, true)?;
        writer.write_all(page.as_bytes())?;
        Ok(())
    }
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Parquet to Excel: {{ source_name }}</title>
  <style>
    :root {
      --bg: #1a1b26;
      --fg: #a9b1d6;
      --accent: #7aa2f7;
      --green: #9ece6a;
      --border: #414868;
    }
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: 'JetBrains Mono', 'Fira Code', monospace;
      background: var(--bg);
      color: var(--fg);
      padding: 2rem;
      line-height: 1.6;
    }
    .header { border-bottom: 2px solid var(--border); padding-bottom: 1rem; margin-bottom: 2rem; }
    .header h1 { color: var(--accent); font-size: 2rem; font-weight: 600; }
    .status { color: var(--green); margin-top: 0.5rem; }
    .summary { display: flex; gap: 2rem; margin-bottom: 2rem; }
    .stat {
      display: flex;
      flex-direction: column;
      padding: 1rem;
      border-radius: 8px;
      background: rgba(255,255,255,0.05);
    }
    .stat .num { font-size: 1.5rem; font-weight: 600; }
    .section { margin-bottom: 2rem; overflow-x: auto; }
    .section h2 {
      color: var(--accent);
      font-size: 1.25rem;
      margin-bottom: 1rem;
      padding-bottom: 0.5rem;
      border-bottom: 1px solid var(--border);
    }
    table { width: 100%; border-collapse: collapse; margin-bottom: 1rem; }
    th, td { text-align: left; padding: 0.5rem 0.75rem; border: 1px solid var(--border); }
    th { background: rgba(255,255,255,0.05); font-weight: 600; }
    .note { opacity: 0.7; font-size: 0.875rem; }
  </style>
</head>
<body>
  <div class="header">
    <h1>Parquet to Excel</h1>
    <p class="status">{{ source_name }} loaded successfully</p>
  </div>

  <div class="summary">
    <div class="stat"><span class="num">{{ rows }}</span><span class="label">Rows</span></div>
    <div class="stat"><span class="num">{{ columns }}</span><span class="label">Columns</span></div>
    <div class="stat"><span class="num">{{ memory }}</span><span class="label">Memory</span></div>
  </div>

  <div class="section">
    <h2>Data Preview</h2>
    {% if truncated %}<p class="note">Showing the first {{ preview_rows | length }} of {{ rows }} rows.</p>{% endif %}
    <table class="preview">
      <tr>{% for name in preview_columns %}<th>{{ name }}</th>{% endfor %}</tr>
      {% for row in preview_rows %}<tr>{% for cell in row %}<td>{{ cell }}</td>{% endfor %}</tr>
      {% endfor %}
    </table>
  </div>

  <div class="section">
    <h2>Column Details</h2>
    <table class="columns">
      <tr><th>Column</th><th>Type</th><th>Non-Null</th><th>Null</th></tr>
      {% for col in column_details %}<tr><td>{{ col.name }}</td><td>{{ col.data_type }}</td><td>{{ col.non_null }}</td><td>{{ col.null }}</td></tr>
      {% endfor %}
    </table>
  </div>

  <div class="section">
    <h2>Download Excel File</h2>
    <p>{{ download_name }} <span class="note">({{ content_type }})</span></p>
    {% if saved_to %}<p class="note">Saved to {{ saved_to }}</p>{% endif %}
  </div>
</body>
</html>
"#;
