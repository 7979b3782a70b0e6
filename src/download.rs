//! Hand-off of an exported workbook to the user

use std::path::{Path, PathBuf};

use tracing::info;

use crate::export::ExportBlob;

/// MIME type of xlsx workbooks
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SOURCE_EXTENSIONS: &[&str] = &["parquet", "pq"];

/// A workbook ready to be saved under its derived name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    pub fn new(source_name: &str, export: ExportBlob) -> Self {
        Self {
            file_name: download_name(source_name),
            content_type: XLSX_CONTENT_TYPE,
            bytes: export.into_bytes(),
        }
    }

    /// Write the workbook. A directory receives `<file_name>`, any other
    /// path is used as given.
    pub fn save_to(&self, destination: &Path) -> std::io::Result<PathBuf> {
        let path = if destination.is_dir() {
            destination.join(&self.file_name)
        } else {
            destination.to_path_buf()
        };
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "saved download");
        Ok(path)
    }
}

/// Derive `<base>.xlsx` from an upload name, e.g. `sales_data.parquet` → `sales_data.xlsx`
pub fn download_name(source_name: &str) -> String {
    // Uploads may carry a client-side path
    let file_name = source_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(source_name);

    let base = match file_name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && SOURCE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)) =>
        {
            stem
        }
        _ => file_name,
    };

    if base.is_empty() {
        "data.xlsx".to_string()
    } else {
        format!("{}.xlsx", base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_name() {
        assert_eq!(download_name("sales_data.parquet"), "sales_data.xlsx");
        assert_eq!(download_name("Report.PARQUET"), "Report.xlsx");
        assert_eq!(download_name("events.pq"), "events.xlsx");
        assert_eq!(download_name("archive.2024.parquet"), "archive.2024.xlsx");
        assert_eq!(download_name("uploads/2024/q1.parquet"), "q1.xlsx");
        assert_eq!(download_name("C:\\data\\q2.parquet"), "q2.xlsx");
        assert_eq!(download_name("noext"), "noext.xlsx");
        assert_eq!(download_name(".parquet"), ".parquet.xlsx");
        assert_eq!(download_name(""), "data.xlsx");
    }

    #[test]
    fn test_save_to_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let download = Download {
            file_name: "out.xlsx".into(),
            content_type: XLSX_CONTENT_TYPE,
            bytes: vec![1, 2, 3],
        };

        let saved = download.save_to(dir.path()).unwrap();
        assert_eq!(saved, dir.path().join("out.xlsx"));
        assert_eq!(std::fs::read(&saved).unwrap(), vec![1, 2, 3]);

        let explicit = dir.path().join("renamed.xlsx");
        assert_eq!(download.save_to(&explicit).unwrap(), explicit);
        assert!(explicit.exists());
    }
}
