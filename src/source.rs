//! Uploaded file held in memory for the duration of a session

use std::path::Path;

use bytes::Bytes;

use crate::config::Config;
use crate::error::LoadError;

/// Raw bytes of an uploaded file plus the name it was uploaded under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlob {
    name: String,
    bytes: Bytes,
}

impl SourceBlob {
    /// Wrap bytes that already passed the upload filter
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Accept an upload, rejecting names whose extension the config does not allow
    pub fn upload(
        name: impl Into<String>,
        bytes: impl Into<Bytes>,
        config: &Config,
    ) -> Result<Self, LoadError> {
        let name = name.into();
        let extension = extension_of(&name).unwrap_or_default();
        if !config.accepts_extension(extension) {
            return Err(LoadError::UnsupportedExtension {
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    extension.to_string()
                },
                expected: config.accepted_extensions.join(", "),
            });
        }
        Ok(Self::new(name, bytes))
    }

    /// Read a file from disk and accept it as an upload
    pub fn from_path(path: &Path, config: &Config) -> Result<Self, LoadError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Check the extension before reading a possibly large file
        let blob = Self::upload(name, Bytes::new(), config)?;
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(blob.name, bytes))
    }

    /// Name the file was uploaded under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercased extension of the upload name, if any
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name).map(str::to_lowercase)
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn extension_of(name: &str) -> Option<&str> {
    Path::new(name).extension().and_then(|e| e.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_accepts_parquet() {
        let blob = SourceBlob::upload("sales.PARQUET", vec![1u8, 2, 3], &Config::default()).unwrap();
        assert_eq!(blob.name(), "sales.PARQUET");
        assert_eq!(blob.extension().as_deref(), Some("parquet"));
        assert_eq!(blob.len(), 3);
    }

    #[test]
    fn test_upload_rejects_other_extensions() {
        let err = SourceBlob::upload("sales.csv", Vec::new(), &Config::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension { ref extension, .. } if extension == "csv"));

        let err = SourceBlob::upload("README", Vec::new(), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("(none)"));
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.parquet");
        std::fs::write(&path, b"PAR1").unwrap();

        let blob = SourceBlob::from_path(&path, &Config::default()).unwrap();
        assert_eq!(blob.name(), "data.parquet");
        assert_eq!(blob.bytes().as_ref(), b"PAR1");
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SourceBlob::from_path(Path::new("/nonexistent/x.parquet"), &Config::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
