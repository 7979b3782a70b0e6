//! Parser layer for reading uploaded blobs into tables

mod excel;
mod parquet;

use tracing::debug;

use crate::config::Config;
use crate::error::LoadError;
use crate::model::Table;
use crate::source::SourceBlob;

pub use self::excel::ExcelParser;
pub use self::parquet::ParquetParser;

/// Magic bytes framing every Parquet file
pub const PARQUET_MAGIC: &[u8; 4] = b"PAR1";

/// Trait for parsing in-memory tabular files
pub trait Parser: Send + Sync {
    /// Parse a blob and return a Table
    fn parse(&self, blob: &SourceBlob, config: &Config) -> Result<Table, LoadError>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for choosing an upload parser based on file extension.
///
/// Only upload formats are registered; [`ExcelParser`] reads exported
/// workbooks back and is never picked for an upload.
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all upload parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(ParquetParser)],
        }
    }

    /// Get a parser for the given blob, if the config accepts its extension
    pub fn get_parser(&self, blob: &SourceBlob, config: &Config) -> Result<&dyn Parser, LoadError> {
        let ext = blob.extension().unwrap_or_default();
        let unsupported = || LoadError::UnsupportedExtension {
            extension: if ext.is_empty() {
                "(none)".to_string()
            } else {
                ext.clone()
            },
            expected: config.accepted_extensions.join(", "),
        };

        if !config.accepts_extension(&ext) {
            return Err(unsupported());
        }
        self.parsers
            .iter()
            .find(|p| p.supports_extension(&ext))
            .map(|p| p.as_ref())
            .ok_or_else(unsupported)
    }

    /// Parse a blob using the appropriate parser
    pub fn parse(&self, blob: &SourceBlob, config: &Config) -> Result<Table, LoadError> {
        let parser = self.get_parser(blob, config)?;
        debug!(name = blob.name(), bytes = blob.len(), "parsing upload");
        parser.parse(blob, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_picks_by_extension() {
        let factory = ParserFactory::new();
        let config = Config::default();
        assert!(factory
            .get_parser(&SourceBlob::new("a.parquet", Vec::new()), &config)
            .is_ok());
        assert!(factory
            .get_parser(&SourceBlob::new("a.PQ", Vec::new()), &config)
            .is_ok());
        assert!(matches!(
            factory.get_parser(&SourceBlob::new("a.json", Vec::new()), &config),
            Err(LoadError::UnsupportedExtension { .. })
        ));
    }

    #[test]
    fn test_factory_rejects_spreadsheets() {
        let factory = ParserFactory::new();
        let err = factory
            .get_parser(&SourceBlob::new("book.xlsx", Vec::new()), &Config::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            LoadError::UnsupportedExtension { ref extension, ref expected }
                if extension == "xlsx" && expected == "parquet, pq"
        ));
    }
}
