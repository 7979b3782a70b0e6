//! pqxl - Parquet to Excel conversion with a preview step
//!
//! Loads a Parquet upload into an in-memory table, summarizes and previews it,
//! and re-encodes the whole table as a single-sheet xlsx workbook.

pub mod config;
pub mod download;
pub mod error;
pub mod export;
pub mod model;
pub mod output;
pub mod parser;
pub mod preview;
pub mod session;
pub mod source;
pub mod summary;
pub mod verify;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::{ConvertError, ExportError, LoadError};
pub use model::Table;
pub use session::{Event, Session, Stage};
pub use source::SourceBlob;
