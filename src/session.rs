//! Event-driven conversion session
//!
//! A session holds at most one upload at a time. Selecting a file discards
//! whatever was there before and runs the pipeline:
//!
//! ```text
//! Idle -> Loaded -> Inspected -> Exported -> Downloaded
//!   \________\__________\___________\-----> Failed
//! ```
//!
//! `Failed` is left only by selecting a new file.

use tracing::{info, warn};

use crate::config::Config;
use crate::error::ConvertError;
use crate::download::Download;
use crate::export::{export, ExportBlob};
use crate::model::Table;
use crate::parser::ParserFactory;
use crate::preview::{preview, Preview};
use crate::source::SourceBlob;
use crate::summary::{summarize, TableSummary};
use crate::verify::verify_round_trip;

/// Input to the session
#[derive(Debug)]
pub enum Event {
    FileSelected(SourceBlob),
    DownloadRequested,
}

/// Where the session is in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Loaded,
    Inspected,
    Exported,
    Downloaded,
    Failed,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Loaded => "loaded",
            Stage::Inspected => "inspected",
            Stage::Exported => "exported",
            Stage::Downloaded => "downloaded",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary and preview of a loaded table
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub summary: TableSummary,
    pub preview: Preview,
}

/// Everything derived from the current upload
#[derive(Debug)]
pub struct Conversion {
    pub source_name: String,
    pub table: Table,
    pub report: Report,
    pub export: Option<ExportBlob>,
}

/// Why the last upload could not be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub source_name: String,
    pub message: String,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug)]
enum State {
    Idle,
    Inspected(Box<Conversion>),
    Exported(Box<Conversion>),
    Downloaded(Box<Conversion>),
    Failed(Failure),
}

/// Single-user conversion session
#[derive(Debug)]
pub struct Session {
    config: Config,
    state: State,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: State::Idle,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current resting stage
    pub fn stage(&self) -> Stage {
        stage_of(&self.state)
    }

    /// The conversion of the current upload, unless idle or failed
    pub fn conversion(&self) -> Option<&Conversion> {
        match &self.state {
            State::Inspected(c) | State::Exported(c) | State::Downloaded(c) => Some(c),
            State::Idle | State::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match &self.state {
            State::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Drive the session with one event. A download request that succeeds
    /// returns the workbook.
    pub fn handle(&mut self, event: Event) -> Option<Download> {
        match event {
            Event::FileSelected(blob) => {
                self.select_file(blob);
                None
            }
            Event::DownloadRequested => self.request_download(),
        }
    }

    fn select_file(&mut self, blob: SourceBlob) {
        // Last write wins: drop the previous upload before loading the new one
        self.enter(State::Idle);
        let source_name = blob.name().to_string();

        let next = match self.run_pipeline(blob) {
            Ok(conversion) if conversion.export.is_some() => State::Exported(Box::new(conversion)),
            Ok(conversion) => State::Inspected(Box::new(conversion)),
            Err(e) => State::Failed(Failure {
                source_name,
                message: e.user_message(),
            }),
        };
        self.enter(next);
    }

    fn run_pipeline(&self, blob: SourceBlob) -> Result<Conversion, ConvertError> {
        let table = ParserFactory::new().parse(&blob, &self.config)?;
        info!(
            stage = %Stage::Loaded,
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded {}",
            blob.name()
        );

        // Summary and preview do not depend on each other
        let (summary, preview) = rayon::join(
            || summarize(&table),
            || preview(&table, self.config.preview_rows),
        );
        let report = Report { summary, preview };

        let export = if self.config.summary_only {
            None
        } else {
            Some(self.export(&table)?)
        };

        Ok(Conversion {
            source_name: blob.name().to_string(),
            table,
            report,
            export,
        })
    }

    fn export(&self, table: &Table) -> Result<ExportBlob, ConvertError> {
        let blob = export(table, &self.config)?;
        if self.config.verify {
            verify_round_trip(table, &blob)?;
        }
        Ok(blob)
    }

    fn request_download(&mut self) -> Option<Download> {
        let state = std::mem::replace(&mut self.state, State::Idle);
        let (next, download) = match state {
            State::Exported(conversion) | State::Downloaded(conversion) => {
                let download = conversion
                    .export
                    .clone()
                    .map(|blob| Download::new(&conversion.source_name, blob));
                (State::Downloaded(conversion), download)
            }
            State::Inspected(mut conversion) => match self.export(&conversion.table) {
                Ok(blob) => {
                    let download = Download::new(&conversion.source_name, blob.clone());
                    conversion.export = Some(blob);
                    (State::Downloaded(conversion), Some(download))
                }
                Err(e) => (
                    State::Failed(Failure {
                        source_name: conversion.source_name.clone(),
                        message: e.user_message(),
                    }),
                    None,
                ),
            },
            other @ (State::Idle | State::Failed(_)) => {
                warn!(stage = %stage_of(&other), "download requested with nothing to download");
                (other, None)
            }
        };
        self.state = next;
        if download.is_some() {
            info!(stage = %Stage::Downloaded, "download ready");
        }
        download
    }

    fn enter(&mut self, next: State) {
        let from = self.stage();
        self.state = next;
        match &self.state {
            State::Failed(failure) => warn!(%from, source = %failure.source_name, "{}", failure),
            _ => info!(%from, to = %self.stage(), "session transition"),
        }
    }
}

fn stage_of(state: &State) -> Stage {
    match state {
        State::Idle => Stage::Idle,
        State::Inspected(_) => Stage::Inspected,
        State::Exported(_) => Stage::Exported,
        State::Downloaded(_) => Stage::Downloaded,
        State::Failed(_) => Stage::Failed,
    }
}
