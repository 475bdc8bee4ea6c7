//! Report output destinations.

mod file_writer;

pub use file_writer::{FileWriter, WrittenFile};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by sinks and renderers.
#[derive(Debug, Error)]
pub enum SinkError {
    /// File system access failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Nothing to render for the requested currency.
    #[error("No exposures for {0}")]
    EmptyCurrency(String),
}

/// Report output destination trait
pub trait ReportSink: Send + Sync {
    /// Send a report, returning where it landed.
    fn send(&self, report: &Report) -> Result<PathBuf, SinkError>;
}

/// Report structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Report ID, also the file stem
    pub report_id: String,
    /// Report title
    pub title: String,
    /// Report type
    pub report_type: ReportFormat,
    /// How the content meets an existing file
    pub mode: WriteMode,
    /// Content
    pub content: String,
    /// Generated timestamp
    pub generated_at: String,
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    /// CSV format
    Csv,
    /// HTML format
    Html,
}

impl ReportFormat {
    /// Get file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Html => "html",
        }
    }

    /// Get MIME type
    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "text/csv",
            ReportFormat::Html => "text/html",
        }
    }
}

/// Write behaviour for an existing target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteMode {
    /// Add to the end (one chart per run accumulates in the day's file)
    Append,
    /// Replace the file
    Overwrite,
}
