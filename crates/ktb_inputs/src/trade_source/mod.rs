//! Trade blotter sources.
//!
//! The desk drops a fresh blotter snapshot into a shared directory several
//! times a day; the batch reads the newest one.

mod csv_blotter;

pub use csv_blotter::{strip_lock_prefix, CsvBlotter, BLOTTER_HEADERS};

use std::path::PathBuf;

use ktb_core::TradeRecord;
use thiserror::Error;

/// Errors raised while locating or reading a blotter.
#[derive(Debug, Error)]
pub enum TradeSourceError {
    /// File system access failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The blotter is not valid CSV or lacks required columns.
    #[error("Malformed blotter {path}: {message}")]
    Malformed {
        /// Blotter path
        path: PathBuf,
        /// Reader message
        message: String,
    },

    /// No snapshot with the expected extension exists in the directory.
    #[error("No blotter snapshot in {dir}")]
    NoSnapshot {
        /// Directory searched
        dir: PathBuf,
    },
}

/// Trait for trade sources
pub trait TradeSource: Send + Sync {
    /// Human-readable description of where trades come from.
    fn describe(&self) -> String;

    /// Loads every readable trade record.
    ///
    /// Rows that cannot be parsed are skipped (and logged); only failures
    /// affecting the whole source are returned as errors.
    fn load(&self) -> Result<Vec<TradeRecord>, TradeSourceError>;
}
