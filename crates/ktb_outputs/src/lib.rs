//! # Downstream Systems
//!
//! Output sinks for the key tenor batch.
//!
//! ## Modules
//!
//! - [`chart`]: Plotly stacked-bar chart per currency with a net line
//! - [`export`]: CSV export of bucketed exposures
//! - [`report_sink`]: Report destinations (append-mode file writer)

pub mod chart;
pub mod export;
pub mod report_sink;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::chart::{daily_report_id, ChartRenderer, ChartStyle};
    pub use crate::export::{exposure_report, exposures_csv, EXPORT_HEADERS};
    pub use crate::report_sink::{FileWriter, Report, ReportFormat, ReportSink, SinkError, WriteMode};
}
