//! File writer for report output.

use super::{Report, ReportSink, SinkError, WriteMode};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::info;

/// File writer for reports
#[derive(Debug, Clone)]
pub struct FileWriter {
    /// Output directory
    output_dir: PathBuf,
    /// Written files log
    written_files: Arc<RwLock<Vec<WrittenFile>>>,
}

/// Record of a written file
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenFile {
    /// File path
    pub path: PathBuf,
    /// Report ID
    pub report_id: String,
    /// Bytes written by this call
    pub size: usize,
    /// Written timestamp
    pub written_at: String,
}

impl FileWriter {
    /// Create a new file writer, creating the directory if needed
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, SinkError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir).map_err(|source| SinkError::Io {
            path: output_dir.clone(),
            source,
        })?;

        Ok(Self {
            output_dir,
            written_files: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Target path of a report: `<output_dir>/<report_id>.<ext>`
    pub fn path_for(&self, report: &Report) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", report.report_id, report.report_type.extension()))
    }

    /// Write a report to file
    pub fn write(&self, report: &Report) -> Result<PathBuf, SinkError> {
        let path = self.path_for(report);
        let io_err = |source| SinkError::Io {
            path: path.clone(),
            source,
        };

        let mut file = match report.mode {
            WriteMode::Append => OpenOptions::new().create(true).append(true).open(&path),
            WriteMode::Overwrite => OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path),
        }
        .map_err(io_err)?;
        file.write_all(report.content.as_bytes()).map_err(io_err)?;

        let written = WrittenFile {
            path: path.clone(),
            report_id: report.report_id.clone(),
            size: report.content.len(),
            written_at: chrono::Utc::now().to_rfc3339(),
        };
        self.written_files
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(written);

        info!(
            path = %path.display(),
            report_id = %report.report_id,
            size = report.content.len(),
            mode = ?report.mode,
            "Report written to file"
        );

        Ok(path)
    }

    /// Get list of written files
    pub fn get_written_files(&self) -> Vec<WrittenFile> {
        self.written_files
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Get output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl ReportSink for FileWriter {
    fn send(&self, report: &Report) -> Result<PathBuf, SinkError> {
        self.write(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report_sink::ReportFormat;

    fn report(mode: WriteMode, content: &str) -> Report {
        Report {
            report_id: "KTB_2026-10-19".to_string(),
            title: "Key Tenor Buckets".to_string(),
            report_type: ReportFormat::Html,
            mode,
            content: content.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_append_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path()).unwrap();

        let path = writer.write(&report(WriteMode::Append, "<div>USD</div>")).unwrap();
        writer.write(&report(WriteMode::Append, "<div>KRW</div>")).unwrap();

        assert_eq!(path, dir.path().join("KTB_2026-10-19.html"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "<div>USD</div><div>KRW</div>"
        );
        assert_eq!(writer.get_written_files().len(), 2);
    }

    #[test]
    fn test_overwrite_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path()).unwrap();

        writer.write(&report(WriteMode::Overwrite, "first")).unwrap();
        let path = writer.send(&report(WriteMode::Overwrite, "second")).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_new_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("charts/daily");
        let writer = FileWriter::new(&nested).unwrap();
        assert!(writer.output_dir().is_dir());
    }
}
