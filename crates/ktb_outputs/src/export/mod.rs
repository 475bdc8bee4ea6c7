//! CSV export of bucketed exposures.
//!
//! One row per (currency, bucket, trade name) followed, per currency, by the
//! net rows. Row order follows [`ktb_risk::BucketedRisk`], so the export is
//! byte-identical across runs on the same inputs.

use ktb_core::Date;
use ktb_risk::BucketedRisk;
use serde::Serialize;

use crate::report_sink::{Report, ReportFormat, SinkError, WriteMode};

/// Export column headers.
pub const EXPORT_HEADERS: [&str; 7] = ["as_of", "currency", "kind", "bucket", "rank", "trade_name", "dv01"];

#[derive(Debug, Serialize)]
struct ExposureRow<'a> {
    as_of: String,
    currency: &'a str,
    kind: &'static str,
    bucket: String,
    rank: u32,
    trade_name: &'a str,
    dv01: f64,
}

/// Encodes `risk` as CSV.
pub fn exposures_csv(risk: &BucketedRisk, as_of: Date) -> Result<String, SinkError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;
    let as_of = as_of.to_string();

    for currency in risk.currencies() {
        for exposure in risk.exposures_for(currency) {
            writer.serialize(ExposureRow {
                as_of: as_of.clone(),
                currency,
                kind: "trade",
                bucket: exposure.bucket.label(),
                rank: exposure.bucket.rank(),
                trade_name: &exposure.trade_name,
                dv01: exposure.dv01,
            })?;
        }
        for net in risk.net_for(currency) {
            writer.serialize(ExposureRow {
                as_of: as_of.clone(),
                currency,
                kind: "net",
                bucket: net.bucket.label(),
                rank: net.bucket.rank(),
                trade_name: "",
                dv01: net.dv01,
            })?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SinkError::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Overwrite-mode CSV report `KTB_<date>_exposures.csv`.
pub fn exposure_report(risk: &BucketedRisk, as_of: Date) -> Result<Report, SinkError> {
    Ok(Report {
        report_id: format!("KTB_{as_of}_exposures"),
        title: format!("Key tenor bucket exposures {as_of}"),
        report_type: ReportFormat::Csv,
        mode: WriteMode::Overwrite,
        content: exposures_csv(risk, as_of)?,
        generated_at: chrono::Utc::now().to_rfc3339(),
    })
}
