//! CSV trade blotter.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use ktb_core::{Date, TradeRecord};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{TradeSource, TradeSourceError};

/// Column headers the blotter export carries.
pub const BLOTTER_HEADERS: [&str; 15] = [
    "TradeID",
    "ISIN",
    "Asset Type",
    "Asset Class",
    "Currency Code",
    "Settlement Date",
    "Maturity Date",
    "Notional",
    "Trade Price",
    "Benchmark 2",
    "Trade Name",
    "Account Name",
    "Trader Name",
    "Auto Open Close",
    "Theme Name",
];

/// Office lock-file marker.
const LOCK_PREFIX: &str = "~$";

#[derive(Debug, Deserialize)]
struct BlotterRow {
    #[serde(rename = "TradeID")]
    trade_id: String,
    #[serde(rename = "ISIN")]
    isin: String,
    #[serde(rename = "Asset Type")]
    asset_type: String,
    #[serde(rename = "Asset Class")]
    asset_class: String,
    #[serde(rename = "Currency Code")]
    currency: String,
    #[serde(rename = "Settlement Date", default)]
    settlement_date: Option<String>,
    #[serde(rename = "Maturity Date")]
    maturity_date: String,
    #[serde(rename = "Notional")]
    notional: f64,
    #[serde(rename = "Trade Price", default)]
    trade_price: Option<f64>,
    #[serde(rename = "Benchmark 2", default)]
    benchmark: Option<String>,
    #[serde(rename = "Trade Name", default)]
    trade_name: String,
    #[serde(rename = "Account Name", default)]
    account_name: String,
    #[serde(rename = "Trader Name", default)]
    trader_name: String,
    #[serde(rename = "Auto Open Close", default)]
    auto_open_close: String,
    #[serde(rename = "Theme Name", default)]
    theme_name: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl BlotterRow {
    fn into_record(self) -> Result<TradeRecord, String> {
        let settlement_date = non_empty(self.settlement_date)
            .map(|s| Date::parse(s.trim()))
            .transpose()
            .map_err(|e| format!("settlement date: {e}"))?;
        let maturity_date =
            Date::parse(self.maturity_date.trim()).map_err(|e| format!("maturity date: {e}"))?;

        Ok(TradeRecord {
            trade_id: self.trade_id,
            isin: self.isin,
            asset_type: self.asset_type,
            asset_class: self.asset_class,
            currency: self.currency,
            settlement_date,
            maturity_date,
            notional: self.notional,
            trade_price: self.trade_price,
            benchmark: non_empty(self.benchmark),
            trade_name: self.trade_name,
            account_name: self.account_name,
            trader_name: self.trader_name,
            auto_open_close: self.auto_open_close,
            theme_name: self.theme_name,
        })
    }
}

/// Removes an office lock-file marker from a file name, pointing back at the
/// document it guards.
///
/// ```
/// use std::path::Path;
/// use ktb_inputs::trade_source::strip_lock_prefix;
///
/// assert_eq!(
///     strip_lock_prefix(Path::new("/trades/~$blotter.csv")),
///     Path::new("/trades/blotter.csv")
/// );
/// assert_eq!(strip_lock_prefix(Path::new("blotter.csv")), Path::new("blotter.csv"));
/// ```
pub fn strip_lock_prefix(path: &Path) -> PathBuf {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) if name.contains(LOCK_PREFIX) => path.with_file_name(name.replacen(LOCK_PREFIX, "", 1)),
        _ => path.to_path_buf(),
    }
}

/// A blotter snapshot stored as CSV.
#[derive(Debug, Clone)]
pub struct CsvBlotter {
    path: PathBuf,
}

impl CsvBlotter {
    /// Reads the blotter at `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Picks the most recently modified `.csv` file in `dir`.
    ///
    /// A lock file left behind by an open spreadsheet resolves to the
    /// document it locks.
    pub fn latest_in(dir: impl AsRef<Path>) -> Result<Self, TradeSourceError> {
        let dir = dir.as_ref();
        let io_err = |source| TradeSourceError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut latest: Option<(SystemTime, PathBuf)> = None;
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let path = entry.path();
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            let modified = entry.metadata().and_then(|m| m.modified()).map_err(io_err)?;
            if latest.as_ref().map_or(true, |(t, _)| modified > *t) {
                latest = Some((modified, path));
            }
        }

        let (_, path) = latest.ok_or_else(|| TradeSourceError::NoSnapshot {
            dir: dir.to_path_buf(),
        })?;
        let path = strip_lock_prefix(&path);
        info!(path = %path.display(), "Selected latest blotter snapshot");
        Ok(Self::from_path(path))
    }

    /// Blotter path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses blotter CSV from any reader.
    ///
    /// Rows that fail to deserialize or carry unparseable dates are skipped
    /// with a warning.
    pub fn parse<R: Read>(reader: R, origin: &Path) -> Result<Vec<TradeRecord>, TradeSourceError> {
        let malformed = |message: String| TradeSourceError::Malformed {
            path: origin.to_path_buf(),
            message,
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let headers = reader.headers().map_err(|e| malformed(e.to_string()))?.clone();
        for required in ["TradeID", "Asset Type", "Currency Code", "Maturity Date", "Notional"] {
            if !headers.iter().any(|h| h == required) {
                return Err(malformed(format!("missing column '{required}'")));
            }
        }

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<BlotterRow>().enumerate() {
            // Header is line 1.
            let line = index + 2;
            match row.map_err(|e| e.to_string()).and_then(BlotterRow::into_record) {
                Ok(record) => records.push(record),
                Err(message) => warn!(line, %message, "Skipping unreadable blotter row"),
            }
        }
        debug!(rows = records.len(), path = %origin.display(), "Parsed blotter");
        Ok(records)
    }
}

impl TradeSource for CsvBlotter {
    fn describe(&self) -> String {
        format!("CSV blotter {}", self.path.display())
    }

    fn load(&self) -> Result<Vec<TradeRecord>, TradeSourceError> {
        let file = File::open(&self.path).map_err(|source| TradeSourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        Self::parse(file, &self.path)
    }
}
