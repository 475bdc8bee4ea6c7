//! Bloomberg-style reference data simulation.
//!
//! Serves `(ticker, field) → value` pairs from a fixture so batch runs are
//! reproducible without a terminal. Fixture files are CSV with a
//! `ticker,field,value` header:
//!
//! ```text
//! ticker,field,value
//! TYH6 COMDTY,DUR_MID,6.42
//! USDKRW Curncy,PX_LAST,1382.5
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::{MarketDataError, MarketDataProvider};

#[derive(Debug, Deserialize)]
struct FixtureRow {
    ticker: String,
    field: String,
    value: f64,
}

/// Bloomberg-style market data provider
#[derive(Debug, Clone, Default)]
pub struct BloombergSim {
    values: HashMap<(String, String), f64>,
    latency: Option<Duration>,
}

impl BloombergSim {
    /// Create an empty simulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value.
    pub fn with_value(mut self, ticker: impl Into<String>, field: impl Into<String>, value: f64) -> Self {
        self.insert(ticker, field, value);
        self
    }

    /// Adds or replaces a value.
    pub fn insert(&mut self, ticker: impl Into<String>, field: impl Into<String>, value: f64) {
        self.values.insert((ticker.into(), field.into()), value);
    }

    /// Delays every answer, emulating a slow terminal.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of fixture values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the fixture is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Loads a fixture from CSV text.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MarketDataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut sim = Self::new();
        for row in reader.deserialize::<FixtureRow>() {
            let row = row.map_err(|e| MarketDataError::Fixture(e.to_string()))?;
            sim.insert(row.ticker, row.field, row.value);
        }
        Ok(sim)
    }

    /// Loads a fixture file.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, MarketDataError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| MarketDataError::Fixture(format!("{}: {e}", path.display())))?;
        let sim = Self::from_reader(file)?;
        debug!(path = %path.display(), values = sim.len(), "Loaded market data fixture");
        Ok(sim)
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for BloombergSim {
    fn name(&self) -> &str {
        "bloomberg_sim"
    }

    async fn reference(&self, ticker: &str, field: &str) -> Result<f64, MarketDataError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.values
            .get(&(ticker.to_string(), field.to_string()))
            .copied()
            .ok_or_else(|| MarketDataError::Unavailable {
                ticker: ticker.to_string(),
                field: field.to_string(),
            })
    }
}
