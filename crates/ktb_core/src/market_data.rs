//! Market-data lookup seam.
//!
//! Risk computation never talks to a provider directly. Providers are
//! queried up front (see `ktb_inputs::market_data_provider`) and their
//! answers frozen into a [`MarketSnapshot`]; the risk layer reads that
//! snapshot through [`MarketDataLookup`].

use std::collections::BTreeMap;

/// Field carrying a futures contract's mid duration (years).
pub const FIELD_DUR_MID: &str = "DUR_MID";
/// Field carrying a bond's mid risk figure.
pub const FIELD_RISK_MID: &str = "RISK_MID";
/// Field carrying the last traded price (FX pairs).
pub const FIELD_PX_LAST: &str = "PX_LAST";

/// Read-only access to resolved market data.
///
/// Returns `None` when the value is unavailable; callers decide whether that
/// excludes a trade. Implementations must never default to zero.
pub trait MarketDataLookup {
    /// Value of `field` for `ticker`, if available.
    fn lookup(&self, ticker: &str, field: &str) -> Option<f64>;

    /// Last price of the `<base><quote> Curncy` pair, if available.
    fn fx_rate(&self, base: &str, quote: &str) -> Option<f64> {
        self.lookup(&fx_ticker(base, quote), FIELD_PX_LAST)
    }
}

/// Ticker of the FX pair quoting `quote` units per `base` unit.
///
/// ```
/// use ktb_core::market_data::fx_ticker;
///
/// assert_eq!(fx_ticker("USD", "KRW"), "USDKRW Curncy");
/// ```
pub fn fx_ticker(base: &str, quote: &str) -> String {
    format!("{}{} Curncy", base, quote)
}

/// Frozen (ticker, field) → value map.
///
/// Non-finite values are rejected on insert so a NaN from a provider reads
/// back as unavailable.
///
/// ```
/// use ktb_core::market_data::{MarketDataLookup, MarketSnapshot, FIELD_DUR_MID};
///
/// let snapshot = MarketSnapshot::new()
///     .with_value("TYZ6 COMDTY", FIELD_DUR_MID, 6.1)
///     .with_value("RXZ6 COMDTY", FIELD_DUR_MID, f64::NAN);
///
/// assert_eq!(snapshot.lookup("TYZ6 COMDTY", FIELD_DUR_MID), Some(6.1));
/// assert_eq!(snapshot.lookup("RXZ6 COMDTY", FIELD_DUR_MID), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketSnapshot {
    values: BTreeMap<(String, String), f64>,
}

impl MarketSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning `false` if it was rejected as non-finite.
    pub fn insert(&mut self, ticker: impl Into<String>, field: impl Into<String>, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.values.insert((ticker.into(), field.into()), value);
        true
    }

    /// Builder-style insert.
    pub fn with_value(mut self, ticker: impl Into<String>, field: impl Into<String>, value: f64) -> Self {
        self.insert(ticker, field, value);
        self
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the snapshot holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `((ticker, field), value)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&(String, String), &f64)> {
        self.values.iter()
    }
}

impl MarketDataLookup for MarketSnapshot {
    fn lookup(&self, ticker: &str, field: &str) -> Option<f64> {
        self.values
            .get(&(ticker.to_string(), field.to_string()))
            .copied()
    }
}
