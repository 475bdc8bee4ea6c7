//! Currency conversion factors.
//!
//! A trade's DV01 is divided by the multiplier of its currency. The base
//! currency is always 1; every other multiplier is the last price of
//! `<BASE><CCY> Curncy`.

use std::collections::BTreeMap;

use ktb_core::MarketDataLookup;
use tracing::warn;

/// Resolved currency → multiplier table.
///
/// ```
/// use ktb_core::MarketSnapshot;
/// use ktb_risk::FxTable;
///
/// let snapshot = MarketSnapshot::new().with_value("USDKRW Curncy", "PX_LAST", 1350.0);
/// let fx = FxTable::from_lookup("USD", ["USD", "KRW", "JPY"], &snapshot);
///
/// assert_eq!(fx.rate("USD"), Some(1.0));
/// assert_eq!(fx.rate("KRW"), Some(1350.0));
/// assert_eq!(fx.rate("JPY"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FxTable {
    base: String,
    rates: BTreeMap<String, f64>,
}

impl FxTable {
    /// Creates a table holding only the base currency.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            rates: BTreeMap::new(),
        }
    }

    /// Base currency code.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Sets the multiplier for `currency`.
    ///
    /// Returns `false` (and leaves the table unchanged) for the base currency
    /// or for a multiplier that is not a positive finite number.
    pub fn insert(&mut self, currency: impl Into<String>, rate: f64) -> bool {
        let currency = currency.into();
        if currency == self.base || !rate.is_finite() || rate <= 0.0 {
            return false;
        }
        self.rates.insert(currency, rate);
        true
    }

    /// Builder form of [`FxTable::insert`].
    pub fn with_rate(mut self, currency: impl Into<String>, rate: f64) -> Self {
        self.insert(currency, rate);
        self
    }

    /// Multiplier for `currency`, if known.
    pub fn rate(&self, currency: &str) -> Option<f64> {
        if currency == self.base {
            Some(1.0)
        } else {
            self.rates.get(currency).copied()
        }
    }

    /// Non-base currencies with a known multiplier, in code order.
    pub fn currencies(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(ccy, rate)| (ccy.as_str(), *rate))
    }

    /// Resolves multipliers for `currencies` from market data.
    ///
    /// A currency whose pair is unavailable (or quotes a non-positive price)
    /// is left out of the table, which later excludes its trades.
    pub fn from_lookup<'a, I, M>(base: &str, currencies: I, market: &M) -> Self
    where
        I: IntoIterator<Item = &'a str>,
        M: MarketDataLookup + ?Sized,
    {
        let mut table = Self::new(base);
        for currency in currencies {
            if currency == base || table.rates.contains_key(currency) {
                continue;
            }
            match market.fx_rate(base, currency) {
                Some(rate) if table.insert(currency, rate) => {}
                Some(rate) => warn!(currency, rate, "Rejected FX rate"),
                None => warn!(currency, "FX rate unavailable"),
            }
        }
        table
    }
}
