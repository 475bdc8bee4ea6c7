//! Trade model.
//!
//! - [`TradeRecord`]: one raw blotter row, as loaded from the trade source
//! - [`Trade`]: a validated, typed member of the working set
//! - [`AssetType`]: the three supported instrument families
//! - [`FloatingPeriod`]: the reset regime of a swap's floating leg

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::market_data::{FIELD_DUR_MID, FIELD_RISK_MID};
use crate::types::Date;

/// Errors raised while turning a raw record into a [`Trade`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradeError {
    /// Asset type text is not one of the supported families.
    #[error("Unknown asset type: '{0}'")]
    UnknownAssetType(String),

    /// A field required for this asset type is empty.
    #[error("Trade {trade_id}: missing {field}")]
    MissingField {
        /// Trade identifier
        trade_id: String,
        /// Name of the missing field
        field: &'static str,
    },
}

/// Supported instrument families.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssetType {
    /// Interest rate swap (duration from the closed-form Macaulay formula)
    InterestRateSwap,
    /// Listed rate future (duration looked up as `<ISIN> COMDTY` / `DUR_MID`)
    Futures,
    /// Government bond (duration looked up as `<ISIN> GOVT` / `RISK_MID`)
    Bond,
}

impl AssetType {
    /// Blotter label for this asset type.
    ///
    /// ```
    /// use ktb_core::trade::AssetType;
    ///
    /// assert_eq!(AssetType::InterestRateSwap.label(), "Interest Rate Swap");
    /// assert_eq!("Futures".parse::<AssetType>().unwrap(), AssetType::Futures);
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            AssetType::InterestRateSwap => "Interest Rate Swap",
            AssetType::Futures => "Futures",
            AssetType::Bond => "Bond",
        }
    }

    /// Market-data ticker suffix for externally sourced durations.
    pub fn ticker_suffix(&self) -> Option<&'static str> {
        match self {
            AssetType::InterestRateSwap => None,
            AssetType::Futures => Some("COMDTY"),
            AssetType::Bond => Some("GOVT"),
        }
    }

    /// Market-data field carrying the duration figure.
    pub fn duration_field(&self) -> Option<&'static str> {
        match self {
            AssetType::InterestRateSwap => None,
            AssetType::Futures => Some(FIELD_DUR_MID),
            AssetType::Bond => Some(FIELD_RISK_MID),
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AssetType {
    type Err = TradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalised.as_str() {
            "interestrateswap" | "irs" => Ok(AssetType::InterestRateSwap),
            "futures" | "future" => Ok(AssetType::Futures),
            "bond" => Ok(AssetType::Bond),
            _ => Err(TradeError::UnknownAssetType(s.to_string())),
        }
    }
}

/// Reset interval of a periodic floating leg.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResetTenor {
    /// 7-day reset
    Weekly,
    /// 91-day reset
    Quarterly,
    /// 182-day reset
    SemiAnnual,
}

impl ResetTenor {
    /// Length of the reset interval in days.
    pub fn days(&self) -> u32 {
        match self {
            ResetTenor::Weekly => 7,
            ResetTenor::Quarterly => 91,
            ResetTenor::SemiAnnual => 182,
        }
    }
}

/// Floating-leg reset regime of a swap.
///
/// ```
/// use ktb_core::trade::{FloatingPeriod, ResetTenor};
///
/// assert_eq!(FloatingPeriod::Continuous.days(), Some(1));
/// assert_eq!(FloatingPeriod::Periodic(ResetTenor::Quarterly).days(), Some(91));
/// assert_eq!(FloatingPeriod::Unknown.days(), None);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloatingPeriod {
    /// Compounded overnight index; resets daily.
    Continuous,
    /// Fixed reset interval.
    Periodic(ResetTenor),
    /// Benchmark text matched no known pattern (or was absent).
    #[default]
    Unknown,
}

impl FloatingPeriod {
    /// Reset length in days, if known.
    pub fn days(&self) -> Option<u32> {
        match self {
            FloatingPeriod::Continuous => Some(1),
            FloatingPeriod::Periodic(tenor) => Some(tenor.days()),
            FloatingPeriod::Unknown => None,
        }
    }
}

/// A raw blotter row.
///
/// Text fields are kept verbatim so the filter compares exactly what the
/// blotter contains. Dates are parsed at load time; a settlement date may be
/// absent for instruments that do not use it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeRecord {
    /// Trade identifier
    pub trade_id: String,
    /// ISIN or exchange ticker root
    pub isin: String,
    /// Asset type text ("Interest Rate Swap", "Futures", "Bond", ...)
    pub asset_type: String,
    /// Asset class text ("Rates", ...)
    pub asset_class: String,
    /// ISO currency code
    pub currency: String,
    /// Settlement (effective) date
    pub settlement_date: Option<Date>,
    /// Final maturity date
    pub maturity_date: Date,
    /// Signed notional
    pub notional: f64,
    /// Trade price, percent-of-par
    pub trade_price: Option<f64>,
    /// Free-text floating benchmark descriptor
    pub benchmark: Option<String>,
    /// Strategy / trade name used for grouping
    pub trade_name: String,
    /// Booking account
    pub account_name: String,
    /// Trader
    pub trader_name: String,
    /// Auto open/close flag, as text
    pub auto_open_close: String,
    /// Theme
    pub theme_name: String,
}

/// A validated member of the working set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trade {
    /// Trade identifier
    pub trade_id: String,
    /// ISIN or exchange ticker root
    pub isin: String,
    /// Instrument family
    pub asset_type: AssetType,
    /// ISO currency code
    pub currency: String,
    /// Settlement (effective) date
    pub settlement_date: Option<Date>,
    /// Final maturity date
    pub maturity_date: Date,
    /// Signed notional
    pub notional: f64,
    /// Trade price, percent-of-par
    pub trade_price: Option<f64>,
    /// Strategy / trade name used for grouping
    pub trade_name: String,
    /// Reset regime derived from the benchmark descriptor
    pub floating_period: FloatingPeriod,
}

impl Trade {
    /// Builds a typed trade from a raw record.
    ///
    /// # Errors
    ///
    /// - [`TradeError::UnknownAssetType`] if the asset type text is unsupported
    /// - [`TradeError::MissingField`] if a swap has no settlement date or price,
    ///   or a future has no settlement date
    pub fn from_record(
        record: &TradeRecord,
        floating_period: FloatingPeriod,
    ) -> Result<Self, TradeError> {
        let asset_type: AssetType = record.asset_type.parse()?;
        let missing = |field| TradeError::MissingField {
            trade_id: record.trade_id.clone(),
            field,
        };

        match asset_type {
            AssetType::InterestRateSwap => {
                record.settlement_date.ok_or_else(|| missing("settlement date"))?;
                record.trade_price.ok_or_else(|| missing("trade price"))?;
            }
            AssetType::Futures => {
                record.settlement_date.ok_or_else(|| missing("settlement date"))?;
            }
            AssetType::Bond => {}
        }

        Ok(Self {
            trade_id: record.trade_id.clone(),
            isin: record.isin.clone(),
            asset_type,
            currency: record.currency.clone(),
            settlement_date: record.settlement_date,
            maturity_date: record.maturity_date,
            notional: record.notional,
            trade_price: record.trade_price,
            trade_name: record.trade_name.clone(),
            floating_period,
        })
    }

    /// Market-data ticker for externally sourced durations (`None` for swaps).
    ///
    /// ```
    /// use ktb_core::trade::{AssetType, FloatingPeriod, Trade};
    /// use ktb_core::types::Date;
    ///
    /// let trade = Trade {
    ///     trade_id: "T1".into(),
    ///     isin: "TYZ6".into(),
    ///     asset_type: AssetType::Futures,
    ///     currency: "USD".into(),
    ///     settlement_date: Some(Date::from_ymd(2026, 12, 19).unwrap()),
    ///     maturity_date: Date::from_ymd(2026, 12, 19).unwrap(),
    ///     notional: 10.0,
    ///     trade_price: None,
    ///     trade_name: "UST curve".into(),
    ///     floating_period: FloatingPeriod::Unknown,
    /// };
    /// assert_eq!(trade.ticker().as_deref(), Some("TYZ6 COMDTY"));
    /// ```
    pub fn ticker(&self) -> Option<String> {
        self.asset_type
            .ticker_suffix()
            .map(|suffix| format!("{} {}", self.isin, suffix))
    }

    /// Whether the trade still has risk on `as_of`.
    pub fn is_live(&self, as_of: Date) -> bool {
        self.maturity_date > as_of
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(asset_type: &str) -> TradeRecord {
        TradeRecord {
            trade_id: "T001".to_string(),
            isin: "US912828XX".to_string(),
            asset_type: asset_type.to_string(),
            asset_class: "Rates".to_string(),
            currency: "USD".to_string(),
            settlement_date: Some(Date::from_ymd(2025, 1, 15).unwrap()),
            maturity_date: Date::from_ymd(2030, 1, 15).unwrap(),
            notional: -10_000_000.0,
            trade_price: Some(3.25),
            benchmark: Some("USD-SOFR-COMPOUND".to_string()),
            trade_name: "USD 5Y receiver".to_string(),
            account_name: "Main".to_string(),
            trader_name: "bob".to_string(),
            auto_open_close: "True".to_string(),
            theme_name: "Rates RV".to_string(),
        }
    }

    #[test]
    fn test_asset_type_parse_variants() {
        assert_eq!(
            "Interest Rate Swap".parse::<AssetType>().unwrap(),
            AssetType::InterestRateSwap
        );
        assert_eq!("  bond ".parse::<AssetType>().unwrap(), AssetType::Bond);
        assert!(matches!(
            "Equity".parse::<AssetType>(),
            Err(TradeError::UnknownAssetType(_))
        ));
    }

    #[test]
    fn test_from_record_swap() {
        let trade = Trade::from_record(&record("Interest Rate Swap"), FloatingPeriod::Continuous)
            .unwrap();
        assert_eq!(trade.asset_type, AssetType::InterestRateSwap);
        assert_eq!(trade.floating_period, FloatingPeriod::Continuous);
        assert!(trade.ticker().is_none());
    }

    #[test]
    fn test_from_record_swap_requires_price() {
        let mut raw = record("Interest Rate Swap");
        raw.trade_price = None;
        let err = Trade::from_record(&raw, FloatingPeriod::Unknown).unwrap_err();
        assert!(err.to_string().contains("trade price"));
    }

    #[test]
    fn test_from_record_bond_without_settlement() {
        let mut raw = record("Bond");
        raw.settlement_date = None;
        let trade = Trade::from_record(&raw, FloatingPeriod::Unknown).unwrap();
        assert_eq!(trade.ticker().as_deref(), Some("US912828XX GOVT"));
    }

    #[test]
    fn test_is_live_is_strict() {
        let trade = Trade::from_record(&record("Bond"), FloatingPeriod::Unknown).unwrap();
        assert!(trade.is_live(Date::from_ymd(2030, 1, 14).unwrap()));
        assert!(!trade.is_live(Date::from_ymd(2030, 1, 15).unwrap()));
    }
}
