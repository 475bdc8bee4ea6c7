//! Trade durations and DV01.
//!
//! Swaps use a closed-form Macaulay approximation on the traded rate.
//! Futures and bonds take their duration from market data and scale it by
//! [`DAY_COUNT_SCALE`].

use ktb_core::types::time::DAYS_PER_YEAR;
use ktb_core::{AssetType, MarketDataLookup, Trade, TradeError};

use crate::error::RiskError;
use crate::tenor_split::TimeSplit;

/// Multiplier applied to externally sourced durations.
pub const DAY_COUNT_SCALE: f64 = 365.0;

/// Macaulay duration of a par instrument.
///
/// `y` is the per-period yield, `m` the number of periods per year and `n`
/// the number of remaining periods:
///
/// ```text
/// D = (1 + y) / (m·y) · (1 - (1 + y)^(-n))
/// ```
///
/// Returns `None` when `m·y` is zero or any input is non-finite.
///
/// ```
/// use ktb_risk::macaulay_duration;
///
/// let d = macaulay_duration(0.03, 2.0, 10.0).unwrap();
/// assert!((d - 4.393054460939555).abs() < 1e-12);
/// assert!(macaulay_duration(0.0, 2.0, 10.0).is_none());
/// ```
pub fn macaulay_duration(y: f64, m: f64, n: f64) -> Option<f64> {
    let denominator = m * y;
    if !(y.is_finite() && m.is_finite() && n.is_finite()) || denominator == 0.0 {
        return None;
    }
    Some((1.0 + y) / denominator * (1.0 - (1.0 + y).powf(-n)))
}

/// `-duration · notional / 10000 / fx`.
///
/// A short (negative) notional gives a positive DV01.
#[inline]
pub fn dv01(duration: f64, notional: f64, fx: f64) -> f64 {
    -duration * notional / 10_000.0 / fx
}

/// Looks up the raw (unscaled) external duration of a future or bond.
///
/// Swaps have no external duration and return `Ok(None)`.
///
/// # Errors
///
/// [`RiskError::MissingMarketData`] if the lookup has no value.
pub fn lookup_duration<M>(trade: &Trade, market: &M) -> Result<Option<f64>, RiskError>
where
    M: MarketDataLookup + ?Sized,
{
    let (Some(ticker), Some(field)) = (trade.ticker(), trade.asset_type.duration_field()) else {
        return Ok(None);
    };
    match market.lookup(&ticker, field) {
        Some(value) => Ok(Some(value)),
        None => Err(RiskError::MissingMarketData {
            ticker,
            field: field.to_string(),
        }),
    }
}

/// Duration of a trade, in the units its DV01 is computed with.
///
/// For swaps the coupon frequency is 2 when at least one whole year separates
/// the effective settlement from maturity, otherwise 1.
///
/// # Errors
///
/// - [`RiskError::DegenerateYield`] for a swap priced at zero
/// - [`RiskError::MissingMarketData`] for a future or bond without `raw_duration`
/// - [`RiskError::InvalidTrade`] for a swap without price or settlement
pub fn trade_duration(
    trade: &Trade,
    split: &TimeSplit,
    raw_duration: Option<f64>,
) -> Result<f64, RiskError> {
    match trade.asset_type {
        AssetType::InterestRateSwap => {
            let missing = |field| TradeError::MissingField {
                trade_id: trade.trade_id.clone(),
                field,
            };
            let price = trade.trade_price.ok_or_else(|| missing("trade price"))?;
            let settlement = split
                .effective_settlement
                .ok_or_else(|| missing("settlement date"))?;

            let years = (trade.maturity_date - settlement) as f64 / DAYS_PER_YEAR;
            let freq = if years.trunc() >= 1.0 { 2.0 } else { 1.0 };
            let y = price / 100.0 / freq;

            macaulay_duration(y, freq, years * freq).ok_or_else(|| RiskError::DegenerateYield {
                trade_id: trade.trade_id.clone(),
                price,
            })
        }
        AssetType::Futures | AssetType::Bond => {
            let raw = raw_duration.ok_or_else(|| RiskError::MissingMarketData {
                ticker: trade.ticker().unwrap_or_default(),
                field: trade.asset_type.duration_field().unwrap_or_default().to_string(),
            })?;
            Ok(raw * DAY_COUNT_SCALE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ktb_core::{Date, FloatingPeriod, MarketSnapshot};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn swap(price: f64, settlement: Date, maturity: Date) -> Trade {
        Trade {
            trade_id: "S1".to_string(),
            isin: "SWAP".to_string(),
            asset_type: AssetType::InterestRateSwap,
            currency: "USD".to_string(),
            settlement_date: Some(settlement),
            maturity_date: maturity,
            notional: -10_000_000.0,
            trade_price: Some(price),
            trade_name: "USD 5y".to_string(),
            floating_period: FloatingPeriod::Continuous,
        }
    }

    fn split_from(settlement: Date) -> TimeSplit {
        TimeSplit {
            forward_days: 0,
            contract_days: 0,
            effective_settlement: Some(settlement),
        }
    }

    #[test]
    fn test_macaulay_reference_value() {
        // 1.03 / 0.06 * (1 - 1.03^-10)
        let d = macaulay_duration(0.03, 2.0, 10.0).unwrap();
        assert_relative_eq!(d, 4.393054460939555, epsilon = 1e-12);
    }

    #[test]
    fn test_macaulay_rejects_zero_yield() {
        assert!(macaulay_duration(0.0, 1.0, 5.0).is_none());
        assert!(macaulay_duration(f64::NAN, 1.0, 5.0).is_none());
    }

    #[test]
    fn test_dv01_sign_and_fx() {
        assert_relative_eq!(dv01(4.5, -10_000_000.0, 1.0), 4_500.0);
        assert_relative_eq!(dv01(4.5, 10_000_000.0, 1.0), -4_500.0);
        assert_relative_eq!(dv01(4.5, -10_000_000.0, 1_500.0), 3.0);
    }

    #[test]
    fn test_swap_duration_semi_annual() {
        // 1826 days / 365 = 5.0027 years, freq 2
        let settlement = date(2026, 1, 1);
        let trade = swap(3.5, settlement, date(2031, 1, 1));
        let d = trade_duration(&trade, &split_from(settlement), None).unwrap();

        let years = 1826.0 / 365.0;
        let expected = macaulay_duration(0.0175, 2.0, years * 2.0).unwrap();
        assert_relative_eq!(d, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_swap_duration_annual_under_one_year() {
        let settlement = date(2026, 1, 1);
        let trade = swap(4.0, settlement, date(2026, 10, 1));
        let d = trade_duration(&trade, &split_from(settlement), None).unwrap();

        let years = 273.0 / 365.0;
        let expected = macaulay_duration(0.04, 1.0, years).unwrap();
        assert_relative_eq!(d, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_swap_duration_uses_effective_settlement() {
        let trade = swap(3.0, date(2025, 1, 1), date(2026, 6, 1));
        let from_original = trade_duration(&trade, &split_from(date(2025, 1, 1)), None).unwrap();
        let from_clamped = trade_duration(&trade, &split_from(date(2026, 1, 1)), None).unwrap();
        assert!(from_clamped < from_original);
    }

    #[test]
    fn test_zero_price_is_degenerate_yield() {
        let settlement = date(2026, 1, 1);
        let trade = swap(0.0, settlement, date(2031, 1, 1));
        let err = trade_duration(&trade, &split_from(settlement), None).unwrap_err();
        assert_eq!(err.kind(), "degenerate_yield");
    }

    #[test]
    fn test_external_duration_is_scaled() {
        let trade = Trade {
            trade_id: "B1".to_string(),
            isin: "US91282CJL6".to_string(),
            asset_type: AssetType::Bond,
            currency: "USD".to_string(),
            settlement_date: None,
            maturity_date: date(2033, 11, 15),
            notional: 5_000_000.0,
            trade_price: None,
            trade_name: "UST 10y".to_string(),
            floating_period: FloatingPeriod::Unknown,
        };
        let market = MarketSnapshot::new().with_value("US91282CJL6 GOVT", "RISK_MID", 7.8);

        let raw = lookup_duration(&trade, &market).unwrap();
        assert_eq!(raw, Some(7.8));
        let d = trade_duration(&trade, &split_from(date(2026, 1, 1)), raw).unwrap();
        assert_relative_eq!(d, 7.8 * 365.0);

        let err = lookup_duration(&trade, &MarketSnapshot::new()).unwrap_err();
        assert!(err.is_missing_external_data());
    }

    #[test]
    fn test_swaps_need_no_lookup() {
        let trade = swap(3.0, date(2026, 1, 1), date(2030, 1, 1));
        assert_eq!(lookup_duration(&trade, &MarketSnapshot::new()).unwrap(), None);
    }
}
