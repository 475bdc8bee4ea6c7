//! Composition of the per-trade pipeline.
//!
//! ```text
//! TradeRecord ─ filter ─ classify ─ Trade ─ live? ─ fx ─ duration
//!             ─ time_split ─ dv01 ─ decompose ─ BucketAggregator
//! ```
//!
//! Each record is transformed independently; a failure on one record is
//! recorded in [`RiskRun::skipped`] and never aborts the run.

use std::collections::BTreeSet;

use ktb_core::{AssetType, Date, FloatingPeriod, MarketDataLookup, Trade, TradeRecord};
use tracing::{debug, info, warn};

use crate::aggregator::{BucketAggregator, BucketedRisk};
use crate::benchmark::classify_benchmark;
use crate::duration::{dv01, lookup_duration, trade_duration};
use crate::error::RiskError;
use crate::filter::{FilterRejection, FilterRules, TradeFilter};
use crate::fx::FxTable;
use crate::tenor_split::{decompose, time_split, Decomposition, TimeSplit};

/// Per-trade result.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TradeRisk {
    /// Trade identifier
    pub trade_id: String,
    /// Trade name used for grouping
    pub trade_name: String,
    /// ISO currency code
    pub currency: String,
    /// Instrument family
    pub asset_type: AssetType,
    /// Reset regime (swaps)
    pub floating_period: FloatingPeriod,
    /// FX multiplier applied
    pub fx: f64,
    /// Duration the DV01 was computed from
    pub duration: f64,
    /// Total DV01
    pub dv01: f64,
    /// Forward/contract spans
    pub split: TimeSplit,
    /// Legs fed to the aggregator
    pub decomposition: Decomposition,
}

/// A filtered-in record that did not make it into the aggregation.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedTrade {
    /// Trade identifier
    pub trade_id: String,
    /// Why it was skipped
    pub error: RiskError,
}

/// Record counts of a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunCounts {
    /// Records supplied
    pub records: usize,
    /// Records dropped by the filter
    pub rejected: usize,
    /// Records that failed during computation
    pub skipped: usize,
    /// Records that contributed to the aggregation
    pub priced: usize,
}

/// Output of [`RiskEngine::run`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RiskRun {
    /// Evaluation date
    pub as_of: Option<Date>,
    /// Priced trades in input order
    pub trades: Vec<TradeRisk>,
    /// Aggregated exposures
    pub risk: BucketedRisk,
    /// Trades that failed, in input order
    pub skipped: Vec<SkippedTrade>,
    /// Filter rejections as (trade id, rule)
    pub rejected: Vec<(String, FilterRejection)>,
    /// FX table the run used
    pub fx: Option<FxTable>,
}

impl RiskRun {
    /// Record counts.
    pub fn counts(&self) -> RunCounts {
        RunCounts {
            records: self.trades.len() + self.skipped.len() + self.rejected.len(),
            rejected: self.rejected.len(),
            skipped: self.skipped.len(),
            priced: self.trades.len(),
        }
    }

    /// Skipped trades whose failure was a market-data gap.
    pub fn missing_data(&self) -> impl Iterator<Item = &SkippedTrade> {
        self.skipped
            .iter()
            .filter(|s| s.error.is_missing_external_data())
    }
}

/// Pure risk pipeline for one evaluation date.
///
/// Holds no clock and performs no I/O: market data arrives through
/// [`MarketDataLookup`] and the evaluation date is fixed at construction.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    filter: TradeFilter,
    base_currency: String,
    as_of: Date,
    fx: Option<FxTable>,
}

impl RiskEngine {
    /// Creates an engine that resolves FX from market data at run time.
    pub fn new(rules: FilterRules, base_currency: impl Into<String>, as_of: Date) -> Self {
        Self {
            filter: TradeFilter::new(rules),
            base_currency: base_currency.into(),
            as_of,
            fx: None,
        }
    }

    /// Uses a pre-resolved FX table instead of reading market data.
    pub fn with_fx_table(mut self, fx: FxTable) -> Self {
        self.base_currency = fx.base().to_string();
        self.fx = Some(fx);
        self
    }

    /// Computes the risk of a single record that already passed the filter.
    ///
    /// # Errors
    ///
    /// Any [`RiskError`]; see the variants for the conditions.
    pub fn price_record<M>(
        &self,
        record: &TradeRecord,
        fx: &FxTable,
        market: &M,
    ) -> Result<TradeRisk, RiskError>
    where
        M: MarketDataLookup + ?Sized,
    {
        let period = classify_benchmark(record.benchmark.as_deref());
        let trade = Trade::from_record(record, period)?;

        if !trade.is_live(self.as_of) {
            return Err(RiskError::StaleMaturity {
                trade_id: trade.trade_id.clone(),
                maturity: trade.maturity_date.to_string(),
                as_of: self.as_of.to_string(),
            });
        }

        if trade.asset_type == AssetType::InterestRateSwap && period == FloatingPeriod::Unknown {
            warn!(
                trade_id = %trade.trade_id,
                benchmark = record.benchmark.as_deref().unwrap_or(""),
                "Unrecognised benchmark, treating reset as continuous"
            );
        }

        let rate = fx
            .rate(&trade.currency)
            .ok_or_else(|| RiskError::MissingFxRate {
                currency: trade.currency.clone(),
            })?;

        let raw_duration = lookup_duration(&trade, market)?;
        let split = time_split(&trade, self.as_of, raw_duration)?;
        let duration = trade_duration(&trade, &split, raw_duration)?;
        let total = dv01(duration, trade.notional, rate);
        if !total.is_finite() {
            return Err(RiskError::NonFiniteDv01 {
                trade_id: trade.trade_id.clone(),
            });
        }
        let decomposition = decompose(&split, total)?;

        debug!(
            trade_id = %trade.trade_id,
            asset_type = %trade.asset_type,
            forward_days = split.forward_days,
            contract_days = split.contract_days,
            duration,
            dv01 = total,
            "Priced trade"
        );

        Ok(TradeRisk {
            trade_id: trade.trade_id,
            trade_name: trade.trade_name,
            currency: trade.currency,
            asset_type: trade.asset_type,
            floating_period: trade.floating_period,
            fx: rate,
            duration,
            dv01: total,
            split,
            decomposition,
        })
    }

    /// Runs the pipeline over `records`.
    pub fn run<M>(&self, records: &[TradeRecord], market: &M) -> RiskRun
    where
        M: MarketDataLookup + ?Sized,
    {
        let mut accepted = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();
        for record in records {
            match self.filter.check(record) {
                Ok(()) => accepted.push(record),
                Err(reason) => {
                    debug!(trade_id = %record.trade_id, %reason, "Filtered out");
                    rejected.push((record.trade_id.clone(), reason));
                }
            }
        }

        let fx = match &self.fx {
            Some(table) => table.clone(),
            None => {
                let currencies: BTreeSet<&str> =
                    accepted.iter().map(|r| r.currency.as_str()).collect();
                FxTable::from_lookup(&self.base_currency, currencies, market)
            }
        };

        let mut aggregator = BucketAggregator::new();
        let mut trades = Vec::with_capacity(accepted.len());
        let mut skipped = Vec::new();

        for record in accepted {
            match self.price_record(record, &fx, market) {
                Ok(risk) => {
                    aggregator.add(&risk.currency, &risk.trade_name, &risk.decomposition);
                    trades.push(risk);
                }
                Err(error) => {
                    warn!(trade_id = %record.trade_id, kind = error.kind(), %error, "Skipped trade");
                    skipped.push(SkippedTrade {
                        trade_id: record.trade_id.clone(),
                        error,
                    });
                }
            }
        }

        let run = RiskRun {
            as_of: Some(self.as_of),
            trades,
            risk: aggregator.finish(),
            skipped,
            rejected,
            fx: Some(fx),
        };

        let counts = run.counts();
        info!(
            as_of = %self.as_of,
            records = counts.records,
            rejected = counts.rejected,
            skipped = counts.skipped,
            priced = counts.priced,
            "Risk run complete"
        );
        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ktb_core::MarketSnapshot;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn as_of() -> Date {
        date(2026, 1, 1)
    }

    fn record(id: &str, asset_type: &str, currency: &str) -> TradeRecord {
        TradeRecord {
            trade_id: id.to_string(),
            isin: format!("{id}ISIN"),
            asset_type: asset_type.to_string(),
            asset_class: "Rates".to_string(),
            currency: currency.to_string(),
            settlement_date: Some(date(2026, 7, 1)),
            maturity_date: date(2031, 7, 1),
            notional: -10_000_000.0,
            trade_price: Some(3.5),
            benchmark: Some("USD-SOFR-COMPOUND".to_string()),
            trade_name: "Curve".to_string(),
            account_name: "Main".to_string(),
            trader_name: "bob".to_string(),
            auto_open_close: "True".to_string(),
            theme_name: "Rates".to_string(),
        }
    }

    fn market() -> MarketSnapshot {
        MarketSnapshot::new()
            .with_value("USDKRW Curncy", "PX_LAST", 1400.0)
            .with_value("F1ISIN COMDTY", "DUR_MID", 6.0)
            .with_value("B1ISIN GOVT", "RISK_MID", 2.5)
    }

    fn engine() -> RiskEngine {
        RiskEngine::new(FilterRules::permissive(), "USD", as_of())
    }

    #[test]
    fn test_usd_swap_dv01_unscaled_by_fx() {
        let run = engine().run(&[record("S1", "Interest Rate Swap", "USD")], &market());
        assert_eq!(run.trades.len(), 1);

        let risk = &run.trades[0];
        assert_eq!(risk.fx, 1.0);
        assert_relative_eq!(risk.dv01, risk.duration * 10_000_000.0 / 10_000.0);
        assert_relative_eq!(run.risk.total_dv01("USD"), risk.dv01, epsilon = 1e-9);
    }

    #[test]
    fn test_non_base_currency_divided_by_fx() {
        let usd = engine().run(&[record("S1", "Interest Rate Swap", "USD")], &market());
        let krw = engine().run(&[record("S1", "Interest Rate Swap", "KRW")], &market());
        assert_relative_eq!(krw.trades[0].dv01 * 1400.0, usd.trades[0].dv01, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_fx_skips_trade() {
        let run = engine().run(&[record("S1", "Interest Rate Swap", "JPY")], &market());
        assert!(run.trades.is_empty());
        assert_eq!(run.skipped.len(), 1);
        assert_eq!(
            run.skipped[0].error,
            RiskError::MissingFxRate {
                currency: "JPY".to_string()
            }
        );
        assert_eq!(run.missing_data().count(), 1);
    }

    #[test]
    fn test_stale_maturity_is_skipped() {
        let mut stale = record("S1", "Interest Rate Swap", "USD");
        stale.maturity_date = as_of();
        let run = engine().run(&[stale], &market());
        assert_eq!(run.skipped[0].error.kind(), "stale_maturity");
    }

    #[test]
    fn test_futures_and_bonds_use_lookups() {
        let mut future = record("F1", "Futures", "USD");
        future.settlement_date = Some(date(2026, 3, 20));
        future.maturity_date = date(2026, 3, 20);
        future.notional = 10.0;
        let bond = record("B1", "Bond", "USD");
        let orphan = record("B2", "Bond", "USD");

        let run = engine().run(&[future, bond, orphan], &market());
        assert_eq!(run.trades.len(), 2);
        assert_eq!(run.skipped.len(), 1);
        assert_eq!(run.skipped[0].trade_id, "B2");

        let future = &run.trades[0];
        assert_relative_eq!(future.duration, 6.0 * 365.0);
        assert_eq!(future.split.forward_days, 78);
        assert_eq!(future.split.contract_days, 78 + 2190);

        let bond = &run.trades[1];
        assert_eq!(bond.split.forward_days, 0);
        assert_relative_eq!(bond.dv01, -2.5 * 365.0 * -10_000_000.0 / 10_000.0);
    }

    #[test]
    fn test_zero_price_swap_skipped() {
        let mut swap = record("S1", "Interest Rate Swap", "USD");
        swap.trade_price = Some(0.0);
        let run = engine().run(&[swap], &market());
        assert_eq!(run.skipped[0].error.kind(), "degenerate_yield");
    }

    #[test]
    fn test_filter_rejections_are_counted() {
        let rules = FilterRules {
            include_currencies: vec!["USD".to_string()],
            ..FilterRules::default()
        };
        let engine = RiskEngine::new(rules, "USD", as_of());
        let run = engine.run(
            &[
                record("S1", "Interest Rate Swap", "USD"),
                record("S2", "Interest Rate Swap", "KRW"),
                record("S3", "Equity", "USD"),
            ],
            &market(),
        );

        let counts = run.counts();
        assert_eq!(counts.records, 3);
        assert_eq!(counts.rejected, 1);
        assert_eq!(counts.skipped, 1);
        assert_eq!(counts.priced, 1);
        assert_eq!(run.rejected[0], ("S2".to_string(), FilterRejection::CurrencyNotIncluded));
    }

    #[test]
    fn test_preset_fx_table_bypasses_lookups() {
        let fx = FxTable::new("USD").with_rate("KRW", 1000.0);
        let engine = engine().with_fx_table(fx);
        let run = engine.run(&[record("S1", "Interest Rate Swap", "KRW")], &MarketSnapshot::new());
        assert_eq!(run.trades[0].fx, 1000.0);
    }

    #[test]
    fn test_run_is_idempotent() {
        let records = vec![
            record("S1", "Interest Rate Swap", "USD"),
            record("S2", "Interest Rate Swap", "KRW"),
            record("B1", "Bond", "USD"),
        ];
        let first = engine().run(&records, &market());
        let second = engine().run(&records, &market());
        assert_eq!(first, second);
    }
}
