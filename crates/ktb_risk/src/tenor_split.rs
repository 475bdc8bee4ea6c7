//! Forward/contract time spans and the two-point DV01 decomposition.
//!
//! A trade's DV01 is split into two synthetic sensitivities, one anchored at
//! the forward start and one at the end of the contract span, such that
//!
//! ```text
//! d_contract + d_forward     = DV01
//! r * d_contract + d_forward = 0        r = forward_days / contract_days
//! ```

use ktb_core::math::linear::solve_2x2;
use ktb_core::types::time::DAYS_PER_YEAR;
use ktb_core::{AssetType, Date, FloatingPeriod, Trade, TradeError};

use crate::error::RiskError;

/// Day counts that anchor a trade's decomposition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TimeSplit {
    /// Days from the evaluation date to the forward start
    pub forward_days: i64,
    /// Days spanned by the contract leg
    pub contract_days: i64,
    /// Settlement date after any clamping onto the evaluation date
    pub effective_settlement: Option<Date>,
}

impl TimeSplit {
    /// `forward_days / contract_days`, or `None` when the contract span is empty.
    pub fn ratio(&self) -> Option<f64> {
        (self.contract_days != 0).then(|| self.forward_days as f64 / self.contract_days as f64)
    }

    /// Whether the split collapses to a single point.
    ///
    /// True whenever the forward start is not strictly before the contract
    /// end, which covers `r = 1` and a periodic swap inside its final fixing
    /// period.
    pub fn is_degenerate(&self) -> bool {
        self.forward_days >= self.contract_days
    }
}

fn settlement_of(trade: &Trade) -> Result<Date, TradeError> {
    trade.settlement_date.ok_or_else(|| TradeError::MissingField {
        trade_id: trade.trade_id.clone(),
        field: "settlement date",
    })
}

/// Computes the [`TimeSplit`] for a live trade.
///
/// `raw_duration` is the externally sourced duration in years, before any
/// day-count scaling; futures need it to size their contract leg.
///
/// # Errors
///
/// - [`RiskError::InvalidTrade`] if a swap or future lacks a settlement date
/// - [`RiskError::MissingMarketData`] if a future has no raw duration
pub fn time_split(
    trade: &Trade,
    as_of: Date,
    raw_duration: Option<f64>,
) -> Result<TimeSplit, RiskError> {
    let maturity = trade.maturity_date;

    let split = match trade.asset_type {
        AssetType::InterestRateSwap => {
            let settlement = settlement_of(trade)?;
            match trade.floating_period {
                FloatingPeriod::Periodic(tenor) if settlement < as_of => {
                    let period = i64::from(tenor.days());
                    let remaining = maturity - as_of;
                    let intervals = remaining.div_euclid(period);
                    let new_fixing = maturity.add_days(-intervals * period)?;
                    TimeSplit {
                        forward_days: new_fixing - as_of,
                        contract_days: maturity - new_fixing,
                        effective_settlement: Some(settlement),
                    }
                }
                FloatingPeriod::Periodic(_) => TimeSplit {
                    forward_days: settlement - as_of,
                    contract_days: maturity - as_of,
                    effective_settlement: Some(settlement),
                },
                FloatingPeriod::Continuous | FloatingPeriod::Unknown => {
                    let settlement = settlement.clamp_to(as_of);
                    TimeSplit {
                        forward_days: settlement - as_of,
                        contract_days: maturity - as_of,
                        effective_settlement: Some(settlement),
                    }
                }
            }
        }
        AssetType::Futures => {
            let settlement = settlement_of(trade)?.clamp_to(as_of);
            let years = raw_duration.ok_or_else(|| RiskError::MissingMarketData {
                ticker: trade.ticker().unwrap_or_default(),
                field: trade.asset_type.duration_field().unwrap_or_default().to_string(),
            })?;
            let forward_days = settlement - as_of;
            TimeSplit {
                forward_days,
                contract_days: forward_days + (years * DAYS_PER_YEAR).round() as i64,
                effective_settlement: Some(settlement),
            }
        }
        AssetType::Bond => TimeSplit {
            forward_days: 0,
            contract_days: maturity - as_of,
            effective_settlement: trade.settlement_date,
        },
    };

    Ok(split)
}

/// One synthetic sensitivity.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TenorLeg {
    /// Day count the sensitivity is anchored at
    pub days: i64,
    /// DV01 carried by this leg
    pub dv01: f64,
}

/// Result of splitting a trade's DV01.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Decomposition {
    /// Forward and contract legs solved from the 2×2 system.
    TwoPoint {
        /// Leg anchored at `contract_days`
        contract: TenorLeg,
        /// Leg anchored at `forward_days`
        forward: TenorLeg,
    },
    /// Whole DV01 placed at the forward start.
    Point(TenorLeg),
}

impl Decomposition {
    /// Legs in emission order (contract first).
    pub fn legs(&self) -> Vec<TenorLeg> {
        match *self {
            Decomposition::TwoPoint { contract, forward } => vec![contract, forward],
            Decomposition::Point(leg) => vec![leg],
        }
    }

    /// Sum of the legs' DV01.
    pub fn total(&self) -> f64 {
        self.legs().iter().map(|leg| leg.dv01).sum()
    }
}

/// Splits `dv01` across the anchors of `split`.
///
/// ```
/// use ktb_risk::{decompose, Decomposition, TimeSplit};
///
/// let split = TimeSplit { forward_days: 36, contract_days: 364, effective_settlement: None };
/// match decompose(&split, 100.0).unwrap() {
///     Decomposition::TwoPoint { contract, forward } => {
///         assert_eq!((contract.days, forward.days), (364, 36));
///         assert!((contract.dv01 + forward.dv01 - 100.0).abs() < 1e-9);
///     }
///     Decomposition::Point(_) => unreachable!(),
/// }
/// ```
///
/// # Errors
///
/// [`RiskError::Solver`] if the system is singular, which cannot happen for
/// a non-degenerate split with a finite DV01.
pub fn decompose(split: &TimeSplit, dv01: f64) -> Result<Decomposition, RiskError> {
    let ratio = match split.ratio() {
        Some(r) if !split.is_degenerate() => r,
        _ => {
            return Ok(Decomposition::Point(TenorLeg {
                days: split.forward_days,
                dv01,
            }))
        }
    };

    let [d_contract, d_forward] = solve_2x2([[1.0, 1.0], [ratio, 1.0]], [dv01, 0.0])?;
    Ok(Decomposition::TwoPoint {
        contract: TenorLeg {
            days: split.contract_days,
            dv01: d_contract,
        },
        forward: TenorLeg {
            days: split.forward_days,
            dv01: d_forward,
        },
    })
}
