//! Per-trade risk errors.
//!
//! None of these abort a batch: the engine records the failing trade in
//! [`crate::RiskRun::skipped`] and carries on with the rest.

use ktb_core::{DateError, SolverError, TradeError};
use thiserror::Error;

/// Reasons a trade could not contribute to the bucketed exposure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// A duration lookup returned nothing.
    #[error("Market data unavailable: {ticker} {field}")]
    MissingMarketData {
        /// Instrument ticker
        ticker: String,
        /// Requested field
        field: String,
    },

    /// No usable FX multiplier for the trade currency.
    #[error("FX rate unavailable for {currency}")]
    MissingFxRate {
        /// ISO currency code
        currency: String,
    },

    /// Swap priced at zero: the Macaulay formula divides by the yield.
    #[error("Degenerate yield for trade {trade_id}: price {price}")]
    DegenerateYield {
        /// Trade identifier
        trade_id: String,
        /// Offending trade price
        price: f64,
    },

    /// Maturity is not strictly after the evaluation date.
    #[error("Trade {trade_id} matured on {maturity} (as of {as_of})")]
    StaleMaturity {
        /// Trade identifier
        trade_id: String,
        /// Maturity date (ISO)
        maturity: String,
        /// Evaluation date (ISO)
        as_of: String,
    },

    /// The computed DV01 is NaN or infinite.
    #[error("Non-finite DV01 for trade {trade_id}")]
    NonFiniteDv01 {
        /// Trade identifier
        trade_id: String,
    },

    /// Record could not be turned into a typed trade.
    #[error("Invalid trade: {0}")]
    InvalidTrade(#[from] TradeError),

    /// Date arithmetic failed.
    #[error("Date error: {0}")]
    Date(#[from] DateError),

    /// Two-point decomposition could not be solved.
    #[error("Decomposition failed: {0}")]
    Solver(#[from] SolverError),
}

impl RiskError {
    /// Short category name used in run summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            RiskError::MissingMarketData { .. } => "missing_market_data",
            RiskError::MissingFxRate { .. } => "missing_fx_rate",
            RiskError::DegenerateYield { .. } => "degenerate_yield",
            RiskError::StaleMaturity { .. } => "stale_maturity",
            RiskError::NonFiniteDv01 { .. } => "non_finite_dv01",
            RiskError::InvalidTrade(_) => "invalid_trade",
            RiskError::Date(_) => "date_error",
            RiskError::Solver(_) => "solver_error",
        }
    }

    /// Whether the failure is a gap in external data rather than a bad trade.
    pub fn is_missing_external_data(&self) -> bool {
        matches!(
            self,
            RiskError::MissingMarketData { .. } | RiskError::MissingFxRate { .. }
        )
    }
}
