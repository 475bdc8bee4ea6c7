//! Market data providers.
//!
//! Providers answer point lookups for a (ticker, field) pair. They are only
//! ever called through [`MarketDataResolver`], which issues every lookup the
//! batch needs concurrently and freezes the answers into a
//! [`ktb_core::MarketSnapshot`].

mod bloomberg_sim;
mod resolver;

pub use bloomberg_sim::BloombergSim;
pub use resolver::{requests_for, MarketDataRequest, MarketDataResolver, RequestKind, Resolution};

use ktb_core::FIELD_PX_LAST;
use thiserror::Error;

/// Errors returned by providers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketDataError {
    /// The provider has no value for the key.
    #[error("Unavailable: {ticker} {field}")]
    Unavailable {
        /// Instrument ticker
        ticker: String,
        /// Requested field
        field: String,
    },

    /// The lookup did not answer in time.
    #[error("Timed out after {timeout_ms} ms: {ticker} {field}")]
    Timeout {
        /// Instrument ticker
        ticker: String,
        /// Requested field
        field: String,
        /// Configured timeout
        timeout_ms: u64,
    },

    /// Fixture data could not be read.
    #[error("Fixture error: {0}")]
    Fixture(String),
}

/// Trait for market data providers
#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Point reference value of `field` for `ticker`.
    async fn reference(&self, ticker: &str, field: &str) -> Result<f64, MarketDataError>;

    /// Last traded price of `ticker`.
    async fn last_price(&self, ticker: &str) -> Result<f64, MarketDataError> {
        self.reference(ticker, FIELD_PX_LAST).await
    }
}
