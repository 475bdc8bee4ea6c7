//! # Upstream Systems
//!
//! Input adapters for the key tenor batch.
//!
//! ## Modules
//!
//! - [`trade_source`]: CSV trade blotter and latest-snapshot selection
//! - [`market_data_provider`]: Bloomberg-style reference data provider and
//!   the concurrent resolver that freezes lookups into a
//!   [`ktb_core::MarketSnapshot`]

pub mod market_data_provider;
pub mod trade_source;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::market_data_provider::{
        requests_for, BloombergSim, MarketDataError, MarketDataProvider, MarketDataRequest,
        MarketDataResolver, RequestKind, Resolution,
    };
    pub use crate::trade_source::{CsvBlotter, TradeSource, TradeSourceError};
}
