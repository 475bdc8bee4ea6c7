//! # ktb_risk (Pricer Layer)
//!
//! Forward-starting DV01 decomposition and key tenor bucket aggregation.
//!
//! Every function in this crate is pure: the evaluation date is passed in
//! explicitly and market data arrives through
//! [`ktb_core::MarketDataLookup`]. Running the same records against the same
//! snapshot always yields the same [`RiskRun`].
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                ktb_risk (L2)                 │
//! ├──────────────────────────────────────────────┤
//! │  filter/      - TradeFilter, FilterRules     │
//! │  fx/          - FxTable (FX annotation)      │
//! │  benchmark/   - floating period classifier   │
//! │  duration/    - Macaulay & external duration │
//! │  tenor_split/ - TimeSplit, 2-point solve     │
//! │  buckets/     - TenorBucket boundaries       │
//! │  aggregator/  - BucketAggregator             │
//! │  engine/      - RiskEngine (composition)     │
//! └──────────────────────────────────────────────┘
//!          ↓
//! ┌──────────────────────────────────────────────┐
//! │                ktb_core (L1)                 │
//! │  Date, Trade, MarketDataLookup, solve_2x2    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use ktb_core::{Date, MarketSnapshot, TradeRecord};
//! use ktb_risk::{FilterRules, RiskEngine};
//!
//! let as_of = Date::from_ymd(2026, 1, 1).unwrap();
//! let record = TradeRecord {
//!     trade_id: "T1".into(),
//!     isin: "SWAP1".into(),
//!     asset_type: "Interest Rate Swap".into(),
//!     asset_class: "Rates".into(),
//!     currency: "USD".into(),
//!     settlement_date: Some(Date::from_ymd(2026, 7, 1).unwrap()),
//!     maturity_date: Date::from_ymd(2031, 7, 1).unwrap(),
//!     notional: -10_000_000.0,
//!     trade_price: Some(3.5),
//!     benchmark: Some("USD-SOFR-COMPOUND".into()),
//!     trade_name: "USD 6m5y receiver".into(),
//!     account_name: "Main".into(),
//!     trader_name: "bob".into(),
//!     auto_open_close: "True".into(),
//!     theme_name: "Curve".into(),
//! };
//!
//! let engine = RiskEngine::new(FilterRules::permissive(), "USD", as_of);
//! let run = engine.run(&[record], &MarketSnapshot::new());
//!
//! assert_eq!(run.trades.len(), 1);
//! let total: f64 = run.risk.net_for("USD").map(|n| n.dv01).sum();
//! assert!((total - run.trades[0].dv01).abs() < 1e-6);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod aggregator;
pub mod benchmark;
pub mod buckets;
pub mod duration;
pub mod engine;
pub mod error;
pub mod filter;
pub mod fx;
pub mod tenor_split;

pub use aggregator::{BucketAggregator, BucketedExposure, BucketedRisk, NetExposure, TenorPoint};
pub use benchmark::classify_benchmark;
pub use buckets::TenorBucket;
pub use duration::{dv01, lookup_duration, macaulay_duration, trade_duration, DAY_COUNT_SCALE};
pub use engine::{RiskEngine, RiskRun, RunCounts, SkippedTrade, TradeRisk};
pub use error::RiskError;
pub use filter::{FilterRejection, FilterRules, TradeFilter};
pub use fx::FxTable;
pub use tenor_split::{decompose, time_split, Decomposition, TenorLeg, TimeSplit};
