//! # ktb_core: Foundation Layer for Key Tenor Bucketing
//!
//! ## Layer 1 (Foundation) Role
//!
//! ktb_core is the bottom layer of the workspace, providing:
//! - Time types: [`Date`] with explicit day-count arithmetic (`types::time`)
//! - Error types: [`DateError`], [`SolverError`] (`types::error`)
//! - The trade model: [`TradeRecord`], [`Trade`], [`AssetType`], [`FloatingPeriod`] (`trade`)
//! - The market-data seam: [`MarketDataLookup`] and [`MarketSnapshot`] (`market_data`)
//! - A closed-form 2×2 linear solver (`math::linear`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other ktb_* crates, with minimal external dependencies:
//! - chrono: Date arithmetic
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional, `serde` feature)
//!
//! ## Usage Examples
//!
//! ```rust
//! use ktb_core::types::Date;
//! use ktb_core::math::linear::solve_2x2;
//!
//! let today = Date::from_ymd(2024, 1, 1).unwrap();
//! let maturity = Date::from_ymd(2024, 1, 11).unwrap();
//! assert_eq!(maturity - today, 10);
//!
//! let [x, y] = solve_2x2([[1.0, 1.0], [0.5, 1.0]], [10.0, 0.0]).unwrap();
//! assert!((x - 20.0).abs() < 1e-12);
//! assert!((y + 10.0).abs() < 1e-12);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod trade;
pub mod types;

pub use market_data::{MarketDataLookup, MarketSnapshot, FIELD_DUR_MID, FIELD_PX_LAST, FIELD_RISK_MID};
pub use trade::{AssetType, FloatingPeriod, ResetTenor, Trade, TradeError, TradeRecord};
pub use types::{Date, DateError, SolverError};
