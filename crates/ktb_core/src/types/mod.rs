//! Core time and error types.
//!
//! This module provides:
//! - `time`: the [`Date`] wrapper with day-count arithmetic
//! - `error`: structured error types for date and solver operations
//!
//! # Re-exports
//!
//! - [`Date`] from `time`
//! - [`DateError`], [`SolverError`] from `error`

pub mod error;
pub mod time;

pub use error::{DateError, SolverError};
pub use time::{Date, DAYS_PER_YEAR};
