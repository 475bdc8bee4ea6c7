//! Error types for structured error handling.
//!
//! This module provides:
//! - `DateError`: Errors from date construction and parsing
//! - `SolverError`: Errors from the linear solver

use thiserror::Error;

/// Date-related errors.
///
/// # Variants
/// - `InvalidDate`: Invalid date components (e.g., February 30th)
/// - `ParseError`: Failed to parse date string
/// - `OutOfRange`: Date arithmetic left the representable range
///
/// # Examples
/// ```
/// use ktb_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    #[error("Date parse error: {0}")]
    ParseError(String),

    /// Shifting a date by a number of days overflowed the calendar.
    #[error("Date {date} shifted by {days} days is out of range")]
    OutOfRange {
        /// ISO representation of the starting date
        date: String,
        /// Requested shift in days
        days: i64,
    },
}

/// Linear solver errors.
///
/// # Examples
/// ```
/// use ktb_core::types::SolverError;
///
/// let err = SolverError::SingularMatrix { determinant: 0.0 };
/// assert!(format!("{}", err).contains("singular"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Matrix determinant is zero (or numerically indistinguishable from zero).
    #[error("Matrix is singular (determinant = {determinant})")]
    SingularMatrix {
        /// The computed determinant
        determinant: f64,
    },

    /// A coefficient or right-hand side value is NaN or infinite.
    #[error("Non-finite input: {0}")]
    NonFiniteInput(String),
}
