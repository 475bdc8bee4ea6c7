//! Key tenor buckets.
//!
//! | Bucket | Days (inclusive upper bound) | Rank      |
//! |--------|------------------------------|-----------|
//! | 1W     | ≤ 7                          | 1         |
//! | 1M     | ≤ 30                         | 2         |
//! | 2M     | ≤ 60                         | 3         |
//! | 3M     | ≤ 91                         | 4         |
//! | 6M     | ≤ 182                        | 5         |
//! | 9M     | ≤ 273                        | 6         |
//! | nY     | ≤ 365·n                      | 6 + n     |

use std::fmt;

use ktb_core::types::time::DAYS_PER_YEAR;

/// A calendar bucket for a day count measured from the evaluation date.
///
/// Ordering follows the rank, so `9M < 1Y < 2Y < 10Y`.
///
/// ```
/// use ktb_risk::TenorBucket;
///
/// assert_eq!(TenorBucket::from_days(7).label(), "1W");
/// assert_eq!(TenorBucket::from_days(8).label(), "1M");
/// assert_eq!(TenorBucket::from_days(365).label(), "1Y");
/// assert_eq!(TenorBucket::from_days(366).label(), "2Y");
/// assert!(TenorBucket::from_days(273) < TenorBucket::from_days(274));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TenorBucket {
    /// Up to one week
    OneWeek,
    /// Up to one month
    OneMonth,
    /// Up to two months
    TwoMonths,
    /// Up to three months
    ThreeMonths,
    /// Up to six months
    SixMonths,
    /// Up to nine months
    NineMonths,
    /// `(365(n-1), 365n]` days
    Years(u32),
}

impl TenorBucket {
    /// Buckets a day count. Counts at or below zero land in 1W.
    pub fn from_days(days: i64) -> Self {
        match days {
            i64::MIN..=7 => TenorBucket::OneWeek,
            8..=30 => TenorBucket::OneMonth,
            31..=60 => TenorBucket::TwoMonths,
            61..=91 => TenorBucket::ThreeMonths,
            92..=182 => TenorBucket::SixMonths,
            183..=273 => TenorBucket::NineMonths,
            _ => {
                let years = (days as f64 / DAYS_PER_YEAR).ceil();
                TenorBucket::Years(years.min(u32::MAX as f64) as u32)
            }
        }
    }

    /// Sort rank: 1..6 for the short buckets, `6 + n` for `nY`.
    pub fn rank(&self) -> u32 {
        match self {
            TenorBucket::OneWeek => 1,
            TenorBucket::OneMonth => 2,
            TenorBucket::TwoMonths => 3,
            TenorBucket::ThreeMonths => 4,
            TenorBucket::SixMonths => 5,
            TenorBucket::NineMonths => 6,
            TenorBucket::Years(n) => 6 + n,
        }
    }

    /// Display label (`1W`, `3M`, `10Y`, ...).
    pub fn label(&self) -> String {
        match self {
            TenorBucket::OneWeek => "1W".to_string(),
            TenorBucket::OneMonth => "1M".to_string(),
            TenorBucket::TwoMonths => "2M".to_string(),
            TenorBucket::ThreeMonths => "3M".to_string(),
            TenorBucket::SixMonths => "6M".to_string(),
            TenorBucket::NineMonths => "9M".to_string(),
            TenorBucket::Years(n) => format!("{n}Y"),
        }
    }
}

impl fmt::Display for TenorBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TenorBucket {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}
