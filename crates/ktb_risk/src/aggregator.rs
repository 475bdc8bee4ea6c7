//! Re-aggregation of decomposed legs into key tenor buckets.
//!
//! Legs of the same trade name at the same day count are summed before
//! bucketing, then grouped by (currency, trade name, bucket) for the stacked
//! bars and by (currency, bucket) for the net line. All grouping goes through
//! ordered maps so output order is fixed: currency code, then bucket rank,
//! then trade name.

use std::collections::BTreeMap;

use crate::buckets::TenorBucket;
use crate::tenor_split::{Decomposition, TenorLeg};

/// A summed leg at one day count.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TenorPoint {
    /// ISO currency code
    pub currency: String,
    /// Trade name the legs were grouped under
    pub trade_name: String,
    /// Day count from the evaluation date
    pub days: i64,
    /// Bucket the day count falls in
    pub bucket: TenorBucket,
    /// Summed DV01
    pub dv01: f64,
}

/// DV01 of one trade name in one bucket.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BucketedExposure {
    /// ISO currency code
    pub currency: String,
    /// Trade name
    pub trade_name: String,
    /// Bucket
    pub bucket: TenorBucket,
    /// Summed DV01
    pub dv01: f64,
}

/// Net DV01 of a currency in one bucket.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NetExposure {
    /// ISO currency code
    pub currency: String,
    /// Bucket
    pub bucket: TenorBucket,
    /// Summed DV01 over all trade names
    pub dv01: f64,
}

/// Aggregated output of a run.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BucketedRisk {
    /// Summed legs ordered by currency, trade name, day count
    pub points: Vec<TenorPoint>,
    /// Per trade name exposures ordered by currency, bucket, trade name
    pub exposures: Vec<BucketedExposure>,
    /// Net exposures ordered by currency, bucket
    pub net: Vec<NetExposure>,
}

impl BucketedRisk {
    /// Whether nothing was aggregated.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Currencies present, in code order.
    pub fn currencies(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for net in &self.net {
            if out.last() != Some(&net.currency.as_str()) {
                out.push(&net.currency);
            }
        }
        out
    }

    /// Exposures of one currency.
    pub fn exposures_for<'a>(
        &'a self,
        currency: &'a str,
    ) -> impl Iterator<Item = &'a BucketedExposure> + 'a {
        self.exposures.iter().filter(move |e| e.currency == currency)
    }

    /// Net line of one currency.
    pub fn net_for<'a>(&'a self, currency: &'a str) -> impl Iterator<Item = &'a NetExposure> + 'a {
        self.net.iter().filter(move |n| n.currency == currency)
    }

    /// Total DV01 of one currency.
    pub fn total_dv01(&self, currency: &str) -> f64 {
        self.net_for(currency).map(|n| n.dv01).sum()
    }
}

/// Collects legs and produces a [`BucketedRisk`].
///
/// ```
/// use ktb_risk::{BucketAggregator, TenorLeg};
///
/// let mut agg = BucketAggregator::new();
/// agg.add_leg("KRW", "2s5s", TenorLeg { days: 730, dv01: -10.0 });
/// agg.add_leg("KRW", "2s5s", TenorLeg { days: 730, dv01: 4.0 });
/// agg.add_leg("KRW", "2s5s", TenorLeg { days: 1826, dv01: 8.0 });
///
/// let risk = agg.finish();
/// assert_eq!(risk.points.len(), 2);
/// assert_eq!(risk.points[0].dv01, -6.0);
/// assert_eq!(risk.exposures[0].bucket.label(), "2Y");
/// assert_eq!(risk.total_dv01("KRW"), 2.0);
/// ```
#[derive(Debug, Default, Clone)]
pub struct BucketAggregator {
    legs: BTreeMap<(String, String, i64), f64>,
}

impl BucketAggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one leg.
    pub fn add_leg(&mut self, currency: &str, trade_name: &str, leg: TenorLeg) {
        *self
            .legs
            .entry((currency.to_string(), trade_name.to_string(), leg.days))
            .or_insert(0.0) += leg.dv01;
    }

    /// Adds every leg of a decomposition.
    pub fn add(&mut self, currency: &str, trade_name: &str, decomposition: &Decomposition) {
        for leg in decomposition.legs() {
            self.add_leg(currency, trade_name, leg);
        }
    }

    /// Number of distinct (currency, trade name, day count) points so far.
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Whether no leg has been added.
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Buckets the summed points and builds both groupings.
    pub fn finish(self) -> BucketedRisk {
        let mut by_name: BTreeMap<(String, TenorBucket, String), f64> = BTreeMap::new();
        let mut by_bucket: BTreeMap<(String, TenorBucket), f64> = BTreeMap::new();
        let mut points = Vec::with_capacity(self.legs.len());

        for ((currency, trade_name, days), dv01) in self.legs {
            let bucket = TenorBucket::from_days(days);
            *by_name
                .entry((currency.clone(), bucket, trade_name.clone()))
                .or_insert(0.0) += dv01;
            *by_bucket.entry((currency.clone(), bucket)).or_insert(0.0) += dv01;
            points.push(TenorPoint {
                currency,
                trade_name,
                days,
                bucket,
                dv01,
            });
        }

        let exposures = by_name
            .into_iter()
            .map(|((currency, bucket, trade_name), dv01)| BucketedExposure {
                currency,
                trade_name,
                bucket,
                dv01,
            })
            .collect();
        let net = by_bucket
            .into_iter()
            .map(|((currency, bucket), dv01)| NetExposure {
                currency,
                bucket,
                dv01,
            })
            .collect();

        BucketedRisk {
            points,
            exposures,
            net,
        }
    }
}
