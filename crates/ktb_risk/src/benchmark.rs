//! Floating reset period classification.
//!
//! The blotter carries the floating leg as a free-text descriptor
//! (`KRW-CD-3M`, `USD-SOFR-COMPOUND`, `CNY-REPO-7D`, ...). The reset regime
//! is recovered by substring checks applied in a fixed order, so
//! `CNY-REPO-7D` is weekly even though it contains no `3` or `6`, and
//! `INR-MIBOR-OIS-COMPOUND` is continuous regardless of any digits.

use ktb_core::{FloatingPeriod, ResetTenor};

/// Maps a benchmark descriptor onto a [`FloatingPeriod`].
///
/// Checks, first match wins:
/// 1. contains `COMPOUND` or `CMP` → [`FloatingPeriod::Continuous`]
/// 2. contains `7D` → weekly
/// 3. contains `3` → quarterly
/// 4. contains `6` → semi-annual
///
/// Anything else, including a missing descriptor, is
/// [`FloatingPeriod::Unknown`].
///
/// ```
/// use ktb_core::{FloatingPeriod, ResetTenor};
/// use ktb_risk::classify_benchmark;
///
/// assert_eq!(classify_benchmark(Some("USD-SOFR-COMPOUND")), FloatingPeriod::Continuous);
/// assert_eq!(
///     classify_benchmark(Some("KRW-CD-3M")),
///     FloatingPeriod::Periodic(ResetTenor::Quarterly)
/// );
/// assert_eq!(classify_benchmark(None), FloatingPeriod::Unknown);
/// ```
pub fn classify_benchmark(benchmark: Option<&str>) -> FloatingPeriod {
    let Some(text) = benchmark else {
        return FloatingPeriod::Unknown;
    };

    if text.contains("COMPOUND") || text.contains("CMP") {
        FloatingPeriod::Continuous
    } else if text.contains("7D") {
        FloatingPeriod::Periodic(ResetTenor::Weekly)
    } else if text.contains('3') {
        FloatingPeriod::Periodic(ResetTenor::Quarterly)
    } else if text.contains('6') {
        FloatingPeriod::Periodic(ResetTenor::SemiAnnual)
    } else {
        FloatingPeriod::Unknown
    }
}
