//! Concurrent market data resolution.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use ktb_core::market_data::fx_ticker;
use ktb_core::{AssetType, MarketSnapshot, TradeRecord, FIELD_PX_LAST};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::{MarketDataError, MarketDataProvider};

/// Which provider call answers a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequestKind {
    /// Point reference value of a field
    Reference,
    /// Most recent traded price
    LastPrice,
}

/// One (ticker, field) lookup.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarketDataRequest {
    /// Instrument ticker
    pub ticker: String,
    /// Requested field
    pub field: String,
    /// Provider call used
    pub kind: RequestKind,
}

impl MarketDataRequest {
    /// Creates a reference-value request.
    pub fn new(ticker: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            field: field.into(),
            kind: RequestKind::Reference,
        }
    }

    /// Last price of the `<base><quote> Curncy` pair.
    pub fn fx(base: &str, quote: &str) -> Self {
        Self {
            ticker: fx_ticker(base, quote),
            field: FIELD_PX_LAST.to_string(),
            kind: RequestKind::LastPrice,
        }
    }

    fn unavailable(&self) -> MarketDataError {
        MarketDataError::Unavailable {
            ticker: self.ticker.clone(),
            field: self.field.clone(),
        }
    }
}

/// Distinct lookups needed to price `records`.
///
/// One duration lookup per future or bond ticker and one FX lookup per
/// non-base currency. Rows with an unrecognised asset type need nothing.
pub fn requests_for<'a, I>(records: I, base_currency: &str) -> BTreeSet<MarketDataRequest>
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    let mut requests = BTreeSet::new();
    for record in records {
        if let Ok(asset_type) = record.asset_type.parse::<AssetType>() {
            if let (Some(suffix), Some(field)) = (asset_type.ticker_suffix(), asset_type.duration_field()) {
                requests.insert(MarketDataRequest::new(format!("{} {}", record.isin, suffix), field));
            }
        }
        if record.currency != base_currency {
            requests.insert(MarketDataRequest::fx(base_currency, &record.currency));
        }
    }
    requests
}

/// Outcome of resolving a set of requests.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Values that were obtained
    pub snapshot: MarketSnapshot,
    /// Lookups that failed, ordered by request
    pub failures: Vec<(MarketDataRequest, MarketDataError)>,
}

async fn fetch(
    provider: &dyn MarketDataProvider,
    request: &MarketDataRequest,
    timeout: Duration,
) -> Result<f64, MarketDataError> {
    let lookup = async {
        match request.kind {
            RequestKind::Reference => provider.reference(&request.ticker, &request.field).await,
            RequestKind::LastPrice => provider.last_price(&request.ticker).await,
        }
    };
    match tokio::time::timeout(timeout, lookup).await {
        Ok(result) => result,
        Err(_) => Err(MarketDataError::Timeout {
            ticker: request.ticker.clone(),
            field: request.field.clone(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

/// Issues lookups concurrently, each bounded by a timeout.
#[derive(Clone)]
pub struct MarketDataResolver {
    provider: Arc<dyn MarketDataProvider>,
    timeout: Duration,
}

impl MarketDataResolver {
    /// Creates a resolver over `provider`.
    pub fn new(provider: Arc<dyn MarketDataProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Resolves every request.
    ///
    /// A failed, timed-out or panicking lookup only marks its own key
    /// unavailable; every request ends up in the snapshot or in
    /// [`Resolution::failures`].
    pub async fn resolve<I>(&self, requests: I) -> Resolution
    where
        I: IntoIterator<Item = MarketDataRequest>,
    {
        let mut tasks = JoinSet::new();
        for request in requests {
            let provider = Arc::clone(&self.provider);
            let timeout = self.timeout;
            tasks.spawn(async move {
                // A provider panic surfaces as a JoinError on the inner task.
                let lookup_request = request.clone();
                let lookup = tokio::spawn(async move {
                    fetch(provider.as_ref(), &lookup_request, timeout).await
                });
                let result = match lookup.await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(ticker = %request.ticker, field = %request.field, error = %e, "Lookup task failed");
                        Err(request.unavailable())
                    }
                };
                (request, result)
            });
        }

        let mut resolution = Resolution::default();
        while let Some(joined) = tasks.join_next().await {
            let (request, result) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "Market data task aborted");
                    continue;
                }
            };
            match result {
                Ok(value) => {
                    if resolution.snapshot.insert(&*request.ticker, &*request.field, value) {
                        debug!(ticker = %request.ticker, field = %request.field, value, "Resolved");
                    } else {
                        warn!(ticker = %request.ticker, field = %request.field, value, "Non-finite value");
                        let error = request.unavailable();
                        resolution.failures.push((request, error));
                    }
                }
                Err(error) => {
                    warn!(ticker = %request.ticker, field = %request.field, %error, "Lookup failed");
                    resolution.failures.push((request, error));
                }
            }
        }
        resolution.failures.sort_by(|a, b| a.0.cmp(&b.0));

        info!(
            provider = self.provider.name(),
            resolved = resolution.snapshot.len(),
            failed = resolution.failures.len(),
            "Market data resolved"
        );
        resolution
    }
}
