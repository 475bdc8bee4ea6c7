//! Integration tests to validate the bundled sample data files.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use ktb_core::MarketDataLookup;
use ktb_inputs::prelude::*;

/// Get the sample data directory path
fn sample_data_dir() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    Path::new(&manifest_dir).join("../../data/input")
}

#[test]
fn test_sample_data_directory_exists() {
    let data_dir = sample_data_dir();
    assert!(data_dir.exists(), "Sample data directory should exist at {:?}", data_dir);
}

#[test]
fn test_sample_blotter_loads() {
    let blotter = CsvBlotter::latest_in(sample_data_dir().join("blotter")).unwrap();
    let records = blotter.load().unwrap();

    assert!(records.len() >= 10, "Should have at least 10 trades");
    for record in &records {
        assert!(!record.trade_id.is_empty(), "TradeID should not be empty");
        assert!(!record.currency.is_empty(), "Currency Code should not be empty");
    }
    assert!(records.iter().any(|r| r.asset_type == "Interest Rate Swap"));
    assert!(records.iter().any(|r| r.asset_type == "Futures"));
    assert!(records.iter().any(|r| r.asset_type == "Bond"));
}

#[test]
fn test_sample_blotter_headers() {
    let path = sample_data_dir().join("blotter/blotter_20261019.csv");
    let content = std::fs::read_to_string(&path).expect("Should read sample blotter");
    let header = content.lines().next().expect("Should have a header line");
    let columns: Vec<&str> = header.split(',').collect();
    assert_eq!(columns, ktb_inputs::trade_source::BLOTTER_HEADERS);
}

#[tokio::test]
async fn test_fixture_covers_sample_blotter() {
    let data_dir = sample_data_dir();
    let records = CsvBlotter::latest_in(data_dir.join("blotter"))
        .unwrap()
        .load()
        .unwrap();
    let sim = BloombergSim::from_csv(data_dir.join("market_data/bloomberg_fixture.csv")).unwrap();
    assert!(!sim.is_empty());

    let resolver = MarketDataResolver::new(Arc::new(sim), Duration::from_secs(1));
    let resolution = resolver.resolve(requests_for(&records, "USD")).await;

    assert_eq!(resolution.snapshot.fx_rate("USD", "KRW"), Some(1384.20));
    assert!(resolution.snapshot.lookup("TYZ6 COMDTY", "DUR_MID").is_some());
    // The Bund future is deliberately left out of the fixture.
    let failed: Vec<_> = resolution.failures.iter().map(|(r, _)| r.ticker.as_str()).collect();
    assert_eq!(failed, vec!["RXZ6 COMDTY"]);
}
