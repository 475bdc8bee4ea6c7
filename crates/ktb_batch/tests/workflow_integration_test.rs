//! Workflow Integration Tests
//!
//! Runs the key tenor workflow over the bundled sample blotter and fixture
//! with the desk configuration in `ktb.toml`.

use ktb_batch::config::KtbConfig;
use ktb_batch::workflow::{KeyTenorWorkflow, KtbWorkflow, WorkflowStep};
use ktb_core::Date;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn workspace_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    Path::new(&manifest_dir).join("../..")
}

fn as_of() -> Date {
    Date::from_ymd(2026, 10, 19).unwrap()
}

/// Desk configuration with inputs resolved against the workspace root and
/// outputs redirected to `output_dir`
fn desk_config(output_dir: &Path) -> KtbConfig {
    let root = workspace_root();
    let mut config = KtbConfig::load(&root.join("ktb.toml")).unwrap();
    config.paths.blotter_dir = root.join(&config.paths.blotter_dir);
    config.market_data.fixture = config.market_data.fixture.map(|p| root.join(p));
    config.paths.output_dir = output_dir.to_path_buf();
    config
}

#[test]
fn test_desk_config_is_valid() {
    let config = KtbConfig::load(&workspace_root().join("ktb.toml")).unwrap();
    assert!(config.validate().is_ok());
    assert!(config.warnings().is_empty());
    assert_eq!(config.fx.base_currency, "USD");
    assert_eq!(config.filter_rules().include_currencies.len(), 13);
}

/// The sample blotter exercises every filter rule and both skip paths
#[tokio::test]
async fn test_sample_run_counts() {
    let dir = tempfile::tempdir().unwrap();
    let config = desk_config(dir.path());

    let outcome = KeyTenorWorkflow::new(as_of()).execute(&config, None).await.unwrap();
    let counts = outcome.run.counts();

    assert_eq!(counts.records, 15);
    assert_eq!(counts.rejected, 3);
    assert_eq!(counts.skipped, 2);
    assert_eq!(counts.priced, 10);

    let skipped: Vec<_> = outcome
        .run
        .skipped
        .iter()
        .map(|s| (s.trade_id.as_str(), s.error.kind()))
        .collect();
    assert_eq!(skipped[0], ("T0013", "stale_maturity"));
    assert_eq!(skipped[1].0, "T0015");
    assert_eq!(outcome.run.missing_data().count(), 1);

    let failed: Vec<_> = outcome.failures.iter().map(|(r, _)| r.ticker.as_str()).collect();
    assert_eq!(failed, vec!["RXZ6 COMDTY"]);
}

/// One chart per currency, in currency code order
#[tokio::test]
async fn test_sample_run_writes_one_chart_per_currency() {
    let dir = tempfile::tempdir().unwrap();
    let config = desk_config(dir.path());

    let outcome = KeyTenorWorkflow::new(as_of()).execute(&config, None).await.unwrap();
    assert_eq!(
        outcome.run.risk.currencies(),
        vec!["AUD", "CNY", "JPY", "KRW", "TWD", "USD"]
    );

    let html = std::fs::read_to_string(dir.path().join("KTB_2026-10-19.html")).unwrap();
    assert_eq!(html.matches("Plotly.newPlot").count(), 6);
    let aud = html.find("ktb-AUD-2026-10-19").unwrap();
    let usd = html.find("ktb-USD-2026-10-19").unwrap();
    assert!(aud < usd);

    let csv = std::fs::read_to_string(dir.path().join("KTB_2026-10-19_exposures.csv")).unwrap();
    assert!(csv.starts_with("as_of,currency,kind,bucket,rank,trade_name,dv01"));
    assert!(csv.contains("KTB 3y"));
    assert!(!csv.contains("Dup"));
}

/// Re-running appends another set of charts but rewrites the export
#[tokio::test]
async fn test_rerun_appends_chart_and_overwrites_export() {
    let dir = tempfile::tempdir().unwrap();
    let config = desk_config(dir.path());
    let workflow = KeyTenorWorkflow::new(as_of());

    workflow.execute(&config, None).await.unwrap();
    let export_path = dir.path().join("KTB_2026-10-19_exposures.csv");
    let first_export = std::fs::read_to_string(&export_path).unwrap();

    let second = workflow.execute(&config, None).await.unwrap();
    let second_export = std::fs::read_to_string(&export_path).unwrap();
    assert_eq!(first_export, second_export);

    let html = std::fs::read_to_string(dir.path().join("KTB_2026-10-19.html")).unwrap();
    assert_eq!(html.matches("Plotly.newPlot").count(), 12);
    assert_eq!(second.report_paths.len(), 2);
}

/// Same inputs, same risk
#[tokio::test]
async fn test_sample_run_is_deterministic() {
    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();

    let first = KeyTenorWorkflow::new(as_of())
        .execute(&desk_config(first_dir.path()), None)
        .await
        .unwrap();
    let second = KeyTenorWorkflow::new(as_of())
        .execute(&desk_config(second_dir.path()), None)
        .await
        .unwrap();

    assert_eq!(first.run, second.run);
}

/// Workflow trait execution reports every step
#[tokio::test]
async fn test_workflow_run_with_progress() {
    let dir = tempfile::tempdir().unwrap();
    let config = desk_config(dir.path());
    let workflow = KeyTenorWorkflow::new(as_of());

    let steps = Arc::new(std::sync::Mutex::new(Vec::new()));
    let steps_clone = steps.clone();
    let progress = Arc::new(move |step: WorkflowStep, pct: f64| {
        steps_clone.lock().unwrap().push((step, pct));
    });

    let result = workflow.run(&config, Some(progress)).await.unwrap();
    assert!(result.success);
    assert_eq!(result.trades_processed, 10);
    assert_eq!(result.trades_skipped, 2);
    assert_eq!(result.errors.len(), 3);

    let recorded: Vec<_> = steps.lock().unwrap().iter().map(|(s, _)| *s).collect();
    for step in [
        WorkflowStep::LoadingTrades,
        WorkflowStep::Filtering,
        WorkflowStep::ResolvingMarketData,
        WorkflowStep::ComputingRisk,
        WorkflowStep::RenderingCharts,
        WorkflowStep::WritingOutputs,
        WorkflowStep::Completed,
    ] {
        assert!(recorded.contains(&step), "missing {}", step.name());
    }
}

#[test]
fn test_workflow_name() {
    assert_eq!(KeyTenorWorkflow::new(as_of()).name(), "Key Tenor Bucketing");
}

/// Trades maturing before the evaluation date drop out of the buckets
#[tokio::test]
async fn test_later_as_of_skips_matured_trades() {
    let dir = tempfile::tempdir().unwrap();
    let config = desk_config(dir.path());
    let late = Date::from_ymd(2027, 1, 1).unwrap();

    let outcome = KeyTenorWorkflow::new(late).execute(&config, None).await.unwrap();
    let stale: Vec<_> = outcome
        .run
        .skipped
        .iter()
        .filter(|s| s.error.kind() == "stale_maturity")
        .map(|s| s.trade_id.as_str())
        .collect();
    assert_eq!(stale, vec!["T0007", "T0013", "T0015"]);
}
