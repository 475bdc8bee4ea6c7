//! Key tenor bucketing workflow.
//!
//! Executes the daily batch following A-I-P-S data flow:
//! 1. Load the latest blotter snapshot from ktb_inputs
//! 2. Apply the desk filter rules
//! 3. Resolve durations and FX rates concurrently into a frozen snapshot
//! 4. Decompose and bucket DV01 with ktb_risk
//! 5. Render one chart per currency and the exposure export
//! 6. Write reports through ktb_outputs

use super::{KtbWorkflow, ProgressCallback, WorkflowResult, WorkflowStep};
use crate::config::KtbConfig;
use crate::error::BatchError;
use async_trait::async_trait;
use ktb_core::Date;
use ktb_inputs::prelude::{
    requests_for, BloombergSim, CsvBlotter, MarketDataError, MarketDataProvider,
    MarketDataRequest, MarketDataResolver, TradeSource,
};
use ktb_inputs::trade_source::strip_lock_prefix;
use ktb_outputs::prelude::{exposure_report, ChartRenderer, FileWriter, ReportSink};
use ktb_risk::{RiskEngine, RiskRun, TradeFilter};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything one batch produced.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Blotter the trades came from
    pub blotter: PathBuf,
    /// Risk results
    pub run: RiskRun,
    /// Lookups that failed or timed out
    pub failures: Vec<(MarketDataRequest, MarketDataError)>,
    /// Files written, in write order
    pub report_paths: Vec<PathBuf>,
}

/// Key tenor bucketing workflow for one evaluation date
pub struct KeyTenorWorkflow {
    as_of: Date,
    provider: Option<Arc<dyn MarketDataProvider>>,
    renderer: ChartRenderer,
    /// Cancellation flag
    cancelled: Arc<AtomicBool>,
}

impl KeyTenorWorkflow {
    /// Create a workflow evaluating trades as of `as_of`
    pub fn new(as_of: Date) -> Self {
        Self {
            as_of,
            provider: None,
            renderer: ChartRenderer::default(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Use `provider` instead of the configured fixture
    pub fn with_provider(mut self, provider: Arc<dyn MarketDataProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Report progress if callback is provided
    fn report_progress(progress: &Option<ProgressCallback>, step: WorkflowStep, pct: f64) {
        if let Some(cb) = progress {
            cb(step, pct);
        }
    }

    fn checkpoint(&self) -> Result<(), BatchError> {
        if self.cancelled.load(Ordering::SeqCst) {
            Err(BatchError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Blotter selected by the configuration
    pub fn blotter(config: &KtbConfig) -> Result<CsvBlotter, BatchError> {
        match &config.paths.blotter {
            Some(path) => Ok(CsvBlotter::from_path(strip_lock_prefix(path))),
            None => Ok(CsvBlotter::latest_in(&config.paths.blotter_dir)?),
        }
    }

    fn provider(&self, config: &KtbConfig) -> Result<Arc<dyn MarketDataProvider>, BatchError> {
        if let Some(provider) = &self.provider {
            return Ok(Arc::clone(provider));
        }
        let fixture = config
            .market_data
            .fixture
            .as_ref()
            .ok_or_else(|| BatchError::validation("market_data.fixture is not set"))?;
        Ok(Arc::new(BloombergSim::from_csv(fixture)?))
    }

    /// Run every step, returning the full outcome
    pub async fn execute(
        &self,
        config: &KtbConfig,
        progress: Option<ProgressCallback>,
    ) -> Result<BatchOutcome, BatchError> {
        let base = config.fx.base_currency.as_str();
        let rules = config.filter_rules();

        // Step 1: Load trades
        Self::report_progress(&progress, WorkflowStep::LoadingTrades, 0.0);
        self.checkpoint()?;
        let blotter = Self::blotter(config)?;
        let records = blotter.load()?;
        tracing::info!(source = %blotter.describe(), records = records.len(), "Loaded blotter");
        Self::report_progress(&progress, WorkflowStep::LoadingTrades, 1.0);

        // Step 2: Filter
        Self::report_progress(&progress, WorkflowStep::Filtering, 0.0);
        self.checkpoint()?;
        let filter = TradeFilter::new(rules.clone());
        let accepted = filter.apply(&records);
        tracing::info!(
            accepted = accepted.len(),
            rejected = records.len() - accepted.len(),
            "Applied filter rules"
        );
        Self::report_progress(&progress, WorkflowStep::Filtering, 1.0);

        // Step 3: Resolve market data
        Self::report_progress(&progress, WorkflowStep::ResolvingMarketData, 0.0);
        self.checkpoint()?;
        let resolver = MarketDataResolver::new(
            self.provider(config)?,
            Duration::from_millis(config.market_data.timeout_ms),
        );
        let requests = requests_for(accepted.iter().copied(), base);
        tracing::info!(lookups = requests.len(), "Resolving market data");
        let resolution = resolver.resolve(requests).await;
        Self::report_progress(&progress, WorkflowStep::ResolvingMarketData, 1.0);

        // Step 4: Compute
        Self::report_progress(&progress, WorkflowStep::ComputingRisk, 0.0);
        self.checkpoint()?;
        let engine = RiskEngine::new(rules, base, self.as_of);
        let run = engine.run(&records, &resolution.snapshot);
        for skipped in run.missing_data() {
            tracing::warn!(trade_id = %skipped.trade_id, error = %skipped.error, "Missing market data");
        }
        Self::report_progress(&progress, WorkflowStep::ComputingRisk, 1.0);

        // Step 5: Render
        Self::report_progress(&progress, WorkflowStep::RenderingCharts, 0.0);
        self.checkpoint()?;
        let mut reports = Vec::new();
        if run.risk.is_empty() {
            tracing::info!(as_of = %self.as_of, "No exposures, chart skipped");
        } else {
            reports.push(self.renderer.report(&run.risk, self.as_of)?);
        }
        if config.output.csv_export {
            reports.push(exposure_report(&run.risk, self.as_of)?);
        }
        Self::report_progress(&progress, WorkflowStep::RenderingCharts, 1.0);

        // Step 6: Write
        Self::report_progress(&progress, WorkflowStep::WritingOutputs, 0.0);
        self.checkpoint()?;
        let writer = FileWriter::new(&config.paths.output_dir)?;
        let mut report_paths = Vec::with_capacity(reports.len());
        for report in &reports {
            report_paths.push(writer.send(report)?);
        }
        for file in writer.get_written_files() {
            tracing::debug!(path = %file.path.display(), bytes = file.size, "Wrote report");
        }
        tracing::info!(
            output_dir = %writer.output_dir().display(),
            files = report_paths.len(),
            "Reports written"
        );
        Self::report_progress(&progress, WorkflowStep::WritingOutputs, 1.0);

        Self::report_progress(&progress, WorkflowStep::Completed, 1.0);

        Ok(BatchOutcome {
            blotter: blotter.path().to_path_buf(),
            run,
            failures: resolution.failures,
            report_paths,
        })
    }
}

#[async_trait]
impl KtbWorkflow for KeyTenorWorkflow {
    fn name(&self) -> &str {
        "Key Tenor Bucketing"
    }

    async fn run(
        &self,
        config: &KtbConfig,
        progress: Option<ProgressCallback>,
    ) -> Result<WorkflowResult, BatchError> {
        let start = Instant::now();
        self.cancelled.store(false, Ordering::SeqCst);

        tracing::info!(as_of = %self.as_of, "Starting key tenor workflow");

        let outcome = match self.execute(config, progress).await {
            Ok(outcome) => outcome,
            Err(BatchError::Cancelled) => {
                return Ok(WorkflowResult::failure(
                    start.elapsed().as_millis() as u64,
                    vec!["Workflow cancelled".to_string()],
                ));
            }
            Err(e) => return Err(e),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let counts = outcome.run.counts();
        tracing::info!(
            duration_ms,
            priced = counts.priced,
            skipped = counts.skipped,
            rejected = counts.rejected,
            "Key tenor workflow completed"
        );

        let mut result = WorkflowResult::success(duration_ms, counts.priced);
        result.trades_skipped = counts.skipped;
        result.report_paths = outcome.report_paths;
        result.errors = outcome
            .run
            .skipped
            .iter()
            .map(|s| format!("{}: {}", s.trade_id, s.error))
            .chain(outcome.failures.iter().map(|(_, e)| e.to_string()))
            .collect();
        Ok(result)
    }

    async fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        tracing::info!("Key tenor workflow cancelled");
    }
}
