//! Batch workflow definitions.
//!
//! A workflow is a single forward pass over one blotter snapshot:
//! load, filter, resolve market data, compute, render, write.

mod key_tenor;

pub use key_tenor::{BatchOutcome, KeyTenorWorkflow};

use crate::config::KtbConfig;
use crate::error::BatchError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Workflow processing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    /// Loading the blotter snapshot
    LoadingTrades,
    /// Applying filter rules
    Filtering,
    /// Resolving durations and FX rates
    ResolvingMarketData,
    /// Computing and bucketing DV01
    ComputingRisk,
    /// Rendering charts and exports
    RenderingCharts,
    /// Writing output files
    WritingOutputs,
    /// Workflow completed
    Completed,
}

impl WorkflowStep {
    /// Get the step name for display
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadingTrades => "Loading Trades",
            Self::Filtering => "Filtering",
            Self::ResolvingMarketData => "Resolving Market Data",
            Self::ComputingRisk => "Computing Risk",
            Self::RenderingCharts => "Rendering Charts",
            Self::WritingOutputs => "Writing Outputs",
            Self::Completed => "Completed",
        }
    }
}

/// Progress callback type for reporting workflow progress
pub type ProgressCallback = Arc<dyn Fn(WorkflowStep, f64) + Send + Sync>;

/// Workflow execution result
#[derive(Debug, Clone)]
pub struct WorkflowResult {
    /// Whether the workflow completed successfully
    pub success: bool,
    /// Execution duration in milliseconds
    pub duration_ms: u64,
    /// Number of trades that contributed to the buckets
    pub trades_processed: usize,
    /// Number of filtered-in trades that were skipped
    pub trades_skipped: usize,
    /// Files written
    pub report_paths: Vec<PathBuf>,
    /// List of non-fatal errors encountered
    pub errors: Vec<String>,
}

impl WorkflowResult {
    /// Create a successful result
    pub fn success(duration_ms: u64, trades_processed: usize) -> Self {
        Self {
            success: true,
            duration_ms,
            trades_processed,
            trades_skipped: 0,
            report_paths: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Create a failure result
    pub fn failure(duration_ms: u64, errors: Vec<String>) -> Self {
        Self {
            success: false,
            duration_ms,
            trades_processed: 0,
            trades_skipped: 0,
            report_paths: Vec::new(),
            errors,
        }
    }
}

/// Batch workflow trait
#[async_trait]
pub trait KtbWorkflow: Send + Sync {
    /// Get the workflow name
    fn name(&self) -> &str;

    /// Execute the workflow
    async fn run(
        &self,
        config: &KtbConfig,
        progress: Option<ProgressCallback>,
    ) -> Result<WorkflowResult, BatchError>;

    /// Cancel the workflow
    async fn cancel(&self);
}
