//! # Key Tenor Bucketing Batch
//!
//! Orchestrates the daily key tenor run using the A-I-P-S
//! (Adapter → Infra → Pricer → Service) architecture.
//!
//! ## Features
//!
//! - **Configuration**: `ktb.toml` with `KTB_*` environment overrides
//! - **Key Tenor Workflow**: blotter → filter → market data → DV01 buckets → charts
//!
//! ## Architecture Compliance
//!
//! This crate sits outside the layers it composes:
//! - Inputs flow through the Adapter layer (ktb_inputs)
//! - Computation stays in the Pricer layer (ktb_risk), which never performs I/O
//! - Outputs flow through the Service layer (ktb_outputs)

pub mod config;
pub mod error;
pub mod workflow;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ConfigError, KtbConfig, DEFAULT_CONFIG_FILE};
    pub use crate::error::BatchError;
    pub use crate::workflow::{
        BatchOutcome, KeyTenorWorkflow, KtbWorkflow, ProgressCallback, WorkflowResult,
        WorkflowStep,
    };
}
